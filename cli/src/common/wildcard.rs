//! # octoposh Wildcard Patterns
//!
//! File: cli/src/common/wildcard.rs
//!
//! ## Overview
//!
//! Shell-style wildcard matching used by the name filters of the `machine`
//! and `environment` commands. Patterns are matched against the *whole*
//! name and always case-insensitively.
//!
//! Supported syntax:
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//! - `[abc]` matches one character from the set; `[a-z]` matches a range
//! - `` ` `` (backtick) escapes the next character so it is taken literally
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::wildcard::{contains_wildcard_characters, WildcardPattern};
//!
//! assert!(contains_wildcard_characters("Web*"));
//! let pattern = WildcardPattern::new("web*")?;
//! assert!(pattern.is_match("WebServer1"));
//! ```
//!
use crate::core::error::{OctoposhError, Result};
use anyhow::anyhow;
use regex::{Regex, RegexBuilder};

const ESCAPE: char = '`';

/// Returns `true` when `value` contains an unescaped `*`, `?`, `[` or `]`.
pub fn contains_wildcard_characters(value: &str) -> bool {
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                chars.next(); // Skip the escaped character.
            }
            '*' | '?' | '[' | ']' => return true,
            _ => {}
        }
    }
    false
}

/// A compiled, case-insensitive wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles `pattern` into an anchored, case-insensitive regex.
    ///
    /// # Errors
    ///
    /// Returns `OctoposhError::InvalidWildcardPattern` for an unterminated `[`,
    /// an empty `[]` set, or anything else the regex engine rejects.
    pub fn new(pattern: &str) -> Result<Self> {
        let translated = translate(pattern)?;
        let regex = RegexBuilder::new(&format!("^{}$", translated))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| invalid(pattern, &e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text as it was given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests whether the whole of `input` matches, ignoring case.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

fn invalid(pattern: &str, reason: &str) -> anyhow::Error {
    anyhow!(OctoposhError::InvalidWildcardPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    })
}

fn escape_char(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0u8; 4]))
}

/// Rewrites wildcard syntax as regex syntax, without anchors.
fn translate(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ESCAPE => {
                // A trailing backtick stands for itself.
                let literal = chars.get(i + 1).copied().unwrap_or(ESCAPE);
                out.push_str(&escape_char(literal));
                i += 2;
            }
            '*' => {
                out.push_str(".*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            '[' => {
                let (class, consumed) = translate_set(&chars[i + 1..], pattern)?;
                out.push_str(&class);
                i += consumed + 1;
            }
            other => {
                out.push_str(&escape_char(other));
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Translates the body of a `[...]` set into a regex character class.
/// `rest` starts just after the `[`. Returns the class and the number of
/// characters consumed including the closing `]`.
fn translate_set(rest: &[char], pattern: &str) -> Result<(String, usize)> {
    let mut class = String::from("[");
    let mut items = 0;
    let mut i = 0;

    loop {
        let c = match rest.get(i) {
            Some(&c) => c,
            None => return Err(invalid(pattern, "unterminated '[' character set")),
        };
        if c == ']' {
            i += 1;
            break;
        }

        let (start, width) = if c == ESCAPE {
            match rest.get(i + 1) {
                Some(&escaped) => (escaped, 2),
                None => (ESCAPE, 1),
            }
        } else {
            (c, 1)
        };
        i += width;

        // `a-z` range, unless the dash is the last character before `]`.
        if rest.get(i) == Some(&'-') && rest.get(i + 1).is_some_and(|&n| n != ']') {
            let end = rest[i + 1];
            class.push_str(&escape_char(start.min(end)));
            class.push('-');
            class.push_str(&escape_char(start.max(end)));
            i += 2;
        } else {
            class.push_str(&escape_char(start));
        }
        items += 1;
    }

    if items == 0 {
        return Err(invalid(pattern, "empty '[]' character set"));
    }
    class.push(']');
    Ok((class, i))
}
