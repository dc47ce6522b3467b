//! # Octopus API Resource Models
//!
//! File: cli/src/common/octopus/models.rs
//!
//! ## Overview
//!
//! Serde models for the JSON resources returned by the Octopus REST API.
//! Field names follow the API's PascalCase.
//!
//! Machines and environments are wrapped in `Resource<T>`, which keeps the
//! JSON object the server sent next to the typed view. Serializing a
//! `Resource` writes that object back unchanged (nulls stay null, absent
//! fields stay absent), which is what `--resource-only` prints. The typed
//! view is reached through `Deref`.
//!
//! The endpoint's `CommunicationStyle` string is parsed into a typed
//! `EndpointKind` rather than compared as text.
//!
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

/// A typed API resource together with the JSON it was read from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource<T> {
    data: T,
    /// `None` for resources built in code rather than read from the server.
    raw: Option<Value>,
}

impl<T> Deref for Resource<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> From<T> for Resource<T> {
    fn from(data: T) -> Self {
        Self { data, raw: None }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Resource<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let data = T::deserialize(&raw).map_err(D::Error::custom)?;
        Ok(Self {
            data,
            raw: Some(raw),
        })
    }
}

impl<T: Serialize> Serialize for Resource<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.raw {
            Some(raw) => raw.serialize(serializer),
            None => self.data.serialize(serializer),
        }
    }
}

/// A deployment target as returned by `/api/machines`.
pub type MachineResource = Resource<Machine>;
/// An environment as returned by `/api/environments`.
pub type EnvironmentResource = Resource<Environment>;

/// Typed view of a deployment target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub tenant_ids: Vec<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub health_status: Option<String>,
    #[serde(default)]
    pub status_summary: Option<String>,
    #[serde(default)]
    pub has_latest_calamari: bool,
    #[serde(default)]
    pub is_in_process: bool,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub thumbprint: Option<String>,
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Machine {
    /// The kind of endpoint the machine communicates through, if the server reported one.
    pub fn endpoint_kind(&self) -> Option<&EndpointKind> {
        self.endpoint.as_ref().map(|e| &e.communication_style)
    }
}

/// How the server reaches a machine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    pub communication_style: EndpointKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub thumbprint: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

/// Typed form of the endpoint's `CommunicationStyle` field.
///
/// Parsing is case-insensitive. Styles this tool has no filter for are kept
/// as `Other` with their original text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum EndpointKind {
    /// Listening tentacle.
    TentaclePassive,
    /// Polling tentacle.
    TentacleActive,
    Ssh,
    /// Cloud region targets report a communication style of `None`.
    #[default]
    None,
    OfflineDrop,
    Other(String),
}

impl EndpointKind {
    /// The identifier the API uses for this kind.
    pub fn as_api_str(&self) -> &str {
        match self {
            EndpointKind::TentaclePassive => "TentaclePassive",
            EndpointKind::TentacleActive => "TentacleActive",
            EndpointKind::Ssh => "Ssh",
            EndpointKind::None => "None",
            EndpointKind::OfflineDrop => "OfflineDrop",
            EndpointKind::Other(raw) => raw,
        }
    }
}

impl From<String> for EndpointKind {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "tentaclepassive" => EndpointKind::TentaclePassive,
            "tentacleactive" => EndpointKind::TentacleActive,
            "ssh" => EndpointKind::Ssh,
            "none" => EndpointKind::None,
            "offlinedrop" => EndpointKind::OfflineDrop,
            _ => EndpointKind::Other(raw),
        }
    }
}

impl From<EndpointKind> for String {
    fn from(kind: EndpointKind) -> Self {
        kind.as_api_str().to_string()
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Typed view of a named group of deployment targets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub use_guided_failure: bool,
    #[serde(default)]
    pub last_modified_on: Option<String>,
    #[serde(default)]
    pub last_modified_by: Option<String>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

/// One page of a paged listing such as `/api/environments`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceCollection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl<T> ResourceCollection<T> {
    /// App-relative link to the next page, when there is one.
    pub fn next_page(&self) -> Option<&str> {
        self.links.get("Page.Next").map(String::as_str)
    }
}

/// Body of `GET /api`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RootResource {
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub version: String,
}

/// Error body the server sends with non-success responses.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}
