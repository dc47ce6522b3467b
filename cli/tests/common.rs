//! # octoposh CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`:
//!
//! - `octoposh_cmd()` runs the compiled binary inside an isolated
//!   `TestEnv`: a temporary working directory (with a `.git` marker so the
//!   project config search stops there), a temporary user config directory,
//!   and no `OctopusURL` / `OctopusAPIKey` inherited from the caller's shell.
//! - `spawn_octopus_server()` starts an axum fake of the Octopus REST API on
//!   localhost with a small fixed data set.
//!
//! Fixture data served by the fake:
//!
//! | Machine   | Environments          | CommunicationStyle |
//! |-----------|-----------------------|--------------------|
//! | Web1      | Production            | TentaclePassive    |
//! | Web2      | Production, Staging   | Ssh                |
//! | Database1 | Staging               | TentacleActive     |
//! | Cloud1    | Dev                   | None               |
//! | Drop1     | Production            | OfflineDrop        |
//!

// Different test crates use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::TempDir;

/// API key the fake server accepts.
pub const TEST_API_KEY: &str = "API-INTEGRATIONTEST01";

/// Temporary directories a test command runs in. Dropping it removes them.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let work_dir = tempfile::tempdir().expect("Failed to create temp work dir");
        std::fs::create_dir(work_dir.path().join(".git")).expect("Failed to create .git marker");
        let config_home = tempfile::tempdir().expect("Failed to create temp config dir");
        TestEnv {
            work_dir,
            config_home,
        }
    }

    /// Writes `.octoposh.toml` into the working directory.
    pub fn write_project_config(&self, content: &str) {
        std::fs::write(self.work_dir.path().join(".octoposh.toml"), content)
            .expect("Failed to write project config");
    }

    /// An `octoposh` command isolated from the caller's configuration.
    pub fn cmd(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("octoposh").expect("Failed to find octoposh binary for testing");
        cmd.current_dir(self.work_dir.path())
            .env_remove("OctopusURL")
            .env_remove("OctopusAPIKey")
            .env_remove("RUST_LOG")
            .env("HOME", self.config_home.path())
            .env("XDG_CONFIG_HOME", self.config_home.path());
        cmd
    }

    /// An isolated command already pointed at `server` with the test API key.
    pub fn cmd_for(&self, server: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--server", server, "--api-key", TEST_API_KEY]);
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// # Get octoposh Command (`octoposh_cmd`)
///
/// A bare `assert_cmd::Command` for the `octoposh` binary, for tests that do
/// not touch configuration (`--help`, `--version`, `styles`).
pub fn octoposh_cmd() -> Command {
    Command::cargo_bin("octoposh").expect("Failed to find octoposh binary for testing")
}

/// Starts the fake Octopus server on a background thread and returns its base URL.
pub fn spawn_octopus_server() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server port");
    listener
        .set_nonblocking(true)
        .expect("Failed to make listener non-blocking");
    let addr = listener.local_addr().expect("Failed to read fake server address");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build fake server runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("Failed to adopt fake server listener");
            axum::serve(listener, octopus_router())
                .await
                .expect("Fake server stopped");
        });
    });

    format!("http://{}", addr)
}

/// The machines the fake server returns, exactly as it sends them.
pub fn machine_fixtures() -> Vec<Value> {
    vec![
        machine("Machines-1", "Web1", &["Environments-1"], "TentaclePassive"),
        machine("Machines-2", "Web2", &["Environments-1", "Environments-2"], "Ssh"),
        machine("Machines-3", "Database1", &["Environments-2"], "TentacleActive"),
        machine("Machines-4", "Cloud1", &["Environments-3"], "None"),
        // Sparse record: explicit nulls, and no Roles / IsDisabled / HealthStatus at all.
        json!({
            "Id": "Machines-5",
            "Name": "Drop1",
            "EnvironmentIds": ["Environments-1"],
            "Status": null,
            "Uri": null,
            "Thumbprint": null,
            "MachinePolicyId": "MachinePolicies-1",
            "Endpoint": {
                "CommunicationStyle": "OfflineDrop",
                "DropFolderPath": "C:\\Drops",
                "Thumbprint": null
            }
        }),
    ]
}

fn machine(id: &str, name: &str, environment_ids: &[&str], style: &str) -> Value {
    let endpoint = match style {
        "TentaclePassive" => json!({
            "CommunicationStyle": style,
            "Uri": format!("https://{}:10933/", name.to_lowercase()),
            "Thumbprint": "A1B2C3"
        }),
        "Ssh" => json!({ "CommunicationStyle": style, "Host": "10.0.0.2", "Port": 22 }),
        _ => json!({ "CommunicationStyle": style }),
    };
    json!({
        "Id": id,
        "Name": name,
        "EnvironmentIds": environment_ids,
        "Roles": ["web"],
        "IsDisabled": false,
        "Status": "Online",
        "HealthStatus": "Healthy",
        "StatusSummary": "This machine is online.",
        "MachinePolicyId": "MachinePolicies-1",
        "Endpoint": endpoint
    })
}

/// The environments the fake server returns, exactly as it sends them.
pub fn environment_fixtures() -> Vec<Value> {
    vec![
        json!({
            "Id": "Environments-1",
            "Name": "Production",
            "SortOrder": 0,
            "LastModifiedOn": "2017-03-01T10:15:00.000+00:00",
            "LastModifiedBy": "admin"
        }),
        json!({ "Id": "Environments-2", "Name": "Staging", "SortOrder": 1 }),
        json!({ "Id": "Environments-3", "Name": "Dev", "Description": null, "SortOrder": 2 }),
    ]
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-Octopus-ApiKey")
        .and_then(|v| v.to_str().ok())
        == Some(TEST_API_KEY)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "ErrorMessage": "You must be logged in to perform this action. Please provide a valid API key.",
            "Errors": []
        })),
    )
        .into_response()
}

fn page(items: Vec<Value>) -> Value {
    json!({ "ItemType": "Resource", "Items": items, "Links": {} })
}

fn octopus_router() -> Router {
    Router::new()
        .route(
            "/api",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                Json(json!({ "Application": "Octopus Deploy", "Version": "2018.3.0" }))
                    .into_response()
            }),
        )
        .route(
            "/api/machines/all",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                Json(Value::Array(machine_fixtures())).into_response()
            }),
        )
        .route(
            "/api/environments/all",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                Json(Value::Array(environment_fixtures())).into_response()
            }),
        )
        .route(
            "/api/environments",
            get(
                |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    // Partial, case-insensitive match like the real server.
                    let needle = params.get("name").cloned().unwrap_or_default().to_lowercase();
                    let found = environment_fixtures()
                        .into_iter()
                        .filter(|env| {
                            env["Name"]
                                .as_str()
                                .map(|n| n.to_lowercase().contains(&needle))
                                .unwrap_or(false)
                        })
                        .collect();
                    Json(page(found)).into_response()
                },
            ),
        )
        .route(
            "/api/environments/{id}/machines",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                let members = machine_fixtures()
                    .into_iter()
                    .filter(|m| {
                        m["EnvironmentIds"]
                            .as_array()
                            .map(|ids| ids.iter().any(|v| v == &Value::String(id.clone())))
                            .unwrap_or(false)
                    })
                    .collect();
                Json(page(members)).into_response()
            }),
        )
}
