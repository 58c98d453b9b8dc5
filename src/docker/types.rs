//! Container runtime API payloads and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of `GET /containers/json`; only the fields we read.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContainerSummary {
    #[serde(rename = "Id")]
    pub id: String,

    /// Names as reported by the runtime, usually with a leading `/`.
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
}

impl ContainerSummary {
    /// True if any name matches once a single leading `/` is stripped.
    pub fn has_name(&self, wanted: &str) -> bool {
        self.names
            .iter()
            .any(|n| n.strip_prefix('/').unwrap_or(n) == wanted)
    }
}

/// Body of `POST /containers/{id}/exec`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateExecRequest {
    #[serde(rename = "AttachStdout")]
    pub attach_stdout: bool,

    #[serde(rename = "AttachStderr")]
    pub attach_stderr: bool,

    #[serde(rename = "Cmd")]
    pub cmd: Vec<String>,
}

impl CreateExecRequest {
    /// Output is never read, so nothing is attached.
    pub fn detached(cmd: Vec<String>) -> Self {
        Self {
            attach_stdout: false,
            attach_stderr: false,
            cmd,
        }
    }
}

/// Response of `POST /containers/{id}/exec`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExecResponse {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
}

/// Body of `POST /exec/{id}/start`.
#[derive(Debug, Clone, Serialize)]
pub struct StartExecRequest {
    #[serde(rename = "Detach")]
    pub detach: bool,

    #[serde(rename = "Tty")]
    pub tty: bool,
}

impl Default for StartExecRequest {
    fn default() -> Self {
        Self {
            detach: true,
            tty: false,
        }
    }
}

/// Errors that can occur while reloading through the runtime API.
#[derive(Debug, Error)]
pub enum DockerError {
    /// Socket connect, transport failure or timeout while listing containers.
    #[error("docker list containers: {0}")]
    RuntimeUnreachable(String),

    /// The runtime answered the listing with a non-success status or garbage.
    #[error("docker list containers failed ({status}): {body}")]
    RuntimeApi { status: u16, body: String },

    /// No container carries the requested name.
    #[error("container {0:?} not found")]
    ContainerNotFound(String),

    /// Exec instance could not be created.
    #[error("docker create exec failed: {0}")]
    ExecCreateFailed(String),

    /// Exec instance could not be started.
    #[error("docker start exec failed: {0}")]
    ExecStartFailed(String),
}

/// Result type for runtime operations.
pub type DockerResult<T> = Result<T, DockerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_list_decoding() {
        let json = r#"[
            {"Id": "abc123", "Names": ["/caddy"], "Image": "caddy:2"},
            {"Id": "def456", "Names": ["/other", "/alias"]},
            {"Id": "fff000"}
        ]"#;
        let list: Vec<ContainerSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list[0].has_name("caddy"));
        assert!(list[1].has_name("alias"));
        assert!(!list[2].has_name("caddy"));
    }

    #[test]
    fn test_only_one_slash_is_stripped() {
        let c = ContainerSummary {
            id: "x".into(),
            names: vec!["//caddy".into()],
        };
        assert!(!c.has_name("caddy"));
        assert!(c.has_name("/caddy"));
    }

    #[test]
    fn test_request_bodies() {
        let create = CreateExecRequest::detached(vec!["caddy".into(), "reload".into()]);
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            serde_json::json!({"AttachStdout": false, "AttachStderr": false, "Cmd": ["caddy", "reload"]})
        );
        assert_eq!(
            serde_json::to_value(StartExecRequest::default()).unwrap(),
            serde_json::json!({"Detach": true, "Tty": false})
        );
    }

    #[test]
    fn test_create_response_without_id() {
        let resp: CreateExecResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.id.is_none());
    }
}
