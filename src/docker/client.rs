//! Container runtime client over the local unix socket.
//!
//! # Responsibilities
//! - Resolve a container ID from its display name
//! - Create a detached exec instance running the reload command
//! - Start it and report only whether the runtime accepted the start
//!
//! # Design Decisions
//! - One HTTP/1.1 connection per round trip; no pooling, no TCP
//! - Every round trip is bounded by the configured timeout
//! - The container is re-resolved on every reload
//! - The command's exit status is never polled

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::config::DockerConfig;
use crate::docker::types::{
    ContainerSummary, CreateExecRequest, CreateExecResponse, DockerError, DockerResult,
    StartExecRequest,
};

/// Raw outcome of a single round trip.
struct RawResponse {
    status: StatusCode,
    body: Bytes,
}

impl RawResponse {
    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }

    fn describe(&self) -> String {
        format!("status {}: {}", self.status.as_u16(), self.body_text())
    }
}

/// Minimal runtime API client used to reload the proxy in place.
#[derive(Debug, Clone)]
pub struct DockerClient {
    socket_path: PathBuf,
    timeout: Duration,
    reload_command: Vec<String>,
}

impl DockerClient {
    pub fn new(config: &DockerConfig) -> Self {
        Self {
            socket_path: PathBuf::from(&config.socket_path),
            timeout: Duration::from_secs(config.timeout_secs),
            reload_command: config.reload_command.clone(),
        }
    }

    /// Resolve `container_name`, then create and start the reload exec.
    pub async fn reload(&self, container_name: &str) -> DockerResult<()> {
        let container_id = self.find_container(container_name).await?;
        let exec_id = self.create_exec(&container_id).await?;
        self.start_exec(&exec_id).await?;

        tracing::info!(
            container = %container_name,
            container_id = %short_id(&container_id),
            exec_id = %short_id(&exec_id),
            "Reload command started"
        );
        Ok(())
    }

    /// `GET /containers/json`.
    pub async fn list_containers(&self) -> DockerResult<Vec<ContainerSummary>> {
        let response = self
            .round_trip(Method::GET, "/containers/json", None)
            .await
            .map_err(DockerError::RuntimeUnreachable)?;

        if !response.status.is_success() {
            return Err(DockerError::RuntimeApi {
                status: response.status.as_u16(),
                body: response.body_text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| DockerError::RuntimeApi {
            status: response.status.as_u16(),
            body: format!("decode containers list: {}", e),
        })
    }

    /// Resolve a display name to the container's runtime ID.
    pub async fn find_container(&self, container_name: &str) -> DockerResult<String> {
        let containers = self.list_containers().await?;
        resolve_container_id(&containers, container_name)
            .map(str::to_string)
            .ok_or_else(|| DockerError::ContainerNotFound(container_name.to_string()))
    }

    /// `POST /containers/{id}/exec` with the reload command.
    pub async fn create_exec(&self, container_id: &str) -> DockerResult<String> {
        let request = CreateExecRequest::detached(self.reload_command.clone());
        let body = encode(&request).map_err(DockerError::ExecCreateFailed)?;
        let path = format!("/containers/{}/exec", container_id);

        let response = self
            .round_trip(Method::POST, &path, Some(body))
            .await
            .map_err(DockerError::ExecCreateFailed)?;

        if !response.status.is_success() {
            return Err(DockerError::ExecCreateFailed(response.describe()));
        }

        let created: CreateExecResponse = serde_json::from_slice(&response.body)
            .map_err(|e| DockerError::ExecCreateFailed(format!("decode create exec response: {}", e)))?;

        match created.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(DockerError::ExecCreateFailed("empty exec id".to_string())),
        }
    }

    /// `POST /exec/{id}/start`, detached and without a TTY.
    pub async fn start_exec(&self, exec_id: &str) -> DockerResult<()> {
        let body = encode(&StartExecRequest::default()).map_err(DockerError::ExecStartFailed)?;
        let path = format!("/exec/{}/start", exec_id);

        let response = self
            .round_trip(Method::POST, &path, Some(body))
            .await
            .map_err(DockerError::ExecStartFailed)?;

        if !response.status.is_success() {
            return Err(DockerError::ExecStartFailed(response.describe()));
        }
        Ok(())
    }

    /// One request/response exchange on a fresh socket connection.
    ///
    /// Errors are transport-level only and already rendered as text; status
    /// handling is left to the caller.
    async fn round_trip(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<RawResponse, String> {
        let exchange = async {
            let stream = UnixStream::connect(&self.socket_path)
                .await
                .map_err(|e| format!("connect {}: {}", self.socket_path.display(), e))?;

            let (mut sender, conn) = hyper::client::conn::http1::handshake::<_, Full<Bytes>>(TokioIo::new(stream))
                .await
                .map_err(|e| format!("handshake: {}", e))?;
            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    tracing::debug!(error = %e, "Runtime connection closed with error");
                }
            });

            let mut builder = Request::builder()
                .method(method.clone())
                .uri(path)
                .header(HOST, "docker");
            if body.is_some() {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            let request = builder
                .body(Full::new(body.unwrap_or_default()))
                .map_err(|e| format!("build request: {}", e))?;

            let response = sender
                .send_request(request)
                .await
                .map_err(|e| format!("{} {}: {}", method, path, e))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| format!("read response body: {}", e))?
                .to_bytes();

            tracing::debug!(method = %method, path = %path, status = %status, "Runtime API call");
            Ok::<_, String>(RawResponse { status, body })
        };

        match timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(format!(
                "{} {} timed out after {}s",
                method,
                path,
                self.timeout.as_secs()
            )),
        }
    }
}

/// Find the ID of the first container carrying `name`.
pub fn resolve_container_id<'a>(containers: &'a [ContainerSummary], name: &str) -> Option<&'a str> {
    containers
        .iter()
        .find(|c| c.has_name(name))
        .map(|c| c.id.as_str())
}

fn encode<T: Serialize>(value: &T) -> Result<Bytes, String> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|e| format!("encode request: {}", e))
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
