//! Container runtime subsystem.
//!
//! # Data Flow
//! ```text
//! container name
//!     → GET  /containers/json        (resolve name → ID)
//!     → POST /containers/{id}/exec   (create exec running the reload command)
//!     → POST /exec/{exec_id}/start   (detached start)
//!     → Ok(()) on 2xx from the start call
//! ```
//!
//! All calls go over the runtime's unix socket.

pub mod client;
pub mod types;

pub use client::DockerClient;
pub use types::{ContainerSummary, DockerError, DockerResult};
