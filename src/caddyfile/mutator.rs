//! Serialized read-check-backup-write of the live Caddyfile.
//!
//! # Responsibilities
//! - Hold the process-wide lock for the whole mutation
//! - Skip addresses that already have a rule line
//! - Back up the original bytes before touching the live file
//! - Rewrite the file in place
//!
//! # Design Decisions
//! - The file is rewritten in place rather than renamed over, so a
//!   single-file bind mount into the proxy container keeps its inode
//! - The lock is in-process only; a second bot instance on the same
//!   file is not protected against

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use thiserror::Error;

use crate::caddyfile::rule::{count_markers, insert_rule, Insertion, RuleTemplate};
use crate::config::CaddyfileConfig;

/// Errors raised while mutating the Caddyfile.
#[derive(Debug, Error)]
pub enum MutatorError {
    /// The live file could not be read (or is not UTF-8).
    #[error("read caddyfile {}: {source}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No line contains the marker; nothing was changed.
    #[error("no '{marker}' marker found in {}", .path.display())]
    MarkerNotFound { marker: String, path: PathBuf },

    /// The backup could not be written; the live file was not touched.
    #[error("write backup {}: {source}", .path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The live file could not be rewritten; `backup` holds the original.
    #[error("write caddyfile {} (original kept at {}): {source}", .path.display(), .backup.display())]
    ConfigWriteFailed {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for mutator operations.
pub type MutatorResult<T> = Result<T, MutatorError>;

/// Appends address rules to a Caddyfile after its marker lines.
pub struct CaddyfileMutator {
    path: PathBuf,
    marker: String,
    template: RuleTemplate,
    lock: Mutex<()>,
}

impl CaddyfileMutator {
    pub fn new(config: &CaddyfileConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            marker: config.marker.clone(),
            template: RuleTemplate::new(config.rule_template.clone()),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add the rule for `address` after every marker.
    ///
    /// Returns `Ok(false)` when the rule line already exists; in that case
    /// nothing is backed up or written.
    pub fn add_rule(&self, address: &str) -> MutatorResult<bool> {
        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let original = self.read()?;
        let document = std::str::from_utf8(&original).map_err(|e| {
            MutatorError::ConfigUnreadable {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            }
        })?;

        let rule = self.template.render(address);
        let (content, markers) = match insert_rule(document, &self.marker, &rule) {
            Insertion::AlreadyPresent => {
                tracing::debug!(address = %address, "Rule already present");
                return Ok(false);
            }
            Insertion::MarkerNotFound => {
                return Err(MutatorError::MarkerNotFound {
                    marker: self.marker.clone(),
                    path: self.path.clone(),
                });
            }
            Insertion::Inserted { content, markers } => (content, markers),
        };

        let backup = self.backup_path();
        fs::write(&backup, &original).map_err(|source| MutatorError::BackupFailed {
            path: backup.clone(),
            source,
        })?;

        fs::write(&self.path, content.as_bytes()).map_err(|source| {
            MutatorError::ConfigWriteFailed {
                path: self.path.clone(),
                backup: backup.clone(),
                source,
            }
        })?;

        tracing::info!(
            address = %address,
            markers,
            backup = %backup.display(),
            "Rule added to Caddyfile"
        );
        Ok(true)
    }

    /// Count marker lines in the current file.
    pub fn marker_count(&self) -> MutatorResult<usize> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let original = self.read()?;
        let document = String::from_utf8_lossy(&original);
        Ok(count_markers(&document, &self.marker))
    }

    fn read(&self) -> MutatorResult<Vec<u8>> {
        fs::read(&self.path).map_err(|source| MutatorError::ConfigUnreadable {
            path: self.path.clone(),
            source,
        })
    }

    /// `<path>.bak.<YYYYMMDDThhmmss>` in local time.
    fn backup_path(&self) -> PathBuf {
        backup_path_at(&self.path, &Local::now().format("%Y%m%dT%H%M%S").to_string())
    }
}

fn backup_path_at(path: &Path, stamp: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".bak.");
    name.push(stamp);
    PathBuf::from(name)
}
