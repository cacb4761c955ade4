//! Splitting composite paths into container and in-container parts.
//!
//! `d2data.mpq\data\global\items\flp2ax.dc6` names the file
//! `data\global\items\flp2ax.dc6` inside the container `d2data.mpq`.

use std::fmt;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Characters accepted at the container boundary.
pub const CONTAINER_SEPARATORS: [char; 2] = ['\\', '/'];

/// A composite path split at its container boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerPath {
    /// First path segment, e.g. the archive file name
    pub container_id: String,
    /// Everything after the first separator, unchanged
    pub inner_path: String,
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.container_id, self.inner_path)
    }
}

/// Split `full_path` at the first `\` or `/`.
///
/// The remainder may contain further separators of either kind and is
/// passed through as is.
///
/// # Errors
/// `DomainError::InvalidPath` when `full_path` contains no separator.
#[instrument(level = "trace")]
pub fn split_container_path(full_path: &str) -> DomainResult<ContainerPath> {
    let (container_id, inner_path) = full_path
        .split_once(CONTAINER_SEPARATORS)
        .ok_or_else(|| DomainError::InvalidPath(full_path.to_string()))?;

    Ok(ContainerPath {
        container_id: container_id.to_string(),
        inner_path: inner_path.to_string(),
    })
}
