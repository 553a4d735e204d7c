//! Grant sources
//!
//! The permission-lookup call itself belongs to the host's RPC transport.
//! [`GrantSource`] is the seam a registry refreshes through; this module
//! ships an in-memory source and a JSON file source.

use crate::error::GrantError;
use crate::grant::{grants_from_slice, PermissionGrant};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Producer of grant rows for the current user
#[async_trait]
pub trait GrantSource: Send + Sync {
    /// Fetch the full grant list
    async fn fetch_grants(&self) -> Result<Vec<PermissionGrant>, GrantError>;
}

/// Source serving a fixed grant list
#[derive(Debug, Clone, Default)]
pub struct StaticGrantSource {
    grants: Vec<PermissionGrant>,
}

impl StaticGrantSource {
    /// Create source from grant rows
    #[inline]
    #[must_use]
    pub fn new(grants: Vec<PermissionGrant>) -> Self {
        Self { grants }
    }
}

#[async_trait]
impl GrantSource for StaticGrantSource {
    async fn fetch_grants(&self) -> Result<Vec<PermissionGrant>, GrantError> {
        Ok(self.grants.clone())
    }
}

/// Source reading a JSON array of grants from disk on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileGrantSource {
    path: PathBuf,
}

impl JsonFileGrantSource {
    /// Create source for `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this source reads
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GrantSource for JsonFileGrantSource {
    async fn fetch_grants(&self) -> Result<Vec<PermissionGrant>, GrantError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| GrantError::io_error(&self.path, e))?;
        grants_from_slice(&body)
    }
}
