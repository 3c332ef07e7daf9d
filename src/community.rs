//! Community metadata: repository owners, SIGs and freeze policies
//!
//! The gate only reads this through [`Community`]. [`StaticCommunity`] serves
//! it from the `[community]` config section; a deployment that keeps the
//! metadata in a repository can provide its own implementation.

use crate::error::Result;
use crate::freeze::FreezePolicy;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Read access to community metadata
#[async_trait]
pub trait Community: Send + Sync {
    /// Owners listed for `owner/repo`
    async fn repo_owners(&self, full_name: &str) -> Result<Vec<String>>;

    /// Name of the SIG that governs `owner/repo`, if any
    async fn sig_for_repo(&self, full_name: &str) -> Result<Option<String>>;

    /// Owners of a SIG
    async fn sig_owners(&self, sig: &str) -> Result<Vec<String>>;

    /// All branch-freeze policies
    async fn freeze_policies(&self) -> Result<Vec<FreezePolicy>>;
}

/// A SIG entry in config
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SigConfig {
    /// SIG name (used in `sig/<name>` labels)
    pub name: String,
    /// Repositories (`owner/repo`) governed by this SIG
    #[serde(default)]
    pub repositories: Vec<String>,
    /// SIG owners
    #[serde(default)]
    pub owners: Vec<String>,
}

/// `[community]` config section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Owner lists keyed by `owner/repo`
    pub owners: HashMap<String, Vec<String>>,
    /// SIG directory
    pub sigs: Vec<SigConfig>,
    /// Branch-freeze policies
    pub frozen: Vec<FreezePolicy>,
}

/// Community metadata held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCommunity {
    config: CommunityConfig,
}

impl StaticCommunity {
    /// Wrap a parsed config section
    pub const fn new(config: CommunityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Community for StaticCommunity {
    async fn repo_owners(&self, full_name: &str) -> Result<Vec<String>> {
        Ok(self
            .config
            .owners
            .get(full_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn sig_for_repo(&self, full_name: &str) -> Result<Option<String>> {
        Ok(self
            .config
            .sigs
            .iter()
            .find(|s| s.repositories.iter().any(|r| r == full_name))
            .map(|s| s.name.clone()))
    }

    async fn sig_owners(&self, sig: &str) -> Result<Vec<String>> {
        Ok(self
            .config
            .sigs
            .iter()
            .filter(|s| s.name == sig)
            .flat_map(|s| s.owners.iter().cloned())
            .collect())
    }

    async fn freeze_policies(&self) -> Result<Vec<FreezePolicy>> {
        Ok(self.config.frozen.clone())
    }
}

