//! Gate configuration
//!
//! Loaded from TOML once per process and passed explicitly to the gate.
//! Every field has a default, so an absent file yields a working setup.

use crate::community::CommunityConfig;
use crate::error::{Error, Result};
use crate::labels::{LabelScheme, LgtmRequirement};
use crate::pattern::Glob;
use crate::platform::MAX_PER_PAGE;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user config dir
const CONFIG_DIR: &str = "merge-gate";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Merge policy knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Required number of lgtm labels
    pub lgtm_counts_required: usize,
    /// Per-repository overrides keyed by `owner/repo`
    pub lgtm_counts_per_repo: HashMap<String, usize>,
    /// Page size used when walking comment history
    pub comments_per_page: u32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            lgtm_counts_required: 1,
            lgtm_counts_per_repo: HashMap::new(),
            comments_per_page: 20,
        }
    }
}

/// Behavior when new commits are pushed to a PR
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceChangeConfig {
    /// Update action description that triggers label stripping
    pub action_flag: String,
    /// Label patterns removed on a source-branch change
    pub strip_labels: Vec<Glob>,
    /// Comment posted afterwards to re-trigger CI; empty disables it
    pub retest_comment: String,
}

impl Default for SourceChangeConfig {
    fn default() -> Self {
        Self {
            action_flag: "source_branch_changed".to_string(),
            strip_labels: ["lgtm", "lgtm-*"]
                .iter()
                .filter_map(|p| Glob::new(p).ok())
                .collect(),
            retest_comment: "/retest".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// API token; environment variables take precedence
    pub token: Option<String>,
    /// Name the bot signs its comments with
    pub bot_name: String,
    /// Community name used to select freeze policies
    pub community_name: String,
    /// Label naming and required/forbidden lists
    pub labels: LabelScheme,
    /// Merge policy
    pub merge: MergeConfig,
    /// Source-branch change handling
    pub source_change: SourceChangeConfig,
    /// Static community metadata
    pub community: CommunityConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            token: None,
            bot_name: "merge-gate".to_string(),
            community_name: "openeuler".to_string(),
            labels: LabelScheme::default(),
            merge: MergeConfig::default(),
            source_change: SourceChangeConfig::default(),
            community: CommunityConfig::default(),
        }
    }
}

impl GateConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Reject values the gate cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PER_PAGE).contains(&self.merge.comments_per_page) {
            return Err(Error::Config(format!(
                "merge.comments_per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        let l = &self.labels;
        if l.approved.is_empty() || l.lgtm.is_empty() || l.lgtm_reviewer_prefix.is_empty() {
            return Err(Error::Config(
                "labels.approved, labels.lgtm and labels.lgtm_reviewer_prefix must be non-empty"
                    .to_string(),
            ));
        }
        if l.required.iter().chain(&l.forbidden).any(String::is_empty) {
            return Err(Error::Config(
                "required/forbidden label names must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Lgtm requirement for `owner/repo`, honoring per-repo overrides
    pub fn lgtm_requirement_for(&self, full_name: &str) -> LgtmRequirement {
        let count = self
            .merge
            .lgtm_counts_per_repo
            .get(full_name)
            .copied()
            .unwrap_or(self.merge.lgtm_counts_required);
        LgtmRequirement::from_count(count)
    }
}

/// `$XDG_CONFIG_HOME/merge-gate/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}
