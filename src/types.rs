//! Core types for merge-gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// Gitee (REST API v5)
    Gitee,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::Gitee => write!(f, "Gitee"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com/gitee.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo`, the key used by community metadata
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Pull request as read from the platform at the start of a decision cycle
///
/// This is the source of truth for every decision and is never cached
/// beyond the cycle that fetched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// Login of the PR author
    pub author: String,
    /// Current state of the PR
    pub state: PrState,
    /// Base (target) branch name
    pub base_ref: String,
    /// Head (source) branch name
    pub head_ref: String,
    /// Label names currently on the PR; order carries no meaning
    pub labels: Vec<String>,
    /// Platform-computed mergeability (advisory)
    pub mergeable: bool,
    /// Number of comments, used to page through history
    pub comment_count: u64,
    /// Logins of assignees (reviewers on Gitee)
    pub assignees: Vec<String>,
    /// Logins of testers (Gitee only; always empty on GitHub)
    pub testers: Vec<String>,
}

impl PullRequestDetails {
    /// Whether a label with exactly this name is present
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: u64,
    /// Login of the commenter
    pub author: String,
    /// Comment body text
    pub body: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// A comment that was never edited after posting
    pub fn is_unedited(&self) -> bool {
        self.created_at == self.updated_at
    }
}

/// Collaborator permission level on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// No access
    None,
    /// Read-only access
    Read,
    /// Push access
    Write,
    /// Full administrative access
    Admin,
}

impl Permission {
    /// Parse a platform permission string.
    ///
    /// GitHub's `maintain`/`triage` and Gitee's `push`/`pull` spellings are
    /// folded into the four levels; anything unrecognized is `None`.
    pub fn from_platform(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "write" | "push" | "maintain" => Self::Write,
            "read" | "pull" | "triage" => Self::Read,
            _ => Self::None,
        }
    }

    /// Whether this level grants label authority on its own
    pub const fn can_write(self) -> bool {
        matches!(self, Self::Admin | Self::Write)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// A user acting on a PR, with resolved authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User login
    pub login: String,
    /// Collaborator role on the repository
    pub permission: Permission,
    /// Listed in the repository owner list
    pub is_repo_owner: bool,
    /// Listed as an owner of the SIG governing the repository
    pub is_sig_owner: bool,
}

impl Actor {
    /// Whether this actor may add or remove gating labels
    pub const fn can_mutate_gating_labels(&self) -> bool {
        self.permission.can_write() || self.is_repo_owner || self.is_sig_owner
    }
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}
