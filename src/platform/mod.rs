//! Platform services for GitHub and Gitee
//!
//! Provides a unified interface for the PR operations the gate needs.

mod factory;
mod gitee;
mod github;

pub use factory::create_platform_service;
pub use gitee::GiteeService;
pub use github::GitHubService;

/// Largest comment page both platforms serve
pub const MAX_PER_PAGE: u32 = 100;

use crate::error::Result;
use crate::types::{Comment, MergeResult, Permission, PlatformConfig, PullRequestDetails};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// A service is bound to one repository through its [`PlatformConfig`].
/// Label mutations must be idempotent: adding a present label or removing
/// an absent one succeeds without effect.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Collaborator permission of `user` on the repository
    async fn get_collaborator_permission(&self, user: &str) -> Result<Permission>;

    /// Fresh PR details, including labels, assignees and mergeability
    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails>;

    /// One page of PR comments (1-based `page`)
    async fn list_pr_comments(&self, pr_number: u64, page: u32, per_page: u32)
    -> Result<Vec<Comment>>;

    /// Add labels to a PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Remove labels from a PR
    async fn remove_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Replace the full label set of a PR
    async fn update_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Remove assignees from a PR
    async fn remove_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()>;

    /// Remove testers from a PR
    async fn remove_testers(&self, pr_number: u64, logins: &[String]) -> Result<()>;

    /// Merge a PR with `description` as the merge message
    async fn merge_pr(&self, pr_number: u64, description: &str) -> Result<MergeResult>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
