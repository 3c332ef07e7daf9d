//! Mock platform service for testing
//!
//! These are test utilities - not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use merge_gate::error::{Error, Result};
use merge_gate::platform::PlatformService;
use merge_gate::types::{
    Comment, MergeResult, Permission, Platform, PlatformConfig, PrState, PullRequestDetails,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub description: String,
}

/// Call record for label mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCall {
    Add(u64, Vec<String>),
    Remove(u64, Vec<String>),
    Update(u64, Vec<String>),
}

/// In-memory platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// so label state can be mutated in place and read back.
///
/// Features:
/// - Label state that follows add/remove/update calls (idempotently)
/// - Paged comment history
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    prs: Mutex<HashMap<u64, PullRequestDetails>>,
    comments: Mutex<HashMap<u64, Vec<Comment>>>,
    permissions: Mutex<HashMap<String, Permission>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    label_calls: Mutex<Vec<LabelCall>>,
    list_comments_calls: Mutex<Vec<(u64, u32, u32)>>,
    permission_calls: Mutex<Vec<String>>,
    removed_assignees: Mutex<Vec<String>>,
    removed_testers: Mutex<Vec<String>>,
    // Error injection
    error_on_permission: Mutex<Option<String>>,
    error_on_get_pr: Mutex<Option<String>>,
    error_on_list_comments: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_create_comment: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
    error_on_remove_assignees: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            prs: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            permissions: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            label_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            permission_calls: Mutex::new(Vec::new()),
            removed_assignees: Mutex::new(Vec::new()),
            removed_testers: Mutex::new(Vec::new()),
            error_on_permission: Mutex::new(None),
            error_on_get_pr: Mutex::new(None),
            error_on_list_comments: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
            error_on_create_comment: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_remove_assignees: Mutex::new(None),
        }
    }

    /// Mock bound to `openeuler/kernel` on Gitee
    pub fn new() -> Self {
        Self::with_config(PlatformConfig {
            platform: Platform::Gitee,
            owner: "openeuler".to_string(),
            repo: "kernel".to_string(),
            host: None,
        })
    }

    // === Error injection methods ===

    /// Make `get_collaborator_permission` return an error
    pub fn fail_permission(&self, msg: &str) {
        *self.error_on_permission.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_pr_details` return an error
    pub fn fail_get_pr(&self, msg: &str) {
        *self.error_on_get_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_pr_comments` return an error
    pub fn fail_list_comments(&self, msg: &str) {
        *self.error_on_list_comments.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr_comment` return an error
    pub fn fail_create_comment(&self, msg: &str) {
        *self.error_on_create_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `remove_assignees` return an error
    pub fn fail_remove_assignees(&self, msg: &str) {
        *self.error_on_remove_assignees.lock().unwrap() = Some(msg.to_string());
    }

    // === State setup ===

    /// Insert or replace a PR
    pub fn set_pr(&self, details: PullRequestDetails) {
        self.prs.lock().unwrap().insert(details.number, details);
    }

    /// Replace the comment history of a PR (also sets its comment count)
    pub fn set_comments(&self, pr_number: u64, comments: Vec<Comment>) {
        if let Some(pr) = self.prs.lock().unwrap().get_mut(&pr_number) {
            pr.comment_count = comments.len() as u64;
        }
        self.comments.lock().unwrap().insert(pr_number, comments);
    }

    /// Set a user's collaborator permission
    pub fn set_permission(&self, user: &str, permission: Permission) {
        self.permissions
            .lock()
            .unwrap()
            .insert(user.to_string(), permission);
    }

    /// Set the response for `merge_pr`
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === State inspection ===

    /// Current labels of a PR
    pub fn labels(&self, pr_number: u64) -> Vec<String> {
        self.prs
            .lock()
            .unwrap()
            .get(&pr_number)
            .map(|pr| pr.labels.clone())
            .unwrap_or_default()
    }

    /// Current state of a PR
    pub fn state(&self, pr_number: u64) -> Option<PrState> {
        self.prs.lock().unwrap().get(&pr_number).map(|pr| pr.state)
    }

    // === Call verification methods ===

    /// Get all `create_pr_comment` calls
    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all label mutation calls
    pub fn get_label_calls(&self) -> Vec<LabelCall> {
        self.label_calls.lock().unwrap().clone()
    }

    /// Get all `list_pr_comments` calls as `(pr, page, per_page)`
    pub fn get_list_comments_calls(&self) -> Vec<(u64, u32, u32)> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    /// Get all users whose permission was looked up
    pub fn get_permission_calls(&self) -> Vec<String> {
        self.permission_calls.lock().unwrap().clone()
    }

    /// Logins passed to `remove_assignees`
    pub fn get_removed_assignees(&self) -> Vec<String> {
        self.removed_assignees.lock().unwrap().clone()
    }

    /// Logins passed to `remove_testers`
    pub fn get_removed_testers(&self) -> Vec<String> {
        self.removed_testers.lock().unwrap().clone()
    }

    /// Assert `body` was posted as a comment containing `needle`
    pub fn assert_commented(&self, needle: &str) {
        let calls = self.get_create_comment_calls();
        assert!(
            calls.iter().any(|c| c.body.contains(needle)),
            "expected a comment containing {needle:?}, got {calls:?}"
        );
    }

    /// Assert no side effects (no comments, labels or merges)
    pub fn assert_no_side_effects(&self) {
        assert!(self.get_create_comment_calls().is_empty());
        assert!(self.get_label_calls().is_empty());
        assert!(self.get_merge_pr_calls().is_empty());
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        match slot.lock().unwrap().clone() {
            Some(msg) => Err(Error::Platform(msg)),
            None => Ok(()),
        }
    }

    fn with_pr<T>(
        &self,
        pr_number: u64,
        f: impl FnOnce(&mut PullRequestDetails) -> T,
    ) -> Result<T> {
        self.prs
            .lock()
            .unwrap()
            .get_mut(&pr_number)
            .map(f)
            .ok_or_else(|| Error::Platform(format!("PR #{pr_number} not found")))
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_collaborator_permission(&self, user: &str) -> Result<Permission> {
        self.permission_calls.lock().unwrap().push(user.to_string());
        Self::injected(&self.error_on_permission)?;
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(user)
            .copied()
            .unwrap_or(Permission::None))
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        Self::injected(&self.error_on_get_pr)?;
        self.with_pr(pr_number, |pr| pr.clone())
    }

    async fn list_pr_comments(
        &self,
        pr_number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Comment>> {
        self.list_comments_calls
            .lock()
            .unwrap()
            .push((pr_number, page, per_page));
        Self::injected(&self.error_on_list_comments)?;

        let comments = self.comments.lock().unwrap();
        let all = comments.get(&pr_number).map_or(&[][..], Vec::as_slice);
        let start = (page.saturating_sub(1) * per_page) as usize;
        Ok(all
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.label_calls
            .lock()
            .unwrap()
            .push(LabelCall::Add(pr_number, labels.to_vec()));
        Self::injected(&self.error_on_add_labels)?;
        self.with_pr(pr_number, |pr| {
            for label in labels {
                if !pr.labels.contains(label) {
                    pr.labels.push(label.clone());
                }
            }
        })
    }

    async fn remove_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.label_calls
            .lock()
            .unwrap()
            .push(LabelCall::Remove(pr_number, labels.to_vec()));
        self.with_pr(pr_number, |pr| pr.labels.retain(|l| !labels.contains(l)))
    }

    async fn update_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.label_calls
            .lock()
            .unwrap()
            .push(LabelCall::Update(pr_number, labels.to_vec()));
        self.with_pr(pr_number, |pr| pr.labels = labels.to_vec())
    }

    async fn remove_assignees(&self, _pr_number: u64, logins: &[String]) -> Result<()> {
        Self::injected(&self.error_on_remove_assignees)?;
        self.removed_assignees
            .lock()
            .unwrap()
            .extend(logins.iter().cloned());
        Ok(())
    }

    async fn remove_testers(&self, _pr_number: u64, logins: &[String]) -> Result<()> {
        self.removed_testers
            .lock()
            .unwrap()
            .extend(logins.iter().cloned());
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, description: &str) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number,
            description: description.to_string(),
        });
        Self::injected(&self.error_on_merge_pr)?;

        let result = self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: None,
            });
        if result.merged {
            self.with_pr(pr_number, |pr| pr.state = PrState::Merged)?;
        }
        Ok(result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });
        Self::injected(&self.error_on_create_comment)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// An unedited comment by `author`, timestamped `minute` minutes in
pub fn comment(id: u64, author: &str, body: &str, minute: u32) -> Comment {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap();
    Comment {
        id,
        author: author.to_string(),
        body: body.to_string(),
        created_at: at,
        updated_at: at,
    }
}

/// A comment whose body was edited after posting
pub fn edited_comment(id: u64, author: &str, body: &str, minute: u32) -> Comment {
    let mut c = comment(id, author, body, minute);
    c.updated_at = Utc.with_ymd_and_hms(2024, 3, 1, 11, minute, 0).unwrap();
    c
}
