//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{MAX_PER_PAGE, PlatformService};
use crate::types::{
    Comment, MergeResult, Permission, Platform, PlatformConfig, PrState, PullRequestDetails,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct CollaboratorPermission {
    permission: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }
}

/// GitHub answers 404 when removing a label the issue does not carry
fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn logins(authors: Option<&Vec<octocrab::models::Author>>) -> Vec<String> {
    authors
        .map(|v| v.iter().map(|a| a.login.clone()).collect())
        .unwrap_or_default()
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_collaborator_permission(&self, user: &str) -> Result<Permission> {
        debug!(user, "getting collaborator permission");
        let route = format!(
            "/repos/{}/{}/collaborators/{user}/permission",
            self.config.owner, self.config.repo
        );
        let response: CollaboratorPermission = self.client.get(route, None::<&()>).await?;
        let permission = Permission::from_platform(&response.permission);
        debug!(user, %permission, "got collaborator permission");
        Ok(permission)
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR details");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let state = match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
            // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
            Some(_) | None => PrState::Closed,
        };

        let details = PullRequestDetails {
            number: pr.number,
            author: pr.user.as_ref().map(|u| u.login.clone()).unwrap_or_default(),
            state,
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            labels: pr
                .labels
                .as_ref()
                .map(|v| v.iter().map(|l| l.name.clone()).collect())
                .unwrap_or_default(),
            // Unknown (still computing) is not mergeable yet
            mergeable: pr.mergeable.unwrap_or(false),
            comment_count: pr.comments.unwrap_or(0),
            assignees: logins(pr.assignees.as_ref()),
            testers: Vec::new(),
        };

        debug!(pr_number, state = ?details.state, labels = ?details.labels, "got PR details");
        Ok(details)
    }

    async fn list_pr_comments(
        &self,
        pr_number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Comment>> {
        debug!(pr_number, page, per_page, "listing PR comments");
        let per_page = u8::try_from(per_page.min(MAX_PER_PAGE)).unwrap_or(u8::MAX);
        let comments = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_comments(pr_number)
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        let result: Vec<Comment> = comments
            .items
            .into_iter()
            .map(|c| Comment {
                id: c.id.0,
                author: c.user.login,
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
                updated_at: c.updated_at.unwrap_or(c.created_at),
            })
            .collect();
        debug!(pr_number, page, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, labels)
            .await
            .map_err(|e| Error::LabelMutation(format!("add {labels:?}: {e}")))?;
        Ok(())
    }

    async fn remove_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "removing labels");
        let issues = self.client.issues(&self.config.owner, &self.config.repo);
        for label in labels {
            match issues.remove_label(pr_number, label).await {
                Ok(_) => {}
                Err(e) if is_not_found(&e) => {
                    debug!(pr_number, label, "label already absent");
                }
                Err(e) => return Err(Error::LabelMutation(format!("remove '{label}': {e}"))),
            }
        }
        Ok(())
    }

    async fn update_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "replacing labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .replace_all_labels(pr_number, labels)
            .await
            .map_err(|e| Error::LabelMutation(format!("replace with {labels:?}: {e}")))?;
        Ok(())
    }

    async fn remove_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        if logins.is_empty() {
            return Ok(());
        }
        debug!(pr_number, ?logins, "removing assignees");
        let names: Vec<&str> = logins.iter().map(String::as_str).collect();
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .remove_assignees(pr_number, &names)
            .await?;
        Ok(())
    }

    async fn remove_testers(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        // GitHub has no tester role
        debug!(pr_number, ?logins, "ignoring tester removal on GitHub");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, description: &str) -> Result<MergeResult> {
        debug!(pr_number, "merging PR");

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Merge)
            .message(description)
            .send()
            .await
            .map_err(|e| Error::MergeRejected(e.to_string()))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
