//! Gitee platform service implementation (REST API v5)

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Comment, MergeResult, Permission, Platform, PlatformConfig, PrState, PullRequestDetails,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Gitee service using reqwest
pub struct GiteeService {
    client: Client,
    token: String,
    api_url: String,
    config: PlatformConfig,
}

#[derive(Deserialize)]
struct User {
    login: String,
}

#[derive(Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

#[derive(Deserialize)]
struct PullRequest {
    number: u64,
    state: String, // "open", "closed", "merged"
    user: User,
    base: BranchRef,
    head: BranchRef,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    mergeable: Option<bool>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    assignees: Vec<User>,
    #[serde(default)]
    testers: Vec<User>,
}

#[derive(Deserialize)]
struct PrComment {
    id: u64,
    #[serde(default)]
    body: String,
    user: User,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CollaboratorPermission {
    permission: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MergeResponse {
    sha: Option<String>,
    merged: bool,
    message: Option<String>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    access_token: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct UpdateLabelsBody<'a> {
    access_token: &'a str,
    labels: String,
}

#[derive(Serialize)]
struct MergeBody<'a> {
    access_token: &'a str,
    description: &'a str,
}

impl GiteeService {
    /// Create a new Gitee service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_url = format!("https://{}/api/v5", host.as_deref().unwrap_or("gitee.com"));
        Self::build(token, owner, repo, host, api_url)
    }

    /// Create a service against an explicit API base URL (e.g. a test server)
    pub fn with_api_url(token: &str, owner: String, repo: String, api_url: String) -> Result<Self> {
        Self::build(token, owner, repo, None, api_url)
    }

    fn build(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        api_url: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("merge-gate")
            .build()
            .map_err(|e| Error::GiteeApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            config: PlatformConfig {
                platform: Platform::Gitee,
                owner,
                repo,
                host,
            },
        })
    }

    fn pr_url(&self, pr_number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{pr_number}",
            self.api_url,
            urlencoding::encode(&self.config.owner),
            urlencoding::encode(&self.config.repo)
        )
    }

    async fn check(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(Error::GiteeApi(format!("{context}: {status}: {text}")))
    }
}

#[async_trait]
impl PlatformService for GiteeService {
    async fn get_collaborator_permission(&self, user: &str) -> Result<Permission> {
        debug!(user, "getting collaborator permission");
        let url = format!(
            "{}/repos/{}/{}/collaborators/{}/permission",
            self.api_url,
            urlencoding::encode(&self.config.owner),
            urlencoding::encode(&self.config.repo),
            urlencoding::encode(user)
        );
        let response = self
            .client
            .get(&url)
            .query(&[("access_token", &self.token)])
            .send()
            .await?;
        let body: CollaboratorPermission = Self::check(response, "get permission")
            .await?
            .json()
            .await?;
        let permission = Permission::from_platform(&body.permission);
        debug!(user, %permission, "got collaborator permission");
        Ok(permission)
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR details");
        let response = self
            .client
            .get(self.pr_url(pr_number))
            .query(&[("access_token", &self.token)])
            .send()
            .await?;
        let pr: PullRequest = Self::check(response, "get pull request")
            .await?
            .json()
            .await?;

        let state = match pr.state.as_str() {
            "open" => PrState::Open,
            "merged" => PrState::Merged,
            _ => PrState::Closed,
        };

        let details = PullRequestDetails {
            number: pr.number,
            author: pr.user.login,
            state,
            base_ref: pr.base.ref_field,
            head_ref: pr.head.ref_field,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
            mergeable: pr.mergeable.unwrap_or(false),
            comment_count: pr.comments,
            assignees: pr.assignees.into_iter().map(|u| u.login).collect(),
            testers: pr.testers.into_iter().map(|u| u.login).collect(),
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
        let response = self
            .client
            .get(format!("{}/comments", self.pr_url(pr_number)))
            .query(&[
                ("access_token", self.token.clone()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;
        let comments: Vec<PrComment> = Self::check(response, "list comments")
            .await?
            .json()
            .await?;

        let result: Vec<Comment> = comments
            .into_iter()
            .map(|c| Comment {
                id: c.id,
                author: c.user.login,
                body: c.body,
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect();
        debug!(pr_number, page, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        let response = self
            .client
            .post(format!("{}/labels", self.pr_url(pr_number)))
            .query(&[("access_token", &self.token)])
            .json(labels)
            .send()
            .await?;
        Self::check(response, "add labels")
            .await
            .map_err(|e| Error::LabelMutation(e.to_string()))?;
        Ok(())
    }

    async fn remove_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "removing labels");
        for label in labels {
            let response = self
                .client
                .delete(format!(
                    "{}/labels/{}",
                    self.pr_url(pr_number),
                    urlencoding::encode(label)
                ))
                .query(&[("access_token", &self.token)])
                .send()
                .await?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!(pr_number, label, "label already absent");
                continue;
            }
            Self::check(response, "remove label")
                .await
                .map_err(|e| Error::LabelMutation(e.to_string()))?;
        }
        Ok(())
    }

    async fn update_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        let csv = labels.join(",");
        debug!(pr_number, labels = %csv, "replacing labels");
        let response = self
            .client
            .patch(self.pr_url(pr_number))
            .json(&UpdateLabelsBody {
                access_token: &self.token,
                labels: csv,
            })
            .send()
            .await?;
        // Gitee answers 400 on some label replacements it has already applied
        if response.status() == StatusCode::BAD_REQUEST {
            info!(pr_number, "label update answered 400, treating as applied");
            return Ok(());
        }
        Self::check(response, "update labels")
            .await
            .map_err(|e| Error::LabelMutation(e.to_string()))?;
        Ok(())
    }

    async fn remove_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        if logins.is_empty() {
            return Ok(());
        }
        debug!(pr_number, ?logins, "removing assignees");
        let response = self
            .client
            .delete(format!("{}/assignees", self.pr_url(pr_number)))
            .query(&[
                ("access_token", self.token.clone()),
                ("assignees", logins.join(",")),
            ])
            .send()
            .await?;
        Self::check(response, "remove assignees").await?;
        Ok(())
    }

    async fn remove_testers(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        if logins.is_empty() {
            return Ok(());
        }
        debug!(pr_number, ?logins, "removing testers");
        let response = self
            .client
            .delete(format!("{}/testers", self.pr_url(pr_number)))
            .query(&[
                ("access_token", self.token.clone()),
                ("testers", logins.join(",")),
            ])
            .send()
            .await?;
        Self::check(response, "remove testers").await?;
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, description: &str) -> Result<MergeResult> {
        debug!(pr_number, "merging PR");
        let response = self
            .client
            .put(format!("{}/merge", self.pr_url(pr_number)))
            .json(&MergeBody {
                access_token: &self.token,
                description,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::MergeRejected(format!("{status}: {text}")));
        }

        // Gitee does not always return a body on success
        let parsed: MergeResponse = if text.trim().is_empty() {
            MergeResponse {
                merged: true,
                ..MergeResponse::default()
            }
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::GiteeApi(format!("Failed to parse merge response: {e}")))?
        };

        let merge_result = MergeResult {
            merged: parsed.merged,
            sha: parsed.sha,
            message: parsed.message,
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
        let response = self
            .client
            .post(format!("{}/comments", self.pr_url(pr_number)))
            .json(&CommentBody {
                access_token: &self.token,
                body,
            })
            .send()
            .await?;
        Self::check(response, "create comment").await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
