//! Event gate: routes review events through permission, label and merge logic
//!
//! Every handler re-reads the PR from the platform before acting. Nothing is
//! cached between events, so concurrent events for one PR can at worst
//! repeat an idempotent label mutation.

mod messages;

use crate::command::Command;
use crate::community::Community;
use crate::config::GateConfig;
use crate::error::{Error, Result};
use crate::labels::strip_on_source_change;
use crate::merge::{EligibilityDecision, GatedAction, MergePolicy, decide, execute_merge};
use crate::permission;
use crate::platform::PlatformService;
use crate::types::{PrState, PullRequestDetails};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An inbound review event for the platform's repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    /// A comment was posted on a PR
    CommentAdded {
        /// PR number
        pr_number: u64,
        /// Login of the commenter
        commenter: String,
        /// Comment body
        body: String,
    },
    /// A PR was opened
    PullRequestOpened {
        /// PR number
        pr_number: u64,
    },
    /// A PR was updated; `action_desc` tells what changed
    PullRequestUpdated {
        /// PR number
        pr_number: u64,
        /// Platform action description (e.g. `source_branch_changed`)
        action_desc: String,
    },
    /// A PR was merged
    PullRequestMerged {
        /// PR number
        pr_number: u64,
    },
}

/// Result of one comment command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The command that ran
    pub command: Command,
    /// Decision reached, if the command led to one
    pub decision: Option<EligibilityDecision>,
}

/// What handling an event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing applied to this event
    Ignored,
    /// Commands found in a comment, in order
    Commands(Vec<CommandOutcome>),
    /// Labels added when the PR was opened
    Labeled(Vec<String>),
    /// Labels reconciled after a push
    Reconciled,
}

/// The merge gate for one repository
pub struct MergeGate {
    platform: Arc<dyn PlatformService>,
    community: Arc<dyn Community>,
    config: GateConfig,
}

impl MergeGate {
    /// Create a gate over a platform service and community directory
    pub fn new(
        platform: Arc<dyn PlatformService>,
        community: Arc<dyn Community>,
        config: GateConfig,
    ) -> Self {
        Self {
            platform,
            community,
            config,
        }
    }

    /// Gate configuration
    pub const fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Dispatch an event
    pub async fn handle_event(&self, event: &ReviewEvent) -> Result<EventOutcome> {
        match event {
            ReviewEvent::CommentAdded {
                pr_number,
                commenter,
                body,
            } => self.handle_comment(*pr_number, commenter, body).await,
            ReviewEvent::PullRequestOpened { pr_number } => {
                self.label_sig_on_open(*pr_number).await
            }
            ReviewEvent::PullRequestUpdated {
                pr_number,
                action_desc,
            } => {
                self.reconcile_labels_on_source_change(*pr_number, action_desc)
                    .await?;
                Ok(EventOutcome::Reconciled)
            }
            ReviewEvent::PullRequestMerged { pr_number } => {
                info!(pr_number, "pull request merged");
                Ok(EventOutcome::Ignored)
            }
        }
    }

    async fn fetch_pr(&self, pr_number: u64) -> Result<PullRequestDetails> {
        self.platform
            .get_pr_details(pr_number)
            .await
            .map_err(|e| Error::DecisionInput(format!("pull request #{pr_number}: {e}")))
    }

    async fn merge_policy(&self) -> Result<MergePolicy> {
        let freeze_policies = self
            .community
            .freeze_policies()
            .await
            .map_err(|e| Error::DecisionInput(format!("freeze policies: {e}")))?;
        Ok(MergePolicy {
            scheme: self.config.labels.clone(),
            lgtm: self
                .config
                .lgtm_requirement_for(&self.platform.config().full_name()),
            freeze_policies,
            community: self.config.community_name.clone(),
        })
    }

    /// Read the PR and decide without side effects
    pub async fn decide_only(
        &self,
        pr_number: u64,
        actor: &str,
    ) -> Result<(PullRequestDetails, EligibilityDecision)> {
        let pr = self.fetch_pr(pr_number).await?;
        let policy = self.merge_policy().await?;
        let decision = decide(&pr, actor, &policy);
        Ok((pr, decision))
    }

    /// Decide on `pr_number` on behalf of `actor` and act on the decision.
    ///
    /// Blocked: the reasons are posted as a comment. Eligible: assignees and
    /// testers are cleared and the PR is merged with its provenance trailer.
    /// A refused merge is reported in a comment and returned as
    /// [`Error::MergeRejected`].
    pub async fn evaluate_merge(&self, pr_number: u64, actor: &str) -> Result<EligibilityDecision> {
        let (pr, decision) = self.decide_only(pr_number, actor).await?;
        info!(pr_number, actor, labels = ?pr.labels, ?decision, "merge decision");

        match &decision {
            EligibilityDecision::Eligible => {
                if let Err(e) =
                    execute_merge(&*self.platform, &pr, self.config.merge.comments_per_page).await
                {
                    warn!(pr_number, error = %e, "merge failed");
                    self.comment_best_effort(pr_number, &messages::merge_failed(&e.to_string()))
                        .await;
                    return Err(e);
                }
            }
            EligibilityDecision::Blocked { .. } => {
                if let Some(message) = decision.block_message() {
                    self.comment_best_effort(pr_number, &message).await;
                }
            }
            EligibilityDecision::PermissionDenied { .. } => {}
        }
        Ok(decision)
    }

    /// Strip gating labels after new commits were pushed.
    ///
    /// Only runs when `action_desc` matches the configured flag and the PR
    /// carries labels. The retest comment is posted whether or not anything
    /// was stripped.
    pub async fn reconcile_labels_on_source_change(
        &self,
        pr_number: u64,
        action_desc: &str,
    ) -> Result<()> {
        let source_change = &self.config.source_change;
        if action_desc != source_change.action_flag {
            debug!(pr_number, action_desc, "update is not a source change");
            return Ok(());
        }

        let pr = self.fetch_pr(pr_number).await?;
        if pr.labels.is_empty() {
            return Ok(());
        }

        let strip = strip_on_source_change(&source_change.strip_labels, &pr.labels);
        if !strip.removed.is_empty() {
            info!(pr_number, removed = ?strip.removed, "removing labels after source change");
            self.platform
                .update_labels(pr_number, &strip.remaining)
                .await?;
            self.platform
                .create_pr_comment(
                    pr_number,
                    &messages::labels_stripped(&strip.removed, &self.config.bot_name),
                )
                .await?;
        }

        if !source_change.retest_comment.is_empty() {
            self.comment_best_effort(pr_number, &source_change.retest_comment)
                .await;
        }
        Ok(())
    }

    async fn label_sig_on_open(&self, pr_number: u64) -> Result<EventOutcome> {
        let full_name = self.platform.config().full_name();
        let Some(sig) = self.community.sig_for_repo(&full_name).await? else {
            return Ok(EventOutcome::Ignored);
        };

        let labels = vec![self.config.labels.sig_label(&sig)];
        if let Err(e) = self.platform.add_labels(pr_number, &labels).await {
            warn!(pr_number, error = %e, "unable to add sig label");
            return Ok(EventOutcome::Ignored);
        }
        Ok(EventOutcome::Labeled(labels))
    }

    async fn handle_comment(
        &self,
        pr_number: u64,
        commenter: &str,
        body: &str,
    ) -> Result<EventOutcome> {
        let commands = Command::parse_all(body);
        if commands.is_empty() {
            return Ok(EventOutcome::Ignored);
        }

        let pr = self.fetch_pr(pr_number).await?;
        if pr.state != PrState::Open {
            debug!(pr_number, state = %pr.state, "ignoring commands on a closed pull request");
            return Ok(EventOutcome::Ignored);
        }

        // Label commands run first; the merge is evaluated once afterwards
        // and its decision recorded on the last command that asked for it.
        let mut outcomes = Vec::with_capacity(commands.len());
        let mut evaluate_for = None;
        for command in commands {
            debug!(pr_number, commenter, %command, "running command");
            let decision = match command {
                Command::Approve => self.add_approved(&pr, commenter).await?,
                Command::CancelApprove => self.remove_approved(&pr, commenter).await?,
                Command::Lgtm => self.add_lgtm(&pr, commenter).await?,
                Command::CancelLgtm => self.remove_lgtm(&pr, commenter).await?,
                Command::CheckPr => None,
            };
            if decision.is_none()
                && matches!(command, Command::Approve | Command::Lgtm | Command::CheckPr)
            {
                evaluate_for = Some(outcomes.len());
            }
            outcomes.push(CommandOutcome { command, decision });
        }

        if let Some(index) = evaluate_for {
            outcomes[index].decision = Some(self.evaluate_merge(pr_number, commenter).await?);
        }
        Ok(EventOutcome::Commands(outcomes))
    }

    /// Resolve `login` and refuse `action` if it lacks authority.
    ///
    /// On refusal the no-permission comment is the only side effect.
    async fn authorize(
        &self,
        pr_number: u64,
        login: &str,
        action: GatedAction,
        label: &str,
    ) -> Result<Option<EligibilityDecision>> {
        let actor = permission::resolve(&*self.platform, &*self.community, login).await?;
        if actor.can_mutate_gating_labels() {
            return Ok(None);
        }

        info!(pr_number, login, %action, permission = %actor.permission, "permission denied");
        self.platform
            .create_pr_comment(pr_number, &messages::no_permission(login, action, label))
            .await?;
        Ok(Some(EligibilityDecision::PermissionDenied {
            actor: login.to_string(),
            action,
        }))
    }

    /// `Some` carries a refusal; `None` means the label was added.
    async fn add_approved(
        &self,
        pr: &PullRequestDetails,
        login: &str,
    ) -> Result<Option<EligibilityDecision>> {
        let label = self.config.labels.approved.clone();
        if let Some(denied) = self
            .authorize(pr.number, login, GatedAction::AddApproved, &label)
            .await?
        {
            return Ok(Some(denied));
        }

        self.platform
            .add_labels(pr.number, std::slice::from_ref(&label))
            .await?;
        self.platform
            .create_pr_comment(pr.number, &messages::label_added(&label, login))
            .await?;
        Ok(None)
    }

    async fn remove_approved(
        &self,
        pr: &PullRequestDetails,
        login: &str,
    ) -> Result<Option<EligibilityDecision>> {
        let label = self.config.labels.approved.clone();
        if let Some(denied) = self
            .authorize(pr.number, login, GatedAction::RemoveApproved, &label)
            .await?
        {
            return Ok(Some(denied));
        }

        self.platform
            .remove_labels(pr.number, std::slice::from_ref(&label))
            .await?;
        self.platform
            .create_pr_comment(pr.number, &messages::label_removed(&label, login))
            .await?;
        Ok(None)
    }

    fn lgtm_label(&self, login: &str) -> String {
        let requirement = self
            .config
            .lgtm_requirement_for(&self.platform.config().full_name());
        self.config.labels.lgtm_label_for(login, requirement)
    }

    async fn add_lgtm(
        &self,
        pr: &PullRequestDetails,
        login: &str,
    ) -> Result<Option<EligibilityDecision>> {
        if login == pr.author {
            info!(pr_number = pr.number, login, "author tried to lgtm own pull request");
            self.platform
                .create_pr_comment(pr.number, &messages::self_lgtm(login))
                .await?;
            return Ok(Some(EligibilityDecision::PermissionDenied {
                actor: login.to_string(),
                action: GatedAction::AddLgtm,
            }));
        }

        let label = self.lgtm_label(login);
        if let Some(denied) = self
            .authorize(pr.number, login, GatedAction::AddLgtm, &label)
            .await?
        {
            return Ok(Some(denied));
        }

        self.platform
            .add_labels(pr.number, std::slice::from_ref(&label))
            .await?;
        self.platform
            .create_pr_comment(pr.number, &messages::label_added(&label, login))
            .await?;
        Ok(None)
    }

    async fn remove_lgtm(
        &self,
        pr: &PullRequestDetails,
        login: &str,
    ) -> Result<Option<EligibilityDecision>> {
        let label = self.lgtm_label(login);
        if let Some(denied) = self
            .authorize(pr.number, login, GatedAction::RemoveLgtm, &label)
            .await?
        {
            return Ok(Some(denied));
        }

        self.platform
            .remove_labels(pr.number, std::slice::from_ref(&label))
            .await?;
        self.platform
            .create_pr_comment(pr.number, &messages::label_removed(&label, login))
            .await?;
        Ok(None)
    }

    async fn comment_best_effort(&self, pr_number: u64, body: &str) {
        if let Err(e) = self.platform.create_pr_comment(pr_number, body).await {
            warn!(pr_number, error = %e, "unable to add comment to pull request");
        }
    }
}
