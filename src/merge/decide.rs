//! Merge eligibility - pure functions for deciding whether a PR may merge
//!
//! No I/O happens here. The gate reads the PR and policy beforehand, so the
//! same inputs always give the same [`EligibilityDecision`].

use crate::freeze::{FreezePolicy, check_frozen};
use crate::labels::{LabelScheme, LgtmRequirement, diff};
use crate::types::{PrState, PullRequestDetails};

/// Everything besides the PR that a decision depends on
#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Label naming and required/forbidden lists
    pub scheme: LabelScheme,
    /// Lgtm labels needed for this repository
    pub lgtm: LgtmRequirement,
    /// Freeze policies of all communities
    pub freeze_policies: Vec<FreezePolicy>,
    /// Community the repository belongs to
    pub community: String,
}

/// Label mutations that need gating authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedAction {
    /// Add the approval label
    AddApproved,
    /// Remove the approval label
    RemoveApproved,
    /// Add an lgtm label
    AddLgtm,
    /// Remove an lgtm label
    RemoveLgtm,
}

impl std::fmt::Display for GatedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddApproved => write!(f, "add approved"),
            Self::RemoveApproved => write!(f, "remove approved"),
            Self::AddLgtm => write!(f, "add lgtm"),
            Self::RemoveLgtm => write!(f, "remove lgtm"),
        }
    }
}

/// Why a PR cannot merge right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// The PR is not open
    NotOpen(PrState),
    /// Approval or lgtm labels are short
    LabelCount {
        /// Approval labels present (exactly one required)
        approved: usize,
        /// Lgtm labels of the required kind present
        lgtm: usize,
        /// Lgtm labels required
        required_lgtm: usize,
    },
    /// Required labels missing or forbidden labels present
    Labels {
        /// Required labels that are absent
        missing_required: Vec<String>,
        /// Forbidden labels that are present
        present_forbidden: Vec<String>,
    },
    /// Target branch is frozen for this actor
    Frozen {
        /// Users who may still merge
        exempt_owners: Vec<String>,
    },
    /// The platform reports conflicts or has not computed mergeability
    NotMergeable,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen(state) => write!(f, "The pull request is {state}."),
            Self::LabelCount {
                approved,
                lgtm,
                required_lgtm,
            } => write!(
                f,
                "The number of **lgtm** labels must be >= {required_lgtm} (current: {lgtm}) \
                 and there must be exactly one **approved** label (current: {approved})."
            ),
            Self::Labels {
                missing_required,
                present_forbidden,
            } => {
                let mut parts = Vec::new();
                if !missing_required.is_empty() {
                    parts.push(format!(
                        "Labels [**{}**] need to be added.",
                        missing_required.join(",")
                    ));
                }
                if !present_forbidden.is_empty() {
                    parts.push(format!(
                        "Labels [**{}**] need to be removed.",
                        present_forbidden.join(",")
                    ));
                }
                write!(f, "{}", parts.join(" "))
            }
            Self::Frozen { exempt_owners } if exempt_owners.is_empty() => write!(
                f,
                "The merge target has been frozen, and only the branch owner can merge."
            ),
            Self::Frozen { exempt_owners } => write!(
                f,
                "The merge target has been frozen, and only the branch owner( @{} ) can merge.",
                exempt_owners.join(" , @")
            ),
            Self::NotMergeable => write!(
                f,
                "The platform reports this pull request as not mergeable (conflicts or pending checks)."
            ),
        }
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityDecision {
    /// All conditions hold; the merge may proceed
    Eligible,
    /// At least one condition fails
    Blocked {
        /// Failing conditions, in evaluation order
        reasons: Vec<BlockReason>,
    },
    /// The actor lacks authority for a gating label mutation
    PermissionDenied {
        /// Login of the actor
        actor: String,
        /// The mutation that was refused
        action: GatedAction,
    },
}

impl EligibilityDecision {
    /// Whether the merge may proceed
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Human-readable comment for a blocked decision
    pub fn block_message(&self) -> Option<String> {
        let Self::Blocked { reasons } = self else {
            return None;
        };
        let mut message = String::from(
            "This pull request can not be merged, you can try it again when label requirement meets. :astonished:",
        );
        for reason in reasons {
            message.push_str("\n- ");
            message.push_str(&reason.to_string());
        }
        Some(message)
    }
}

/// Decide whether `pr` may be merged on behalf of `actor` (PURE - no I/O)
///
/// Conditions are checked in a fixed order and every failing one is
/// reported: open state, label counts, required/forbidden labels, branch
/// freeze, platform mergeability.
#[must_use]
pub fn decide(pr: &PullRequestDetails, actor: &str, policy: &MergePolicy) -> EligibilityDecision {
    let mut reasons = Vec::new();

    if pr.state != PrState::Open {
        reasons.push(BlockReason::NotOpen(pr.state));
    }

    let counts = policy.scheme.count(&pr.labels, policy.lgtm);
    if counts.approved != 1 || counts.lgtm < policy.lgtm.threshold {
        reasons.push(BlockReason::LabelCount {
            approved: counts.approved,
            lgtm: counts.lgtm,
            required_lgtm: policy.lgtm.threshold,
        });
    }

    let label_diff = diff(&policy.scheme.required, &policy.scheme.forbidden, &pr.labels);
    if !label_diff.is_satisfied() {
        reasons.push(BlockReason::Labels {
            missing_required: label_diff.missing_required,
            present_forbidden: label_diff.present_forbidden,
        });
    }

    let freeze = check_frozen(&policy.freeze_policies, actor, &pr.base_ref, &policy.community);
    if !freeze.can_merge {
        reasons.push(BlockReason::Frozen {
            exempt_owners: freeze.exempt_owners,
        });
    }

    if !pr.mergeable {
        reasons.push(BlockReason::NotMergeable);
    }

    if reasons.is_empty() {
        EligibilityDecision::Eligible
    } else {
        EligibilityDecision::Blocked { reasons }
    }
}
