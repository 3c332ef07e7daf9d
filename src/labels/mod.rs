//! Label classification and reconciliation
//!
//! [`LabelScheme`] is the one place label names are interpreted. The
//! reconciler, the eligibility decision and the comment commands all go
//! through it, so prefix rules cannot drift apart between them.

mod reconcile;

pub use reconcile::{LabelDiff, LabelStrip, diff, strip_on_source_change};

use serde::Deserialize;

/// Category of a label name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCategory {
    /// The single approval label
    Approved,
    /// An lgtm label; `reviewer` is set for per-reviewer labels (`lgtm-alice`)
    Lgtm {
        /// Reviewer login taken from the label suffix
        reviewer: Option<String>,
    },
    /// A SIG ownership label (`sig/<name>`)
    Sig(String),
    /// Configured as required before merge
    Required,
    /// Configured as forbidden at merge time
    Forbidden,
    /// Anything else
    Other,
}

impl LabelCategory {
    /// Approval and lgtm labels gate merges directly
    pub const fn is_gating(&self) -> bool {
        matches!(self, Self::Approved | Self::Lgtm { .. })
    }
}

/// Naming rules for labels
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabelScheme {
    /// Name of the approval label
    pub approved: String,
    /// Name of the generic lgtm label
    pub lgtm: String,
    /// Prefix of per-reviewer lgtm labels
    pub lgtm_reviewer_prefix: String,
    /// Prefix of SIG labels
    pub sig_prefix: String,
    /// Labels that must be present before merge, in reporting order
    pub required: Vec<String>,
    /// Labels that must be absent at merge time, in reporting order
    pub forbidden: Vec<String>,
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self {
            approved: "approved".to_string(),
            lgtm: "lgtm".to_string(),
            lgtm_reviewer_prefix: "lgtm-".to_string(),
            sig_prefix: "sig/".to_string(),
            required: Vec::new(),
            forbidden: Vec::new(),
        }
    }
}

impl LabelScheme {
    /// Classify a label name.
    ///
    /// Gating and SIG categories take precedence over the configured
    /// required/forbidden lists. Total: every name lands in some category.
    pub fn classify(&self, name: &str) -> LabelCategory {
        if name == self.approved {
            return LabelCategory::Approved;
        }
        if name == self.lgtm {
            return LabelCategory::Lgtm { reviewer: None };
        }
        if let Some(reviewer) = non_empty_suffix(name, &self.lgtm_reviewer_prefix) {
            return LabelCategory::Lgtm {
                reviewer: Some(reviewer.to_string()),
            };
        }
        if let Some(sig) = non_empty_suffix(name, &self.sig_prefix) {
            return LabelCategory::Sig(sig.to_string());
        }
        if self.required.iter().any(|r| r == name) {
            return LabelCategory::Required;
        }
        if self.forbidden.iter().any(|f| f == name) {
            return LabelCategory::Forbidden;
        }
        LabelCategory::Other
    }

    /// Label an lgtm from `reviewer` should produce under `requirement`
    pub fn lgtm_label_for(&self, reviewer: &str, requirement: LgtmRequirement) -> String {
        if requirement.per_reviewer {
            format!("{}{reviewer}", self.lgtm_reviewer_prefix)
        } else {
            self.lgtm.clone()
        }
    }

    /// SIG label for a SIG name
    pub fn sig_label(&self, sig: &str) -> String {
        format!("{}{sig}", self.sig_prefix)
    }

    /// Count approval and lgtm labels in `labels`.
    ///
    /// In per-reviewer mode only `lgtm-<login>` labels count toward lgtm;
    /// otherwise any lgtm label does.
    pub fn count<S: AsRef<str>>(
        &self,
        labels: &[S],
        requirement: LgtmRequirement,
    ) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for name in labels {
            match self.classify(name.as_ref()) {
                LabelCategory::Approved => counts.approved += 1,
                LabelCategory::Lgtm { reviewer } => {
                    if !requirement.per_reviewer || reviewer.is_some() {
                        counts.lgtm += 1;
                    }
                }
                _ => {}
            }
        }
        counts
    }
}

fn non_empty_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    name.strip_prefix(prefix).filter(|s| !s.is_empty())
}

/// How many lgtm labels a merge needs, and of which kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LgtmRequirement {
    /// Count per-reviewer `lgtm-<login>` labels instead of the generic one
    pub per_reviewer: bool,
    /// Minimum number of lgtm labels
    pub threshold: usize,
}

impl LgtmRequirement {
    /// Derive the requirement from a configured lgtm count.
    ///
    /// More than one required lgtm switches to per-reviewer labels;
    /// anything else means one generic `lgtm`.
    pub const fn from_count(count: usize) -> Self {
        if count > 1 {
            Self {
                per_reviewer: true,
                threshold: count,
            }
        } else {
            Self {
                per_reviewer: false,
                threshold: 1,
            }
        }
    }
}

/// Gating label counts on a PR
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    /// Number of approval labels
    pub approved: usize,
    /// Number of lgtm labels of the required kind
    pub lgtm: usize,
}

