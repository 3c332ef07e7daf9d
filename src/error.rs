//! Error types for merge-gate

use thiserror::Error;

/// Errors surfaced by the gate and its platform collaborators.
///
/// Policy outcomes (a blocked merge, a denied label mutation) are not errors;
/// they are reported through [`EligibilityDecision`](crate::merge::EligibilityDecision).
#[derive(Debug, Error)]
pub enum Error {
    /// Collaborator permission could not be read; the gating action is aborted
    #[error("failed to look up permission for '{user}': {source}")]
    PermissionLookup {
        /// Login whose permission was requested
        user: String,
        /// Underlying platform error
        #[source]
        source: Box<Error>,
    },

    /// PR details, labels or comments could not be read
    #[error("failed to read decision input: {0}")]
    DecisionInput(String),

    /// Adding, removing or replacing labels failed
    #[error("label mutation failed: {0}")]
    LabelMutation(String),

    /// The platform refused the merge (conflicts, protection rules, ...)
    #[error("merge rejected: {0}")]
    MergeRejected(String),

    /// A comment page used for provenance extraction was empty
    #[error("comment list is empty")]
    EmptyCommentSet,

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable API token
    #[error("authentication error: {0}")]
    Auth(String),

    /// GitHub API error with context
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Gitee API error with context
    #[error("Gitee API error: {0}")]
    GiteeApi(String),

    /// Generic platform error (used by test doubles and factories)
    #[error("platform error: {0}")]
    Platform(String),

    /// Error from octocrab
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Error from reqwest
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Wrap a platform failure as a permission lookup failure for `user`.
    pub fn permission_lookup(user: impl Into<String>, source: Self) -> Self {
        Self::PermissionLookup {
            user: user.into(),
            source: Box::new(source),
        }
    }
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
