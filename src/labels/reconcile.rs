//! Label deltas - pure functions, no I/O
//!
//! Mutations themselves go through `PlatformService`; this only decides
//! which names to mutate.

use crate::pattern::Glob;

/// Unsatisfied label constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDiff {
    /// Required labels absent from the PR, in configured order
    pub missing_required: Vec<String>,
    /// Forbidden labels present on the PR, in configured order
    pub present_forbidden: Vec<String>,
}

impl LabelDiff {
    /// No constraint is violated
    pub fn is_satisfied(&self) -> bool {
        self.missing_required.is_empty() && self.present_forbidden.is_empty()
    }
}

/// Compare configured required/forbidden lists against the current labels
pub fn diff<S: AsRef<str>>(
    required: &[String],
    forbidden: &[String],
    current: &[S],
) -> LabelDiff {
    let has = |name: &str| current.iter().any(|l| l.as_ref() == name);
    LabelDiff {
        missing_required: required.iter().filter(|r| !has(r)).cloned().collect(),
        present_forbidden: forbidden.iter().filter(|f| has(f)).cloned().collect(),
    }
}

/// Outcome of stripping labels after the source branch changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStrip {
    /// Labels to drop, in current-label order
    pub removed: Vec<String>,
    /// Labels left on the PR, in current-label order
    pub remaining: Vec<String>,
}

/// Split `current` into labels matched by `to_strip` and the rest
pub fn strip_on_source_change<S: AsRef<str>>(to_strip: &[Glob], current: &[S]) -> LabelStrip {
    let mut strip = LabelStrip::default();
    for label in current {
        let label = label.as_ref();
        if to_strip.iter().any(|g| g.is_match(label)) {
            strip.removed.push(label.to_string());
        } else {
            strip.remaining.push(label.to_string());
        }
    }
    strip
}

