//! Branch-freeze gate
//!
//! A frozen branch only accepts merges triggered by one of its exempt owners.

use crate::pattern::Glob;
use serde::Deserialize;

/// Freeze rule for branches of one community
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FreezePolicy {
    /// Branch pattern (`*` wildcard)
    pub branch: Glob,
    /// Community the rule applies to
    pub community: String,
    /// Logins allowed to merge while frozen
    #[serde(default)]
    pub exempt_owners: Vec<String>,
}

impl FreezePolicy {
    /// Whether this policy covers `branch` in `community`
    pub fn applies_to(&self, branch: &str, community: &str) -> bool {
        self.community == community && self.branch.is_match(branch)
    }
}

/// Outcome of a freeze check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeCheck {
    /// Exempt owners of every matching policy (empty when nothing matched)
    pub exempt_owners: Vec<String>,
    /// Whether `actor` may merge into the branch
    pub can_merge: bool,
}

impl FreezeCheck {
    /// Branch is not frozen
    pub const fn open() -> Self {
        Self {
            exempt_owners: Vec::new(),
            can_merge: true,
        }
    }
}

/// Decide whether `actor` may merge into `branch` of `community`.
///
/// Exempt lists of all matching policies are merged, first occurrence wins.
pub fn check_frozen(
    policies: &[FreezePolicy],
    actor: &str,
    branch: &str,
    community: &str,
) -> FreezeCheck {
    let mut matched = false;
    let mut exempt_owners: Vec<String> = Vec::new();
    for policy in policies.iter().filter(|p| p.applies_to(branch, community)) {
        matched = true;
        for owner in &policy.exempt_owners {
            if !exempt_owners.contains(owner) {
                exempt_owners.push(owner.clone());
            }
        }
    }

    if !matched {
        return FreezeCheck::open();
    }

    let can_merge = exempt_owners.iter().any(|o| o == actor);
    FreezeCheck {
        exempt_owners,
        can_merge,
    }
}

