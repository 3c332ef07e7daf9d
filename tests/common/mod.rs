//! Shared fixtures for merge-gate tests

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::{
    CreateCommentCall, LabelCall, MergePrCall, MockPlatformService, comment, edited_comment,
};

use merge_gate::community::{CommunityConfig, SigConfig, StaticCommunity};
use merge_gate::config::GateConfig;
use merge_gate::freeze::FreezePolicy;
use merge_gate::gate::MergeGate;
use merge_gate::labels::{LabelScheme, LgtmRequirement};
use merge_gate::merge::MergePolicy;
use merge_gate::pattern::Glob;
use merge_gate::types::{PrState, PullRequestDetails};
use std::sync::Arc;

/// Repository the mock platform is bound to
pub const REPO: &str = "openeuler/kernel";

/// Open, mergeable PR by `alice` into `master` carrying `labels`
pub fn make_pr(number: u64, labels: &[&str]) -> PullRequestDetails {
    PullRequestDetails {
        number,
        author: "alice".to_string(),
        state: PrState::Open,
        base_ref: "master".to_string(),
        head_ref: format!("feature-{number}"),
        labels: labels.iter().map(ToString::to_string).collect(),
        mergeable: true,
        comment_count: 0,
        assignees: vec!["rev1".to_string()],
        testers: vec!["qa1".to_string()],
    }
}

/// Freeze policy for `branch` in the `openeuler` community
pub fn freeze(branch: &str, exempt: &[&str]) -> FreezePolicy {
    FreezePolicy {
        branch: Glob::new(branch).unwrap(),
        community: "openeuler".to_string(),
        exempt_owners: exempt.iter().map(ToString::to_string).collect(),
    }
}

/// Merge policy with default labels and `lgtm_count` required lgtms
pub fn policy(lgtm_count: usize) -> MergePolicy {
    MergePolicy {
        scheme: LabelScheme::default(),
        lgtm: LgtmRequirement::from_count(lgtm_count),
        freeze_policies: Vec::new(),
        community: "openeuler".to_string(),
    }
}

/// Community where `owner1` owns the repo and `sigowner` owns `Kernel`
pub fn community_config() -> CommunityConfig {
    CommunityConfig {
        owners: [(REPO.to_string(), vec!["owner1".to_string()])]
            .into_iter()
            .collect(),
        sigs: vec![SigConfig {
            name: "Kernel".to_string(),
            repositories: vec![REPO.to_string()],
            owners: vec!["sigowner".to_string()],
        }],
        frozen: Vec::new(),
    }
}

/// Gate config with the fixture community
pub fn gate_config() -> GateConfig {
    GateConfig {
        community: community_config(),
        ..GateConfig::default()
    }
}

/// Gate over `mock` using `config`
pub fn make_gate(mock: &Arc<MockPlatformService>, config: GateConfig) -> MergeGate {
    let community = StaticCommunity::new(config.community.clone());
    MergeGate::new(mock.clone(), Arc::new(community), config)
}
