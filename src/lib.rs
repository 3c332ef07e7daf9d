//! merge-gate: merge eligibility policy for pull requests
//!
//! Decides whether a pull request may merge from its review labels,
//! required/forbidden labels, branch-freeze policy and platform
//! mergeability, and merges it with a `Reviewed-by` / `Signed-off-by`
//! trailer recovered from comment history.
//!
//! Works with GitHub and Gitee through the [`platform::PlatformService`]
//! trait. The pure decision lives in [`merge::decide`]; [`gate::MergeGate`]
//! wires it to review events.

pub mod auth;
pub mod command;
pub mod community;
pub mod config;
pub mod error;
pub mod freeze;
pub mod gate;
pub mod labels;
pub mod merge;
pub mod pattern;
pub mod permission;
pub mod platform;
pub mod provenance;
pub mod types;

pub use error::{Error, Result};
