//! Shared command context for CLI commands
//!
//! Every subcommand needs the same setup: load config, resolve the token,
//! build the platform service and wrap it in a [`MergeGate`].

use merge_gate::auth::{AuthSource, resolve_token};
use merge_gate::community::StaticCommunity;
use merge_gate::config::GateConfig;
use merge_gate::error::{Error, Result};
use merge_gate::gate::MergeGate;
use merge_gate::platform::create_platform_service;
use merge_gate::types::{Platform, PlatformConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Repository selection from global CLI flags
#[derive(Debug, Clone)]
pub struct RepoArgs<'a> {
    /// `owner/repo`
    pub repo: &'a str,
    /// Hosting platform
    pub platform: Platform,
    /// Self-hosted host, if any
    pub host: Option<&'a str>,
}

/// Shared context for CLI commands that talk to the platform
pub struct CommandContext {
    /// Gate bound to the selected repository
    pub gate: MergeGate,
    /// Repository the gate operates on
    pub platform_config: PlatformConfig,
}

impl CommandContext {
    /// Load config from `config_path` (or the default location) and connect
    pub fn new(config_path: Option<&Path>, repo: &RepoArgs<'_>) -> Result<Self> {
        let config = GateConfig::load(config_path)?;
        let platform_config = parse_repo(repo)?;

        let (token, source) = resolve_token(platform_config.platform, config.token.as_deref())?;
        debug!(
            platform = %platform_config.platform,
            repo = %platform_config.full_name(),
            from_env = source == AuthSource::EnvVar,
            "resolved token"
        );

        let platform = create_platform_service(&platform_config, &token)?;
        let community = StaticCommunity::new(config.community.clone());
        let gate = MergeGate::new(Arc::from(platform), Arc::new(community), config);

        Ok(Self {
            gate,
            platform_config,
        })
    }
}

fn parse_repo(args: &RepoArgs<'_>) -> Result<PlatformConfig> {
    let (owner, repo) = args
        .repo
        .split_once('/')
        .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
        .ok_or_else(|| Error::Config(format!("expected owner/repo, got '{}'", args.repo)))?;

    Ok(PlatformConfig {
        platform: args.platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: args.host.map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(repo: &str) -> RepoArgs<'_> {
        RepoArgs {
            repo,
            platform: Platform::Gitee,
            host: None,
        }
    }

    #[test]
    fn test_parse_repo() {
        let config = parse_repo(&args("openeuler/kernel")).unwrap();
        assert_eq!(config.owner, "openeuler");
        assert_eq!(config.repo, "kernel");
        assert_eq!(config.platform, Platform::Gitee);
    }

    #[test]
    fn test_parse_repo_rejects_malformed() {
        for bad in ["kernel", "/kernel", "openeuler/", "a/b/c"] {
            assert!(matches!(parse_repo(&args(bad)), Err(Error::Config(_))), "{bad}");
        }
    }
}
