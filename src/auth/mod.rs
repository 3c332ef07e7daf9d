//! Authentication for GitHub and Gitee
//!
//! Tokens come from environment variables first, then from the config file.

use crate::error::{Error, Result};
use crate::types::Platform;
use std::env;

/// Environment variable checked before the platform-specific ones
pub const TOKEN_ENV: &str = "MERGE_GATE_TOKEN";

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the config file
    Config,
}

const fn platform_env(platform: Platform) -> &'static str {
    match platform {
        Platform::GitHub => "GITHUB_TOKEN",
        Platform::Gitee => "GITEE_TOKEN",
    }
}

/// Resolve the API token for `platform`
pub fn resolve_token(platform: Platform, configured: Option<&str>) -> Result<(String, AuthSource)> {
    for var in [TOKEN_ENV, platform_env(platform)] {
        if let Ok(token) = env::var(var)
            && !token.trim().is_empty()
        {
            return Ok((token.trim().to_string(), AuthSource::EnvVar));
        }
    }

    match configured {
        Some(token) if !token.trim().is_empty() => {
            Ok((token.trim().to_string(), AuthSource::Config))
        }
        _ => Err(Error::Auth(format!(
            "no {platform} token found: set {TOKEN_ENV}, {} or `token` in the config file",
            platform_env(platform)
        ))),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            env::remove_var(TOKEN_ENV);
            env::remove_var("GITHUB_TOKEN");
            env::remove_var("GITEE_TOKEN");
        }
    }

    #[test]
    #[serial]
    fn test_env_takes_precedence() {
        clear_env();
        unsafe { env::set_var("GITEE_TOKEN", "from-env") };
        let (token, source) = resolve_token(Platform::Gitee, Some("from-config")).unwrap();
        assert_eq!(token, "from-env");
        assert_eq!(source, AuthSource::EnvVar);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_generic_env_wins_over_platform_env() {
        clear_env();
        unsafe {
            env::set_var(TOKEN_ENV, "generic");
            env::set_var("GITHUB_TOKEN", "github");
        }
        let (token, _) = resolve_token(Platform::GitHub, None).unwrap();
        assert_eq!(token, "generic");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_fallback() {
        clear_env();
        let (token, source) = resolve_token(Platform::GitHub, Some(" abc ")).unwrap();
        assert_eq!(token, "abc");
        assert_eq!(source, AuthSource::Config);
    }

    #[test]
    #[serial]
    fn test_missing_token_errors() {
        clear_env();
        let result = resolve_token(Platform::Gitee, None);
        assert!(matches!(result, Err(Error::Auth(_))));
    }
}
