//! Platform service construction

use crate::error::Result;
use crate::platform::{GitHubService, GiteeService, PlatformService};
use crate::types::{Platform, PlatformConfig};

/// Create the platform service for `config`, authenticated with `token`
pub fn create_platform_service(
    config: &PlatformConfig,
    token: &str,
) -> Result<Box<dyn PlatformService>> {
    match config.platform {
        Platform::GitHub => Ok(Box::new(GitHubService::new(
            token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
        )?)),
        Platform::Gitee => Ok(Box::new(GiteeService::new(
            token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
        )?)),
    }
}
