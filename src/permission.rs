//! Permission resolution for gating-label mutations
//!
//! Three independent grants are OR-combined: collaborator role, the
//! repository owner list and ownership of the governing SIG.

use crate::community::Community;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::Actor;
use tracing::{debug, warn};

/// Resolve the authority of `login` on the platform's repository.
///
/// Any lookup failure aborts with [`Error::PermissionLookup`]; no default
/// role is assumed.
pub async fn resolve(
    platform: &dyn PlatformService,
    community: &dyn Community,
    login: &str,
) -> Result<Actor> {
    let full_name = platform.config().full_name();

    let permission = platform
        .get_collaborator_permission(login)
        .await
        .map_err(|e| {
            warn!(user = login, error = %e, "collaborator permission lookup failed");
            Error::permission_lookup(login, e)
        })?;

    let is_repo_owner = community
        .repo_owners(&full_name)
        .await
        .map_err(|e| Error::permission_lookup(login, e))?
        .iter()
        .any(|o| o == login);

    let is_sig_owner = match community
        .sig_for_repo(&full_name)
        .await
        .map_err(|e| Error::permission_lookup(login, e))?
    {
        Some(sig) => community
            .sig_owners(&sig)
            .await
            .map_err(|e| Error::permission_lookup(login, e))?
            .iter()
            .any(|o| o == login),
        None => false,
    };

    let actor = Actor {
        login: login.to_string(),
        permission,
        is_repo_owner,
        is_sig_owner,
    };
    debug!(
        user = login,
        %permission,
        is_repo_owner,
        is_sig_owner,
        "resolved permission"
    );
    Ok(actor)
}
