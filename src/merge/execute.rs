//! Merge execution - effectful operations
//!
//! Runs only after [`decide`](super::decide) returned `Eligible`: clears
//! assignees and testers, rebuilds the provenance trailer from comment
//! history and asks the platform to merge.

use crate::error::{Error, Result};
use crate::platform::{MAX_PER_PAGE, PlatformService};
use crate::provenance::{Provenance, extract};
use crate::types::{MergeResult, PullRequestDetails};
use tracing::{debug, info, warn};

/// Walk the PR's comment history and collect every grant.
///
/// `per_page` is capped at [`MAX_PER_PAGE`] before the page count is
/// computed, since the platforms never return more. Pages are fetched last
/// to first and their grants accumulated. An empty page is logged and
/// skipped; a fetch failure aborts.
pub async fn collect_provenance(
    platform: &dyn PlatformService,
    pr: &PullRequestDetails,
    per_page: u32,
) -> Result<Provenance> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let pages = pr.comment_count.div_ceil(u64::from(per_page)).max(1);
    let pages = u32::try_from(pages)
        .map_err(|_| Error::DecisionInput(format!("too many comment pages: {pages}")))?;

    let mut provenance = Provenance::default();
    for page in (1..=pages).rev() {
        let comments = platform
            .list_pr_comments(pr.number, page, per_page)
            .await
            .map_err(|e| Error::DecisionInput(format!("comments page {page}: {e}")))?;

        match extract(&pr.author, &comments) {
            Ok(found) => provenance.extend(found),
            Err(e) => warn!(pr_number = pr.number, page, error = %e, "skipping comment page"),
        }
    }

    debug!(
        pr_number = pr.number,
        signers = ?provenance.signers,
        reviewers = ?provenance.reviewers,
        "collected provenance"
    );
    Ok(provenance)
}

/// Perform the merge of an eligible PR (EFFECTFUL)
///
/// Assignee and tester cleanup failures are logged and do not stop the
/// merge. A refused merge is returned as [`Error::MergeRejected`] carrying
/// the platform's message; it is never retried here.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    pr: &PullRequestDetails,
    per_page: u32,
) -> Result<MergeResult> {
    if let Err(e) = platform.remove_assignees(pr.number, &pr.assignees).await {
        warn!(pr_number = pr.number, error = %e, "unable to remove assignees");
    }
    if let Err(e) = platform.remove_testers(pr.number, &pr.testers).await {
        warn!(pr_number = pr.number, error = %e, "unable to remove testers");
    }

    let provenance = collect_provenance(platform, pr, per_page).await?;
    let description = provenance.merge_description(&pr.author);

    let result = match platform.merge_pr(pr.number, &description).await {
        Ok(result) => result,
        Err(e @ Error::MergeRejected(_)) => return Err(e),
        Err(e) => return Err(Error::MergeRejected(e.to_string())),
    };

    if !result.merged {
        return Err(Error::MergeRejected(
            result
                .message
                .unwrap_or_else(|| "platform did not merge the pull request".to_string()),
        ));
    }

    let sha_display = result.sha.as_deref().unwrap_or("(no sha)");
    info!(pr_number = pr.number, sha = sha_display, "merged pull request");
    Ok(result)
}
