//! Review provenance recovered from PR comments
//!
//! `/lgtm` and `/approve` comments become `Reviewed-by` and `Signed-off-by`
//! trailers on the merge. Edited comments and the author's own comments
//! never count.

use crate::command::Command;
use crate::error::{Error, Result};
use crate::types::Comment;

/// Whether `body` contains an lgtm grant command
pub fn is_lgtm_grant(body: &str) -> bool {
    Command::parse_all(body).contains(&Command::Lgtm)
}

/// Whether `body` contains an approve grant command
pub fn is_approve_grant(body: &str) -> bool {
    Command::parse_all(body).contains(&Command::Approve)
}

/// Signers (approvers) and reviewers, as `@login` entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// One entry per counted `/approve`
    pub signers: Vec<String>,
    /// One entry per counted `/lgtm`
    pub reviewers: Vec<String>,
}

impl Provenance {
    /// Append another page's grants
    pub fn extend(&mut self, other: Self) {
        self.signers.extend(other.signers);
        self.reviewers.extend(other.reviewers);
    }

    /// Merge commit description with the provenance trailer
    pub fn merge_description(&self, author: &str) -> String {
        format!(
            "From: @{author}\nReviewed-by: {}\nSigned-off-by: {}\n",
            dedup(&self.reviewers).join(","),
            dedup(&self.signers).join(",")
        )
    }
}

fn dedup(entries: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(entries.len());
    for e in entries {
        if !seen.contains(&e.as_str()) {
            seen.push(e);
        }
    }
    seen
}

/// Collect grants from one page of comments.
///
/// Fails with [`Error::EmptyCommentSet`] when the page is empty. Repeated
/// grants by the same user are kept.
pub fn extract(pr_author: &str, comments: &[Comment]) -> Result<Provenance> {
    if comments.is_empty() {
        return Err(Error::EmptyCommentSet);
    }

    let mut provenance = Provenance::default();
    for comment in comments {
        if !comment.is_unedited() || comment.author == pr_author {
            continue;
        }
        if is_lgtm_grant(&comment.body) {
            provenance.reviewers.push(format!("@{}", comment.author));
        }
        if is_approve_grant(&comment.body) {
            provenance.signers.push(format!("@{}", comment.author));
        }
    }
    Ok(provenance)
}

