//! Check command - evaluate a PR and merge it when eligible

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use merge_gate::error::Result;
use merge_gate::merge::EligibilityDecision;
use merge_gate::types::PullRequestDetails;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Only report the decision; post nothing and do not merge
    pub dry_run: bool,
}

/// Run the check command
pub async fn run_check(
    ctx: &CommandContext,
    pr_number: u64,
    actor: &str,
    options: CheckOptions,
) -> Result<()> {
    if options.dry_run {
        let (pr, decision) = ctx.gate.decide_only(pr_number, actor).await?;
        report_dry_run(&pr, &decision);
        return Ok(());
    }

    println!(
        "{} PR #{} in {}...",
        "Checking".emphasis(),
        pr_number,
        ctx.platform_config.full_name().accent()
    );
    let decision = ctx.gate.evaluate_merge(pr_number, actor).await?;
    print_decision(pr_number, &decision);
    Ok(())
}

/// Print the outcome of an evaluation that may have merged
pub fn print_decision(pr_number: u64, decision: &EligibilityDecision) {
    match decision {
        EligibilityDecision::Eligible => {
            println!("{} PR #{} merged", check(), pr_number);
        }
        EligibilityDecision::Blocked { reasons } => {
            println!("{} PR #{} cannot merge yet", cross(), pr_number);
            for reason in reasons {
                println!("    - {}", reason.muted());
            }
        }
        EligibilityDecision::PermissionDenied { actor, action } => {
            println!(
                "{} {} has no permission to {}",
                cross(),
                actor.accent(),
                action
            );
        }
    }
}

fn report_dry_run(pr: &PullRequestDetails, decision: &EligibilityDecision) {
    println!("{}:", format!("PR #{}", pr.number).emphasis());
    println!("  Author: {}", pr.author.accent());
    println!("  Target: {}", pr.base_ref.accent());
    if pr.labels.is_empty() {
        println!("  Labels: {}", "(none)".muted());
    } else {
        println!("  Labels: {}", pr.labels.join(", "));
    }
    println!();

    match decision {
        EligibilityDecision::Eligible => {
            println!("  {}", "✓ Would merge".success());
        }
        EligibilityDecision::Blocked { reasons } => {
            println!("  {}", "✗ Would not merge".warn());
            for reason in reasons {
                println!("    - {}", reason.muted());
            }
        }
        EligibilityDecision::PermissionDenied { actor, action } => {
            println!("  {} {} may not {}", "✗".warn(), actor, action);
        }
    }

    println!();
    if decision.is_eligible() {
        println!("{}", "Run without --dry-run to merge.".muted());
    }
}
