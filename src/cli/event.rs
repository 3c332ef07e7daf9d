//! Event commands - feed a single review event through the gate

use crate::cli::check::print_decision;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_gate::error::Result;
use merge_gate::gate::{EventOutcome, ReviewEvent};

/// Run the gate on one event and report what it did
pub async fn run_event(ctx: &CommandContext, event: ReviewEvent) -> Result<()> {
    let pr_number = match &event {
        ReviewEvent::CommentAdded { pr_number, .. }
        | ReviewEvent::PullRequestOpened { pr_number }
        | ReviewEvent::PullRequestUpdated { pr_number, .. }
        | ReviewEvent::PullRequestMerged { pr_number } => *pr_number,
    };

    match ctx.gate.handle_event(&event).await? {
        EventOutcome::Ignored => {
            println!("{}", "Nothing to do.".muted());
        }
        EventOutcome::Commands(outcomes) => {
            for outcome in outcomes {
                println!("{} {}", check(), outcome.command.to_string().emphasis());
                if let Some(decision) = &outcome.decision {
                    print_decision(pr_number, decision);
                }
            }
        }
        EventOutcome::Labeled(labels) => {
            println!(
                "{} Labeled PR #{} with {}",
                check(),
                pr_number,
                labels.join(", ").accent()
            );
        }
        EventOutcome::Reconciled => {
            println!("{} Labels reconciled on PR #{}", check(), pr_number);
        }
    }
    Ok(())
}
