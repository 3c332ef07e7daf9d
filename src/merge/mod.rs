//! Merge eligibility engine
//!
//! Same split as the rest of the crate:
//! 1. Gather - the gate reads PR details and policy (effectful)
//! 2. Decide - `decide()` produces an `EligibilityDecision` (pure, testable)
//! 3. Execute - `execute_merge()` performs the merge side effects (effectful)

mod decide;
mod execute;

pub use decide::{BlockReason, EligibilityDecision, GatedAction, MergePolicy, decide};
pub use execute::{collect_provenance, execute_merge};
