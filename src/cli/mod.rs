//! CLI command implementations

pub mod check;
pub mod context;
pub mod event;
pub mod style;
