//! Terminal styling for CLI output
//!
//! Output goes through `anstream`, which strips the ANSI codes when stdout
//! is not a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark for completed steps
pub const CHECK: &str = "✓";

/// Cross mark for blocked or failed steps
pub const CROSS: &str = "✗";

/// Semantic styles for CLI text
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Cyan, for names and identifiers
    fn accent(&self) -> String;
    /// Dimmed, for secondary detail
    fn muted(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Yellow
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled cross mark
pub fn cross() -> String {
    CROSS.warn()
}
