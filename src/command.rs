//! Review commands in comment bodies
//!
//! A command must be alone on its line. Case and surrounding or inner
//! whitespace are ignored, so `  /LGTM ` and `/approve   cancel` both parse.

/// A recognized comment command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/approve`
    Approve,
    /// `/approve cancel`
    CancelApprove,
    /// `/lgtm`
    Lgtm,
    /// `/lgtm cancel`
    CancelLgtm,
    /// `/check-pr`
    CheckPr,
}

impl Command {
    /// Parse a single line
    pub fn parse_line(line: &str) -> Option<Self> {
        let words: Vec<String> = line
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["/approve"] => Some(Self::Approve),
            ["/approve", "cancel"] => Some(Self::CancelApprove),
            ["/lgtm"] => Some(Self::Lgtm),
            ["/lgtm", "cancel"] => Some(Self::CancelLgtm),
            ["/check-pr"] => Some(Self::CheckPr),
            _ => None,
        }
    }

    /// All distinct commands in a body.
    ///
    /// A repeated command keeps only its last position, so the final line
    /// decides between a command and its cancel.
    pub fn parse_all(body: &str) -> Vec<Self> {
        let all: Vec<Self> = body.lines().filter_map(Self::parse_line).collect();
        all.iter()
            .enumerate()
            .filter(|(i, command)| !all[i + 1..].contains(command))
            .map(|(_, command)| *command)
            .collect()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "/approve"),
            Self::CancelApprove => write!(f, "/approve cancel"),
            Self::Lgtm => write!(f, "/lgtm"),
            Self::CancelLgtm => write!(f, "/lgtm cancel"),
            Self::CheckPr => write!(f, "/check-pr"),
        }
    }
}

