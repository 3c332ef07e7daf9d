//! Glob patterns for branch and label names
//!
//! Only `*` is special; it matches any run of characters, including none.
//! Everything else matches literally.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// A compiled `*` glob
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    regex: Regex,
}

impl Glob {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{body}$"))
            .map_err(|e| Error::Config(format!("invalid pattern '{pattern}': {e}")))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `name` matches the whole pattern
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl<'de> Deserialize<'de> for Glob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

