// src/config/subsystems/extraction.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::config::FromIni;

/// What to do with a message whose `text` fits neither accepted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Log the message, record it in the report and carry on with the next one.
    Skip,
    /// Stop extraction at the first malformed message.
    Fail,
}

impl MalformedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedPolicy::Skip => "skip",
            MalformedPolicy::Fail => "fail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" | "continue" => Some(Self::Skip),
            "fail" | "abort" => Some(Self::Fail),
            _ => None,
        }
    }
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub on_malformed: MalformedPolicy,

    // Optional file receiving one line per skipped message
    pub discarded_log: Option<PathBuf>,
}

impl FromIni for ExtractionConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "extraction" {
            return None;
        }

        match key {
            "on_malformed" => match MalformedPolicy::from_str(value) {
                Some(policy) => {
                    self.on_malformed = policy;
                    Some(Ok(()))
                },
                None => Some(Err(Error::config(
                    format!("Invalid on_malformed value (must be skip/fail): {}", value)
                ))),
            },
            "discarded_log" => {
                let value = value.trim_matches('"');
                self.discarded_log = if value.is_empty() { None } else { Some(PathBuf::from(value)) };
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.discarded_log {
            if path.is_dir() {
                return Err(Error::config(
                    format!("discarded_log points to a directory: {:?}", path)
                ));
            }
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        match &self.discarded_log {
            Some(path) => format!("{} malformed messages, logging them to {:?}", self.on_malformed.as_str(), path),
            None => format!("{} malformed messages", self.on_malformed.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names() {
        assert_eq!(MalformedPolicy::from_str(" Fail "), Some(MalformedPolicy::Fail));
        assert_eq!(MalformedPolicy::from_str("skip"), Some(MalformedPolicy::Skip));
        assert_eq!(MalformedPolicy::from_str("retry"), None);
        assert_eq!(MalformedPolicy::Fail.as_str(), "fail");
    }

    #[test]
    fn other_sections_are_not_claimed() {
        let mut config = ExtractionConfig::default();
        assert!(config.from_ini_section("render", "on_malformed", "fail").is_none());
        assert_eq!(config.on_malformed, MalformedPolicy::Skip);
    }
}
