pub mod email_validator;
pub mod indicators;
pub mod message_analyzer;
pub mod url_analyzer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendered in place of an empty flag list.
pub const NO_THREATS: &str = "No threats detected";

/// Categorical verdict of a single analysis. Levels are not ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Dangerous,
    Error,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Suspicious => "suspicious",
            Self::Dangerous => "dangerous",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "suspicious" => Ok(Self::Suspicious),
            "dangerous" => Ok(Self::Dangerous),
            "error" => Ok(Self::Error),
            other => Err(anyhow::anyhow!("Unknown risk level: {other}")),
        }
    }
}

/// Verdict plus the flags that explain it, in check-evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub level: RiskLevel,
    pub flags: Vec<String>,
}

impl AnalysisResult {
    pub fn safe() -> Self {
        Self {
            level: RiskLevel::Safe,
            flags: Vec::new(),
        }
    }

    /// Single-flag `Error` result carrying the failure description.
    pub fn error(message: String) -> Self {
        Self {
            level: RiskLevel::Error,
            flags: vec![message],
        }
    }

    pub fn is_threat(&self) -> bool {
        self.level != RiskLevel::Safe
    }

    /// Flags joined with `" | "`, or the no-threats sentinel.
    pub fn summary(&self) -> String {
        if self.flags.is_empty() {
            NO_THREATS.to_string()
        } else {
            self.flags.join(" | ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailValidationResult {
    pub valid: bool,
    pub reason: String,
}

impl EmailValidationResult {
    pub fn valid(reason: &str) -> Self {
        Self {
            valid: true,
            reason: reason.to_string(),
        }
    }

    pub fn invalid(reason: &str) -> Self {
        Self {
            valid: false,
            reason: reason.to_string(),
        }
    }
}

/// Case-insensitive substring scan preserving table order.
///
/// `haystack_lower` must already be lower-cased; table entries are matched
/// as given, so loaders normalise them up front.
pub(crate) fn find_matches<'a>(haystack_lower: &str, table: &'a [String]) -> Vec<&'a str> {
    table
        .iter()
        .filter(|entry| haystack_lower.contains(entry.as_str()))
        .map(String::as_str)
        .collect()
}
