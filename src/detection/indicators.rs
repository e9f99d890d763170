use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

const DEFAULT_KEYWORDS: &[&str] = &[
    "login",
    "verify",
    "secure",
    "account",
    "update",
    "bank",
    "confirm",
    "password",
    "signin",
    "suspended",
    "locked",
    "urgent",
    "immediate",
    "action",
    "click",
    "prize",
    "winner",
];

const DEFAULT_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq", ".xyz"];

const DEFAULT_URGENT_PHRASES: &[&str] = &[
    "act now",
    "urgent",
    "verify your account",
    "click here",
    "immediate action",
    "suspended",
    "expire",
    "limited time",
];

const DEFAULT_PERSONAL_INFO: &[&str] = &[
    "social security",
    "ssn",
    "credit card",
    "cvv",
    "pin",
    "date of birth",
    "mother's maiden",
];

const DEFAULT_DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "mailinator.com",
    "10minutemail.com",
    "throwawaymail.com",
    "yopmail.com",
    "fakeinbox.com",
    "trashmail.com",
    "guerrillamail.com",
    "getairmail.com",
    "temp-mail.org",
    "disposablemail.com",
    "tempail.com",
    "maildrop.cc",
    "getnada.com",
    "tmpmail.org",
    "temp-mail.io",
    "sharklasers.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "guerrillamail.biz",
    "spam4.me",
    "fake-mail.com",
    "fakemail.com",
    "fakemail.net",
    "fakemail.org",
    "fakemail.io",
    "fakemailgenerator.com",
    "mailnesia.com",
    "mailcatch.com",
    "tempemail.net",
    "tempemail.com",
    "tempinbox.com",
    "tempmail.net",
    "tempmail.org",
    "tempmail.io",
    "mytrashmail.com",
    "trashmail.net",
    "trashmail.org",
    "trashmail.io",
    "discard.email",
    "discardmail.com",
    "discardmail.de",
    "jetable.org",
    "jetable.net",
    "jetable.com",
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_keywords() -> Vec<String> {
    to_strings(DEFAULT_KEYWORDS)
}

fn default_tlds() -> Vec<String> {
    to_strings(DEFAULT_TLDS)
}

fn default_urgent_phrases() -> Vec<String> {
    to_strings(DEFAULT_URGENT_PHRASES)
}

fn default_personal_info() -> Vec<String> {
    to_strings(DEFAULT_PERSONAL_INFO)
}

fn default_disposable_domains() -> BTreeSet<String> {
    DEFAULT_DISPOSABLE_DOMAINS
        .iter()
        .map(|d| d.to_string())
        .collect()
}

/// Rule input shared by every analyzer.
///
/// Lists are ordered: flag text and truncation follow table order. Loaded
/// once and shared read-only; there is no runtime mutation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorTables {
    #[serde(default = "default_keywords")]
    pub suspicious_keywords: Vec<String>,
    #[serde(default = "default_tlds")]
    pub suspicious_tlds: Vec<String>,
    #[serde(default = "default_urgent_phrases")]
    pub urgent_phrases: Vec<String>,
    #[serde(default = "default_personal_info")]
    pub personal_info_terms: Vec<String>,
    #[serde(default = "default_disposable_domains")]
    pub disposable_domains: BTreeSet<String>,
}

impl Default for IndicatorTables {
    fn default() -> Self {
        Self {
            suspicious_keywords: default_keywords(),
            suspicious_tlds: default_tlds(),
            urgent_phrases: default_urgent_phrases(),
            personal_info_terms: default_personal_info(),
            disposable_domains: default_disposable_domains(),
        }
    }
}

impl IndicatorTables {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read indicator tables: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse indicator tables: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let tables: IndicatorTables = serde_yaml::from_str(content)?;
        Ok(tables.normalized())
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write indicator tables: {}", path.display()))?;
        Ok(())
    }

    /// Lower-case and trim every entry, dropping blanks and duplicates.
    /// TLD entries gain a leading dot when it is missing.
    pub fn normalized(self) -> Self {
        let tlds = self
            .suspicious_tlds
            .into_iter()
            .map(|tld| {
                let tld = tld.trim().to_lowercase();
                if tld.is_empty() || tld.starts_with('.') {
                    tld
                } else {
                    format!(".{tld}")
                }
            })
            .collect();

        Self {
            suspicious_keywords: normalize_list(self.suspicious_keywords),
            suspicious_tlds: normalize_list(tlds),
            urgent_phrases: normalize_list(self.urgent_phrases),
            personal_info_terms: normalize_list(self.personal_info_terms),
            disposable_domains: self
                .disposable_domains
                .into_iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        self.disposable_domains.contains(domain)
    }
}

fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_lowercase();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
