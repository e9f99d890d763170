use super::indicators::IndicatorTables;
use super::{find_matches, AnalysisResult, RiskLevel};
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref LINK_RE: Regex = Regex::new(r"https?://\S+").unwrap();
}

/// Fixed escalation terms; independent of the configured tables.
const DANGEROUS_MESSAGE_TERMS: &[&str] = &["password", "bank account", "ssn"];

const MAX_LISTED_KEYWORDS: usize = 3;
const MAX_LISTED_URGENT: usize = 2;
const CAPS_RATIO_THRESHOLD: f64 = 0.3;
const CAPS_MIN_LENGTH: usize = 20;

pub struct MessageAnalyzer {
    tables: Arc<IndicatorTables>,
}

impl MessageAnalyzer {
    pub fn new(tables: Arc<IndicatorTables>) -> Self {
        Self { tables }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        match self.try_analyze(text) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Message analysis failed: {}", e);
                AnalysisResult::error(format!("Error analyzing message: {e}"))
            }
        }
    }

    fn try_analyze(&self, text: &str) -> Result<AnalysisResult> {
        let text_lower = text.to_lowercase();
        let mut flags = Vec::new();

        let keywords = find_matches(&text_lower, &self.tables.suspicious_keywords);
        if !keywords.is_empty() {
            flags.push(format!(
                "Suspicious words: {}",
                keywords
                    .iter()
                    .take(MAX_LISTED_KEYWORDS)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let link_count = LINK_RE.find_iter(text).count();
        match link_count {
            0 => {}
            1 => flags.push("Contains a link".to_string()),
            n => flags.push(format!("Contains {n} links (suspicious)")),
        }

        let urgent = find_matches(&text_lower, &self.tables.urgent_phrases);
        if !urgent.is_empty() {
            flags.push(format!(
                "Urgent language detected: {}",
                urgent
                    .iter()
                    .take(MAX_LISTED_URGENT)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let requests_personal_info =
            !find_matches(&text_lower, &self.tables.personal_info_terms).is_empty();
        if requests_personal_info {
            flags.push("Requests personal information (HIGH RISK)".to_string());
        }

        let total_chars = text.chars().count();
        let upper_chars = text.chars().filter(|c| c.is_uppercase()).count();
        let caps_ratio = upper_chars as f64 / total_chars.max(1) as f64;
        if caps_ratio > CAPS_RATIO_THRESHOLD && total_chars > CAPS_MIN_LENGTH {
            flags.push("Excessive capitalization detected".to_string());
        }

        log::debug!(
            "Message of {} chars: {} keyword(s), {} link(s), {} urgent phrase(s), caps ratio {:.2}",
            total_chars,
            keywords.len(),
            link_count,
            urgent.len(),
            caps_ratio
        );

        let level = if flags.is_empty() {
            RiskLevel::Safe
        } else if requests_personal_info
            || link_count > 1
            || DANGEROUS_MESSAGE_TERMS
                .iter()
                .any(|term| text_lower.contains(term))
        {
            RiskLevel::Dangerous
        } else {
            RiskLevel::Suspicious
        };

        Ok(AnalysisResult { level, flags })
    }
}
