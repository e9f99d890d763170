use super::indicators::IndicatorTables;
use super::{find_matches, AnalysisResult, RiskLevel};
use crate::domain_utils::DomainUtils;
use anyhow::Result;
use std::sync::Arc;

/// Fixed escalation words; independent of the configured keyword table.
const DANGEROUS_URL_KEYWORDS: &[&str] = &["password", "login", "bank", "signin"];

const MAX_HYPHENS: usize = 2;
const MAX_URL_LENGTH: usize = 200;

pub struct UrlAnalyzer {
    tables: Arc<IndicatorTables>,
}

impl UrlAnalyzer {
    pub fn new(tables: Arc<IndicatorTables>) -> Self {
        Self { tables }
    }

    /// Never fails: parse problems come back as a `RiskLevel::Error` result.
    pub fn analyze(&self, url: &str) -> AnalysisResult {
        match self.try_analyze(url) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("URL analysis failed for '{}': {}", url, e);
                AnalysisResult::error(format!("Error analyzing URL: {e}"))
            }
        }
    }

    fn try_analyze(&self, url: &str) -> Result<AnalysisResult> {
        let domain = DomainUtils::network_location(url)?.to_lowercase();
        let domain_only = DomainUtils::strip_port(&domain);
        let url_lower = url.to_lowercase();
        let mut flags = Vec::new();

        let is_ip = DomainUtils::is_ip_shaped(domain_only);
        if is_ip {
            flags.push("Domain is an IP address (suspicious)".to_string());
        }

        for keyword in find_matches(&url_lower, &self.tables.suspicious_keywords) {
            flags.push(format!("Contains suspicious keyword: \"{keyword}\""));
        }

        if domain_only.matches('-').count() > MAX_HYPHENS {
            flags.push("Domain has many hyphens (potential spoofing)".to_string());
        }

        for tld in &self.tables.suspicious_tlds {
            if domain_only.ends_with(tld.as_str()) {
                flags.push(format!("Suspicious top-level domain: {tld}"));
            }
        }

        if url.contains('@') {
            flags.push("Contains @ symbol (URL obfuscation technique)".to_string());
        }

        if url.chars().count() > MAX_URL_LENGTH {
            flags.push("Extremely long URL (potential obfuscation)".to_string());
        }

        log::debug!(
            "URL '{}' (domain '{}') raised {} flag(s)",
            url,
            domain_only,
            flags.len()
        );

        let level = if flags.is_empty() {
            RiskLevel::Safe
        } else if is_ip
            || DANGEROUS_URL_KEYWORDS
                .iter()
                .any(|kw| url_lower.contains(kw))
        {
            RiskLevel::Dangerous
        } else {
            RiskLevel::Suspicious
        };

        Ok(AnalysisResult { level, flags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> UrlAnalyzer {
        UrlAnalyzer::new(Arc::new(IndicatorTables::default()))
    }

    #[test]
    fn test_plain_url_is_safe() {
        let result = analyzer().analyze("https://example.com");
        assert_eq!(result.level, RiskLevel::Safe);
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_ip_host_with_login_is_dangerous() {
        let result = analyzer().analyze("http://192.168.1.1/login");
        assert_eq!(result.level, RiskLevel::Dangerous);
        assert_eq!(
            result.flags,
            vec![
                "Domain is an IP address (suspicious)".to_string(),
                "Contains suspicious keyword: \"login\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_ip_host_alone_is_dangerous() {
        let result = analyzer().analyze("http://10.0.0.1:8080/index.html");
        assert_eq!(result.level, RiskLevel::Dangerous);
        assert_eq!(result.flags, vec!["Domain is an IP address (suspicious)"]);
    }

    #[test]
    fn test_suspicious_tld_only() {
        let result = analyzer().analyze("http://mysite.xyz");
        assert_eq!(result.level, RiskLevel::Suspicious);
        assert_eq!(result.flags, vec!["Suspicious top-level domain: .xyz"]);
    }

    #[test]
    fn test_keywords_flag_each_match_in_table_order() {
        let result = analyzer().analyze("https://example.com/verify/account/update");
        assert_eq!(result.level, RiskLevel::Suspicious);
        assert_eq!(
            result.flags,
            vec![
                "Contains suspicious keyword: \"verify\"",
                "Contains suspicious keyword: \"account\"",
                "Contains suspicious keyword: \"update\"",
            ]
        );
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_on_whole_url() {
        let result = analyzer().analyze("https://example.com/?next=BANK");
        assert_eq!(result.level, RiskLevel::Dangerous);
        assert_eq!(result.flags, vec!["Contains suspicious keyword: \"bank\""]);
    }

    #[test]
    fn test_hyphen_threshold() {
        let two = analyzer().analyze("https://my-pay-pal.com");
        assert_eq!(two.level, RiskLevel::Safe);

        let three = analyzer().analyze("https://my-pay-pal-help.com");
        assert_eq!(three.level, RiskLevel::Suspicious);
        assert_eq!(three.flags, vec!["Domain has many hyphens (potential spoofing)"]);
    }

    #[test]
    fn test_at_symbol_and_full_flag_order() {
        let long_tail = "a".repeat(200);
        let url = format!("http://user@a-b-c-d.tk/{long_tail}");
        let result = analyzer().analyze(&url);

        assert_eq!(result.level, RiskLevel::Suspicious);
        assert_eq!(
            result.flags,
            vec![
                "Domain has many hyphens (potential spoofing)".to_string(),
                "Suspicious top-level domain: .tk".to_string(),
                "Contains @ symbol (URL obfuscation technique)".to_string(),
                "Extremely long URL (potential obfuscation)".to_string(),
            ]
        );
    }

    #[test]
    fn test_length_boundary_counts_characters() {
        let base = "https://example.com/";
        let exact = format!("{base}{}", "é".repeat(200 - base.len()));
        assert_eq!(exact.chars().count(), 200);
        assert_eq!(analyzer().analyze(&exact).level, RiskLevel::Safe);

        let over = format!("{exact}é");
        assert_eq!(
            analyzer().analyze(&over).flags,
            vec!["Extremely long URL (potential obfuscation)"]
        );
    }

    #[test]
    fn test_dangerous_words_are_a_fixed_rule() {
        // The escalation rule fires even when the keyword table lacks the word,
        // provided some other check produced a flag.
        let tables = IndicatorTables {
            suspicious_keywords: vec![],
            ..IndicatorTables::default()
        };
        let analyzer = UrlAnalyzer::new(Arc::new(tables));

        let result = analyzer.analyze("http://mysite.xyz/signin");
        assert_eq!(result.level, RiskLevel::Dangerous);
        assert_eq!(result.flags, vec!["Suspicious top-level domain: .xyz"]);

        let clean = analyzer.analyze("https://example.com/login");
        assert_eq!(clean.level, RiskLevel::Safe);
    }

    #[test]
    fn test_substituted_tables() {
        let tables = IndicatorTables {
            suspicious_keywords: vec!["wallet".to_string()],
            suspicious_tlds: vec![".zip".to_string()],
            ..IndicatorTables::default()
        };
        let analyzer = UrlAnalyzer::new(Arc::new(tables));

        let result = analyzer.analyze("https://wallet.example.zip");
        assert_eq!(result.level, RiskLevel::Suspicious);
        assert_eq!(
            result.flags,
            vec![
                "Contains suspicious keyword: \"wallet\"",
                "Suspicious top-level domain: .zip",
            ]
        );
    }

    #[test]
    fn test_schemeless_input_skips_domain_checks() {
        let result = analyzer().analyze("mysite.xyz/login");
        assert_eq!(result.level, RiskLevel::Dangerous);
        assert_eq!(result.flags, vec!["Contains suspicious keyword: \"login\""]);
    }

    #[test]
    fn test_malformed_url_returns_error_result() {
        let result = analyzer().analyze("http://[::1/login");
        assert_eq!(result.level, RiskLevel::Error);
        assert_eq!(result.flags, vec!["Error analyzing URL: Invalid IPv6 URL"]);

        let result = analyzer().analyze("http://[vzz]/");
        assert_eq!(result.level, RiskLevel::Error);
        assert_eq!(
            result.flags,
            vec!["Error analyzing URL: IPvFuture address is invalid"]
        );

        for url in ["http://[x]@example.com/", "http://a[b@c]d/"] {
            let result = analyzer().analyze(url);
            assert_eq!(result.level, RiskLevel::Error, "{url}");
            assert_eq!(result.flags.len(), 1);
            assert!(result.flags[0].starts_with("Error analyzing URL: '"), "{url}");
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let analyzer = analyzer();
        let url = "http://secure-login-bank-update.ml:443/verify?user=a@b";
        assert_eq!(analyzer.analyze(url), analyzer.analyze(url));
    }
}
