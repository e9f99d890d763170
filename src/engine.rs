use crate::detection::email_validator::EmailValidator;
use crate::detection::indicators::IndicatorTables;
use crate::detection::message_analyzer::MessageAnalyzer;
use crate::detection::url_analyzer::UrlAnalyzer;
use crate::detection::{AnalysisResult, EmailValidationResult};
use std::sync::Arc;

/// Entry point the application layer talks to.
///
/// All three operations are pure functions of their input and the tables
/// the engine was built with, so one instance can be shared across threads.
pub struct AnalysisEngine {
    tables: Arc<IndicatorTables>,
    url_analyzer: UrlAnalyzer,
    message_analyzer: MessageAnalyzer,
    email_validator: EmailValidator,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(IndicatorTables::default())
    }
}

impl AnalysisEngine {
    pub fn new(tables: IndicatorTables) -> Self {
        Self::with_shared_tables(Arc::new(tables))
    }

    pub fn with_shared_tables(tables: Arc<IndicatorTables>) -> Self {
        Self {
            url_analyzer: UrlAnalyzer::new(Arc::clone(&tables)),
            message_analyzer: MessageAnalyzer::new(Arc::clone(&tables)),
            email_validator: EmailValidator::new(Arc::clone(&tables)),
            tables,
        }
    }

    pub fn tables(&self) -> &IndicatorTables {
        &self.tables
    }

    pub fn analyze_url(&self, url: &str) -> AnalysisResult {
        self.url_analyzer.analyze(url)
    }

    pub fn analyze_message(&self, text: &str) -> AnalysisResult {
        self.message_analyzer.analyze(text)
    }

    pub fn validate_email(&self, email: &str) -> EmailValidationResult {
        self.email_validator.validate(email)
    }
}
