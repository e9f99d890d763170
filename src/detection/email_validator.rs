use super::indicators::IndicatorTables;
use super::EmailValidationResult;
use crate::domain_utils::DomainUtils;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

pub const REASON_REQUIRED: &str = "Email is required";
pub const REASON_INVALID_FORMAT: &str = "Invalid email format. Please use a valid email address.";
pub const REASON_DISPOSABLE: &str =
    "Temporary or disposable email addresses are not allowed. Please use a permanent email address.";
pub const REASON_VALID: &str = "Email appears valid";

/// Syntax and disposable-domain check for registration addresses.
///
/// Whether the address is already taken is the account layer's concern.
pub struct EmailValidator {
    tables: Arc<IndicatorTables>,
}

impl EmailValidator {
    pub fn new(tables: Arc<IndicatorTables>) -> Self {
        Self { tables }
    }

    pub fn validate(&self, email: &str) -> EmailValidationResult {
        if email.is_empty() {
            return EmailValidationResult::invalid(REASON_REQUIRED);
        }

        let email = email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            log::debug!("Rejected malformed email address '{}'", email);
            return EmailValidationResult::invalid(REASON_INVALID_FORMAT);
        }

        let domain = DomainUtils::extract_domain(&email).unwrap_or_default();
        if self.tables.is_disposable_domain(&domain) {
            log::debug!("Rejected disposable email domain '{}'", domain);
            return EmailValidationResult::invalid(REASON_DISPOSABLE);
        }

        EmailValidationResult::valid(REASON_VALID)
    }
}
