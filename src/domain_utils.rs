use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;
use url::Host;

lazy_static! {
    // Four dot-separated digit groups; octet ranges are not checked.
    static ref IP_SHAPED_RE: Regex = Regex::new(r"^\d+\.\d+\.\d+\.\d+$").unwrap();
    static ref IPV_FUTURE_RE: Regex = Regex::new(r"^v[a-fA-F0-9]+\..+$").unwrap();
}

/// Minimal domain and URL helpers
pub struct DomainUtils;

impl DomainUtils {
    /// Extract domain from email address
    pub fn extract_domain(email: &str) -> Option<String> {
        email.split('@').nth(1).map(|s| s.to_lowercase())
    }

    /// Network location (`[userinfo@]host[:port]`) of a raw URL.
    ///
    /// Returns an empty string when the input has no `//` authority, which
    /// is not an error. Bracket mismatches and bracketed hosts that are not
    /// IPv6 literals are errors.
    pub fn network_location(raw_url: &str) -> Result<String> {
        let cleaned: String = raw_url
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();

        let rest = Self::strip_scheme(&cleaned);
        let Some(after_slashes) = rest.strip_prefix("//") else {
            return Ok(String::new());
        };

        let end = after_slashes
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after_slashes.len());
        let netloc = &after_slashes[..end];

        let has_open = netloc.contains('[');
        let has_close = netloc.contains(']');
        if has_open != has_close {
            return Err(anyhow!("Invalid IPv6 URL"));
        }
        if has_open {
            Self::check_bracketed_netloc(netloc)?;
        }

        Ok(netloc.to_string())
    }

    /// Host part of a lower-cased network location with any `:port` removed.
    pub fn strip_port(netloc: &str) -> &str {
        netloc.split(':').next().unwrap_or("")
    }

    pub fn is_ip_shaped(domain: &str) -> bool {
        IP_SHAPED_RE.is_match(domain)
    }

    fn strip_scheme(url: &str) -> &str {
        let Some(colon) = url.find(':') else {
            return url;
        };
        let candidate = &url[..colon];
        let mut chars = candidate.chars();
        let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let valid = starts_alpha
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            &url[colon + 1..]
        } else {
            url
        }
    }

    fn check_bracketed_netloc(netloc: &str) -> Result<()> {
        let host_and_port = netloc.rsplit('@').next().unwrap_or(netloc);
        let hostname = match host_and_port.split_once('[') {
            Some((before, bracketed)) => {
                if !before.is_empty() {
                    return Err(anyhow!("Invalid IPv6 URL"));
                }
                let (hostname, port) = bracketed.split_once(']').unwrap_or((bracketed, ""));
                if !port.is_empty() && !port.starts_with(':') {
                    return Err(anyhow!("Invalid IPv6 URL"));
                }
                hostname
            }
            // Brackets only in the userinfo; the host after `@` must still be
            // a literal address.
            None => host_and_port.split(':').next().unwrap_or(""),
        };
        Self::check_bracketed_host(hostname)
    }

    fn check_bracketed_host(hostname: &str) -> Result<()> {
        if hostname.starts_with('v') {
            if IPV_FUTURE_RE.is_match(hostname) {
                return Ok(());
            }
            return Err(anyhow!("IPvFuture address is invalid"));
        }
        if hostname.parse::<Ipv4Addr>().is_ok() {
            return Err(anyhow!("An IPv4 address cannot be in brackets"));
        }
        match Host::parse(&format!("[{hostname}]")) {
            Ok(Host::Ipv6(_)) => Ok(()),
            _ => Err(anyhow!(
                "'{hostname}' does not appear to be an IPv4 or IPv6 address"
            )),
        }
    }
}
