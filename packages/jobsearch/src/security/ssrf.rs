//! URL validation for SSRF protection.
//!
//! Scrape targets come from an external search provider, so every URL is
//! validated before the scraping collaborator is asked to fetch it:
//! - Non-HTTP(S) schemes (file://, ftp://) are rejected
//! - localhost and cloud metadata hostnames are blocked
//! - Literal IPs in private, loopback, and link-local ranges are blocked

use std::collections::HashSet;
use std::net::IpAddr;

use thiserror::Error;

/// Reasons a URL fails outbound validation.
#[derive(Debug, Error)]
pub enum SsrfViolation {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata endpoints)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// Literal IP falls in a blocked range
    #[error("blocked IP range: {0}")]
    BlockedIp(IpAddr),

    /// URL has no host component
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Parse(#[from] url::ParseError),
}

/// Validator applied to every scrape target.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<ipnet::IpNet>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a validator with the default security rules.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "::1",
                "[::1]",
                "0.0.0.0",
                "metadata.google.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs: vec![
                "10.0.0.0/8".parse().unwrap(),
                "172.16.0.0/12".parse().unwrap(),
                "192.168.0.0/16".parse().unwrap(),
                "169.254.0.0/16".parse().unwrap(),
                "127.0.0.0/8".parse().unwrap(),
                "::1/128".parse().unwrap(),
                "fc00::/7".parse().unwrap(),
                "fe80::/10".parse().unwrap(),
            ],
        }
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: ipnet::IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Validate a URL for outbound safety.
    pub fn validate(&self, url: &str) -> Result<(), SsrfViolation> {
        let parsed = url::Url::parse(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SsrfViolation::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SsrfViolation::NoHost)?;

        if self.blocked_hosts.contains(&host.to_ascii_lowercase()) {
            return Err(SsrfViolation::BlockedHost(host.to_string()));
        }

        // Literal IPs are checked against blocked ranges. Hostnames are
        // not resolved here; results come from a public search index.
        if let Ok(ip) = host.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
            for cidr in &self.blocked_cidrs {
                if cidr.contains(&ip) {
                    return Err(SsrfViolation::BlockedIp(ip));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_public_https() {
        let validator = UrlValidator::new();
        assert!(validator.validate("https://example.com/jobs/123").is_ok());
        assert!(validator.validate("http://jobs.example.org").is_ok());
    }

    #[test]
    fn rejects_file_scheme() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("file:///etc/passwd"),
            Err(SsrfViolation::DisallowedScheme(_))
        ));
    }

    #[test]
    fn rejects_localhost() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("http://localhost:8080/admin"),
            Err(SsrfViolation::BlockedHost(_))
        ));
        assert!(matches!(
            validator.validate("http://127.0.0.1/"),
            Err(SsrfViolation::BlockedHost(_))
        ));
    }

    #[test]
    fn rejects_private_ranges() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("http://10.1.2.3/internal"),
            Err(SsrfViolation::BlockedIp(_))
        ));
        assert!(matches!(
            validator.validate("http://192.168.0.10/router"),
            Err(SsrfViolation::BlockedIp(_))
        ));
        assert!(matches!(
            validator.validate("http://169.254.169.254/latest/meta-data"),
            Err(SsrfViolation::BlockedIp(_))
        ));
    }

    #[test]
    fn extra_blocks_apply() {
        let validator = UrlValidator::new().block_host("internal.corp");
        assert!(matches!(
            validator.validate("https://internal.corp/wiki"),
            Err(SsrfViolation::BlockedHost(_))
        ));
    }
}
