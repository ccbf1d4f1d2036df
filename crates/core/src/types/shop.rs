//! Validated shop domain type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a DNS hostname.
const MAX_DOMAIN_LENGTH: usize = 253;

/// Errors from parsing a shop domain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopDomainError {
    #[error("shop domain is empty")]
    Empty,
    #[error("shop domain is too long ({0} characters)")]
    TooLong(usize),
    #[error("shop domain contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("shop domain must contain a dot")]
    MissingDot,
    #[error("shop domain has an empty label")]
    EmptyLabel,
}

/// A validated shop domain, e.g. `my-store.myshopify.com`.
///
/// The domain is interpolated into the Admin API endpoint URL, so parsing
/// rejects anything that is not a plain hostname (no scheme, no path, no
/// uppercase, no stray characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Parse and validate a shop domain.
    ///
    /// # Errors
    ///
    /// Returns `ShopDomainError` if the value is empty, too long, contains
    /// characters outside `[a-z0-9.-]`, or is not a dotted hostname.
    pub fn parse(value: &str) -> Result<Self, ShopDomainError> {
        if value.is_empty() {
            return Err(ShopDomainError::Empty);
        }
        if value.len() > MAX_DOMAIN_LENGTH {
            return Err(ShopDomainError::TooLong(value.len()));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }
        if !value.contains('.') {
            return Err(ShopDomainError::MissingDot);
        }
        if value.split('.').any(str::is_empty) {
            return Err(ShopDomainError::EmptyLabel);
        }

        Ok(Self(value.to_owned()))
    }

    /// Get the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = ShopDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopDomain> for String {
    fn from(domain: ShopDomain) -> Self {
        domain.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_domain() {
        let domain = ShopDomain::parse("my-store.myshopify.com").unwrap();
        assert_eq!(domain.as_str(), "my-store.myshopify.com");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ShopDomain::parse(""), Err(ShopDomainError::Empty));
    }

    #[test]
    fn test_parse_rejects_scheme() {
        // The colon and slashes are not valid hostname characters
        assert!(matches!(
            ShopDomain::parse("https://my-store.myshopify.com"),
            Err(ShopDomainError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert_eq!(
            ShopDomain::parse("My-Store.myshopify.com"),
            Err(ShopDomainError::InvalidCharacter('M'))
        );
    }

    #[test]
    fn test_parse_rejects_bare_label() {
        assert_eq!(
            ShopDomain::parse("localhost"),
            Err(ShopDomainError::MissingDot)
        );
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        assert_eq!(
            ShopDomain::parse(".myshopify.com"),
            Err(ShopDomainError::EmptyLabel)
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let domain = ShopDomain::parse("test.myshopify.com").unwrap();
        let json = serde_json::to_string(&domain).unwrap();
        assert_eq!(json, "\"test.myshopify.com\"");

        let back: ShopDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, domain);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<ShopDomain, _> = serde_json::from_str("\"not a domain\"");
        assert!(result.is_err());
    }
}
