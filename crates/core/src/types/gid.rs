//! Shopify global id ("gid") types.

use serde::{Deserialize, Serialize};

/// A Shopify product global id, e.g. `gid://shopify/Product/123`.
///
/// The Admin API identifies products by these URI-style ids, while
/// storefront requests usually carry the bare numeric id. This type owns
/// the conversion so applicability checks compare like with like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductGid(String);

impl ProductGid {
    const PREFIX: &'static str = "gid://shopify/Product/";

    /// Build a global id from a bare numeric product id.
    #[must_use]
    pub fn from_legacy_id(id: &str) -> Self {
        Self(format!("{}{id}", Self::PREFIX))
    }

    /// Get the global id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductGid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ProductGid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductGid {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
