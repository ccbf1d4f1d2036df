//! Shopify Admin API integration.
//!
//! The client posts a fixed GraphQL document to the shop's Admin endpoint
//! and deserializes the response with serde. The discount query is the only
//! document this app sends, so there is no codegen layer.

mod client;
pub mod queries;
pub mod types;

pub use client::{AdminClient, DiscountQueryOutcome, OfflineToken};

use thiserror::Error;

/// Errors from talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the Admin API. The status and body are kept
    /// verbatim so the proxy endpoint can surface them to the caller.
    #[error("Shopify returned {status}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The Admin API returned 200 with GraphQL-level errors
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// OAuth token exchange failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The response body did not match the expected shape
    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// A single GraphQL error from the Admin API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphQLErrorLocation>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

/// Location of a GraphQL error in the query document.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct GraphQLErrorLocation {
    pub line: i64,
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
