//! Unified error handling for the API surface.
//!
//! The proxy endpoint is consumed by a storefront script, so error bodies
//! are stable JSON shapes the script can branch on rather than prose.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::shopify::ShopifyError;

const SESSION_HINT: &str = "Make sure the app is installed and has an offline access token";

/// Application-level error type for API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not name a shop.
    #[error("Missing shop parameter")]
    MissingShop,

    /// The shop parameter is not a valid shop domain.
    #[error("Invalid shop parameter: {0}")]
    InvalidShop(String),

    /// No offline session exists for the shop (app not installed).
    #[error("No offline session found for {shop}")]
    SessionNotFound { shop: String },

    /// A session row exists but carries no usable token.
    #[error("Session for {shop} has no access token")]
    SessionIncomplete { shop: String },

    /// The Admin API answered with a non-2xx status. Proxied through with
    /// the upstream status and body.
    #[error("Shopify API request failed with {status}")]
    Upstream { status: StatusCode, details: String },

    /// The OAuth install flow failed.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ShopifyError> for ApiError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Upstream { status, body } => Self::Upstream {
                status,
                details: body,
            },
            ShopifyError::OAuth(message) => Self::OAuth(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let (status, body) = match &self {
            Self::MissingShop => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing shop parameter" }),
            ),
            Self::InvalidShop(reason) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid shop parameter", "details": reason }),
            ),
            Self::SessionNotFound { shop } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "No offline session found",
                    "shop": shop,
                    "hint": SESSION_HINT,
                }),
            ),
            Self::SessionIncomplete { shop } => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Session has no access token", "shop": shop }),
            ),
            Self::Upstream { status, details } => (
                *status,
                json!({
                    "error": "Shopify API request failed",
                    "status": status.as_u16(),
                    "details": details,
                }),
            ),
            Self::OAuth(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "OAuth error", "details": message }),
            ),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "message": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(ApiError::MissingShop), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::SessionNotFound {
                shop: "demo.myshopify.com".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::SessionIncomplete {
                shop: "demo.myshopify.com".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_is_proxied() {
        let err = ApiError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            details: "Throttled".to_string(),
        };
        assert_eq!(status_of(err), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_shopify_error_mapping() {
        let err: ApiError = ShopifyError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            ApiError::Upstream { status, .. } if status == StatusCode::BAD_GATEWAY
        ));

        let err: ApiError = ShopifyError::Shape("weird".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
