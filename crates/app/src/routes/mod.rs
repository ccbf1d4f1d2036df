//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check (DB connectivity)
//!
//! # Storefront proxy
//! GET  /api/discounts   - Code discounts for a shop, filtered by product
//!
//! # Embedded admin
//! GET  /app/discounts   - HTML list of all code discounts
//!
//! # OAuth install flow
//! GET  /auth            - Redirect the merchant to Shopify's consent page
//! GET  /auth/callback   - Exchange the grant for an offline token
//! ```

pub mod api;
pub mod auth;
pub mod discounts;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the application router (health routes are added in `main`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/discounts", get(api::discounts))
        .route("/app/discounts", get(discounts::index))
        .route("/auth", get(auth::begin))
        .route("/auth/callback", get(auth::callback))
}
