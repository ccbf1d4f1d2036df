//! Integration tests for Discount Lens.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the app
//! docker compose up -d postgres
//! cargo run -p discount-lens-app
//!
//! # Run integration tests
//! cargo test -p discount-lens-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `discount_proxy` - The `/api/discounts` storefront proxy endpoint
//! - `health` - Liveness and readiness endpoints
//!
//! Tests target a running instance via `APP_BASE_URL` and are `#[ignore]`d
//! so `cargo test` stays green without one.
