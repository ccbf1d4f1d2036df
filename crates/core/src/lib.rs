//! Discount Lens Core - Shared types library.
//!
//! This crate provides common types used across the Discount Lens components:
//! - `app` - Embedded-app backend serving the discount proxy and list pages
//! - `integration-tests` - HTTP-level tests against a running instance
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for shop domains and Shopify global ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
