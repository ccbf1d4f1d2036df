//! Discount Lens app library.
//!
//! Exposes the app's internals as a library so integration tests can reuse
//! the wire types, normalizer, and matcher.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod discounts;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
