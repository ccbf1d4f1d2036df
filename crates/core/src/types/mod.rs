//! Core types for Discount Lens.
//!
//! Newtype wrappers that keep raw strings from the query string out of the
//! rest of the codebase: a validated shop domain and a Shopify product
//! global id.

mod gid;
mod shop;

pub use gid::ProductGid;
pub use shop::{ShopDomain, ShopDomainError};
