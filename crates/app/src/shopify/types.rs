//! Wire types for the Admin API discount query.
//!
//! These mirror the GraphQL response shape, including the relay-style
//! connection wrappers. The polymorphic `codeDiscount` field and the
//! applicability `items` field are tagged unions keyed on `__typename`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A relay connection, reduced to the parts the query selects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

// Manual impl: the derive would require `T: Default`
impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Iterate over the nodes, dropping the edge wrappers.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

/// The `data` payload of the discount query.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeDiscountData {
    #[serde(rename = "codeDiscountNodes")]
    pub code_discount_nodes: Connection<CodeDiscountNode>,
}

/// One `codeDiscountNodes` entry: the node id plus the typed discount.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeDiscountNode {
    pub id: String,
    #[serde(rename = "codeDiscount")]
    pub code_discount: CodeDiscount,
}

/// The polymorphic `codeDiscount` union.
///
/// Discount classes this app does not query (automatic discounts, app
/// discounts) deserialize as `Other` and are dropped downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum CodeDiscount {
    DiscountCodeBasic(BasicDiscount),
    DiscountCodeBxgy(BxgyDiscount),
    DiscountCodeFreeShipping(FreeShippingDiscount),
    #[serde(other)]
    Other,
}

/// An amount-off or percentage-off code discount.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicDiscount {
    pub title: String,
    pub status: DiscountStatus,
    #[serde(default)]
    pub codes: Connection<CodeNode>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub customer_gets: Option<CustomerItems>,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub async_usage_count: i64,
}

/// A buy-X-get-Y code discount.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BxgyDiscount {
    pub title: String,
    pub status: DiscountStatus,
    #[serde(default)]
    pub codes: Connection<CodeNode>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub customer_buys: Option<CustomerItems>,
    pub customer_gets: Option<CustomerItems>,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub async_usage_count: i64,
}

/// A free-shipping code discount. Carries no item applicability.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeShippingDiscount {
    pub title: String,
    pub status: DiscountStatus,
    #[serde(default)]
    pub codes: Connection<CodeNode>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub async_usage_count: i64,
}

/// One redeem code under a discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeNode {
    pub code: String,
}

/// The `customerGets` / `customerBuys` wrapper around the items union.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerItems {
    pub items: Option<DiscountItems>,
}

/// The item applicability union.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum DiscountItems {
    /// The discount applies to every item in the shop.
    AllDiscountItems {
        #[serde(rename = "allItems")]
        all_items: bool,
    },
    /// The discount applies to an explicit product list.
    DiscountProducts {
        #[serde(default)]
        products: Connection<ProductRef>,
    },
    /// The discount applies to products in these collections.
    DiscountCollections {
        #[serde(default)]
        collections: Connection<CollectionRef>,
    },
    #[serde(other)]
    Other,
}

/// A product reference from an applicability set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A collection reference from an applicability set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Discount lifecycle status.
///
/// Values this app does not know about collapse into `Unknown`, which the
/// matcher treats as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountStatus {
    Active,
    Expired,
    Scheduled,
    #[serde(other)]
    Unknown,
}

impl DiscountStatus {
    /// The raw API value, as the Admin API spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Scheduled => "SCHEDULED",
            Self::Unknown => "UNKNOWN",
        }
    }
}
