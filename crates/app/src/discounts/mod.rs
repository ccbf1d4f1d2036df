//! Discount normalization and product matching.
//!
//! The Admin API returns discounts as a polymorphic union wrapped in relay
//! connections. Normalization flattens each node into one uniform record so
//! the matcher and the response serializers never re-inspect the union.

pub mod matcher;

use chrono::{DateTime, Utc};
use discount_lens_core::ProductGid;
use serde::Serialize;

use crate::shopify::types::{
    CodeDiscount, CodeDiscountNode, CollectionRef, CustomerItems, DiscountItems, DiscountStatus,
    ProductRef,
};

/// The union variant a normalized discount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscountKind {
    DiscountCodeBasic,
    DiscountCodeBxgy,
    DiscountCodeFreeShipping,
}

impl DiscountKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscountCodeBasic => "DiscountCodeBasic",
            Self::DiscountCodeBxgy => "DiscountCodeBxgy",
            Self::DiscountCodeFreeShipping => "DiscountCodeFreeShipping",
        }
    }
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flattened item-applicability payload.
///
/// `all_items` is the "applies to every item" sentinel; when it is set the
/// product and collection lists are empty.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicability {
    pub all_items: bool,
    pub products: Vec<ProductRef>,
    pub collections: Vec<CollectionRef>,
}

impl Applicability {
    fn from_items(items: CustomerItems) -> Self {
        match items.items {
            Some(DiscountItems::AllDiscountItems { all_items }) => Self {
                all_items,
                ..Self::default()
            },
            Some(DiscountItems::DiscountProducts { products }) => Self {
                products: products.edges.into_iter().map(|e| e.node).collect(),
                ..Self::default()
            },
            Some(DiscountItems::DiscountCollections { collections }) => Self {
                collections: collections.edges.into_iter().map(|e| e.node).collect(),
                ..Self::default()
            },
            Some(DiscountItems::Other) | None => Self::default(),
        }
    }

    /// The first product in the list matching the given product.
    #[must_use]
    pub fn first_matching_product(&self, product: &ProductGid) -> Option<&ProductRef> {
        self.products.iter().find(|p| *product == *p.id)
    }

    /// The first collection in the list, if any.
    #[must_use]
    pub fn first_collection(&self) -> Option<&CollectionRef> {
        self.collections.first()
    }
}

/// A code discount flattened out of the wire union.
///
/// Serialized with camelCase names so the JSON matches what the upstream
/// response would contain for the same fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDiscount {
    pub id: String,
    pub title: String,
    pub status: DiscountStatus,
    pub codes: Vec<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_buys: Option<Applicability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_gets: Option<Applicability>,
    pub usage_limit: Option<i64>,
    pub async_usage_count: i64,
    pub typename: DiscountKind,
}

impl NormalizedDiscount {
    /// Whether the discount is currently redeemable by status.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == DiscountStatus::Active
    }

    /// The representative code shown in display projections.
    #[must_use]
    pub fn first_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// Flatten one wire node into a normalized record.
///
/// Returns `None` for union variants this app does not handle.
#[must_use]
pub fn normalize(node: CodeDiscountNode) -> Option<NormalizedDiscount> {
    let id = node.id;
    match node.code_discount {
        CodeDiscount::DiscountCodeBasic(d) => Some(NormalizedDiscount {
            id,
            title: d.title,
            status: d.status,
            codes: d.codes.edges.into_iter().map(|e| e.node.code).collect(),
            starts_at: d.starts_at,
            ends_at: d.ends_at,
            customer_buys: None,
            customer_gets: d.customer_gets.map(Applicability::from_items),
            usage_limit: d.usage_limit,
            async_usage_count: d.async_usage_count,
            typename: DiscountKind::DiscountCodeBasic,
        }),
        CodeDiscount::DiscountCodeBxgy(d) => Some(NormalizedDiscount {
            id,
            title: d.title,
            status: d.status,
            codes: d.codes.edges.into_iter().map(|e| e.node.code).collect(),
            starts_at: d.starts_at,
            ends_at: d.ends_at,
            customer_buys: d.customer_buys.map(Applicability::from_items),
            customer_gets: d.customer_gets.map(Applicability::from_items),
            usage_limit: d.usage_limit,
            async_usage_count: d.async_usage_count,
            typename: DiscountKind::DiscountCodeBxgy,
        }),
        CodeDiscount::DiscountCodeFreeShipping(d) => Some(NormalizedDiscount {
            id,
            title: d.title,
            status: d.status,
            codes: d.codes.edges.into_iter().map(|e| e.node.code).collect(),
            starts_at: d.starts_at,
            ends_at: d.ends_at,
            customer_buys: None,
            customer_gets: None,
            usage_limit: d.usage_limit,
            async_usage_count: d.async_usage_count,
            typename: DiscountKind::DiscountCodeFreeShipping,
        }),
        CodeDiscount::Other => None,
    }
}

/// Flatten every node the query returned, skipping unknown variants.
#[must_use]
pub fn normalize_all(nodes: impl IntoIterator<Item = CodeDiscountNode>) -> Vec<NormalizedDiscount> {
    nodes.into_iter().filter_map(normalize).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn node_from_json(value: serde_json::Value) -> CodeDiscountNode {
        serde_json::from_value(value).unwrap()
    }

    pub(crate) fn basic_node(
        id: &str,
        status: &str,
        items: serde_json::Value,
    ) -> CodeDiscountNode {
        node_from_json(json!({
            "id": format!("gid://shopify/DiscountCodeNode/{id}"),
            "codeDiscount": {
                "__typename": "DiscountCodeBasic",
                "title": format!("Basic {id}"),
                "status": status,
                "codes": {"edges": [{"node": {"code": "SAVE10"}}]},
                "startsAt": null,
                "endsAt": null,
                "customerGets": items,
                "usageLimit": null,
                "asyncUsageCount": 0
            }
        }))
    }

    pub(crate) fn product_items(ids: &[&str]) -> serde_json::Value {
        let edges: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({"node": {"id": format!("gid://shopify/Product/{id}"), "title": format!("Product {id}")}})
            })
            .collect();
        json!({
            "items": {
                "__typename": "DiscountProducts",
                "products": {"edges": edges}
            }
        })
    }

    pub(crate) fn all_items() -> serde_json::Value {
        json!({"items": {"__typename": "AllDiscountItems", "allItems": true}})
    }

    #[test]
    fn test_normalize_preserves_variant_name() {
        let basic = normalize(basic_node("1", "ACTIVE", product_items(&["111"]))).unwrap();
        assert_eq!(basic.typename, DiscountKind::DiscountCodeBasic);

        let free = normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/2",
            "codeDiscount": {
                "__typename": "DiscountCodeFreeShipping",
                "title": "Ship free",
                "status": "ACTIVE",
                "codes": {"edges": [{"node": {"code": "FREESHIP"}}]}
            }
        })))
        .unwrap();
        assert_eq!(free.typename, DiscountKind::DiscountCodeFreeShipping);

        let bxgy = normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/3",
            "codeDiscount": {
                "__typename": "DiscountCodeBxgy",
                "title": "BOGO",
                "status": "ACTIVE",
                "codes": {"edges": [{"node": {"code": "BOGO"}}]},
                "customerBuys": product_items(&["5"])
            }
        })))
        .unwrap();
        assert_eq!(bxgy.typename, DiscountKind::DiscountCodeBxgy);
    }

    #[test]
    fn test_normalize_skips_unknown_variant() {
        let node = node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/4",
            "codeDiscount": {"__typename": "DiscountCodeApp", "title": "App"}
        }));
        assert!(normalize(node).is_none());
    }

    #[test]
    fn test_normalize_flattens_codes_in_order() {
        let node = node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/5",
            "codeDiscount": {
                "__typename": "DiscountCodeBasic",
                "title": "Multi",
                "status": "ACTIVE",
                "codes": {"edges": [
                    {"node": {"code": "FIRST"}},
                    {"node": {"code": "SECOND"}}
                ]}
            }
        }));
        let normalized = normalize(node).unwrap();
        assert_eq!(normalized.codes, vec!["FIRST", "SECOND"]);
        assert_eq!(normalized.first_code(), Some("FIRST"));
    }

    #[test]
    fn test_applicability_all_items_has_empty_sets() {
        let normalized = normalize(basic_node("6", "ACTIVE", all_items())).unwrap();
        let gets = normalized.customer_gets.unwrap();
        assert!(gets.all_items);
        assert!(gets.products.is_empty());
        assert!(gets.collections.is_empty());
    }

    #[test]
    fn test_applicability_product_lookup() {
        let normalized =
            normalize(basic_node("7", "ACTIVE", product_items(&["111", "222"]))).unwrap();
        let gets = normalized.customer_gets.unwrap();
        assert!(
            gets.first_matching_product(&ProductGid::from_legacy_id("222"))
                .is_some()
        );
        assert!(
            gets.first_matching_product(&ProductGid::from_legacy_id("333"))
                .is_none()
        );
        assert_eq!(
            gets.first_matching_product(&ProductGid::from_legacy_id("111"))
                .unwrap()
                .id,
            "gid://shopify/Product/111"
        );
    }

    #[test]
    fn test_serialized_record_uses_camel_case() {
        let normalized = normalize(basic_node("8", "ACTIVE", all_items())).unwrap();
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(value["typename"], "DiscountCodeBasic");
        assert_eq!(value["asyncUsageCount"], 0);
        assert_eq!(value["customerGets"]["allItems"], true);
        assert!(value.get("customerBuys").is_none());
    }
}
