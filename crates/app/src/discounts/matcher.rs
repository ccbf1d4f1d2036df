//! Product-relevance filtering over normalized discounts.

use discount_lens_core::ProductGid;
use serde::Serialize;

use crate::shopify::types::{CollectionRef, ProductRef};

use super::{DiscountKind, NormalizedDiscount};

/// A display-ready projection of one discount.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountDisplay {
    #[serde(rename = "discountTitle")]
    pub title: String,
    /// The representative first code, if the discount has any.
    #[serde(rename = "discountCodes")]
    pub code: Option<String>,
    /// The first product that matched, for product-scoped inclusions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductRef>,
    /// The first collection in the applicability set, when listing without
    /// a target product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<CollectionRef>,
    #[serde(rename = "discountType")]
    pub kind: DiscountKind,
}

/// The matcher result: the discounts that apply plus their projections.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub filtered: Vec<NormalizedDiscount>,
    pub display: Vec<DiscountDisplay>,
}

/// How one discount relates to the target product.
enum Relevance {
    NotApplicable,
    /// Applies without naming a specific product (free shipping, all-items)
    Applies,
    /// Applies through this product in an applicability set
    AppliesVia(ProductRef),
}

/// Decide whether one discount applies to the target product and, if so,
/// which product ref to surface in the display entry.
///
/// Inactive discounts never apply. Free shipping always applies. A
/// discount with a buy side applies only when the buy-side product set
/// names the target. Everything else falls through to the get side: the
/// all-items sentinel or an explicit product hit. A discount with no
/// applicability payload at all does not apply.
fn relevance(discount: &NormalizedDiscount, product: &ProductGid) -> Relevance {
    if !discount.is_active() {
        return Relevance::NotApplicable;
    }

    if discount.typename == DiscountKind::DiscountCodeFreeShipping {
        return Relevance::Applies;
    }

    if let Some(buys) = &discount.customer_buys {
        return buys
            .first_matching_product(product)
            .map_or(Relevance::NotApplicable, |p| {
                Relevance::AppliesVia(p.clone())
            });
    }

    let Some(gets) = discount.customer_gets.as_ref() else {
        return Relevance::NotApplicable;
    };
    if gets.all_items {
        return Relevance::Applies;
    }
    gets.first_matching_product(product)
        .map_or(Relevance::NotApplicable, |p| {
            Relevance::AppliesVia(p.clone())
        })
}

fn display_entry(discount: &NormalizedDiscount, matched: Option<ProductRef>) -> DiscountDisplay {
    DiscountDisplay {
        title: discount.title.clone(),
        code: discount.first_code().map(str::to_owned),
        products: matched,
        collections: None,
        kind: discount.typename,
    }
}

/// Filter normalized discounts down to those applicable to one product.
#[must_use]
pub fn filter_for_product(
    discounts: &[NormalizedDiscount],
    product: &ProductGid,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    for discount in discounts {
        let matched = match relevance(discount, product) {
            Relevance::NotApplicable => continue,
            Relevance::Applies => None,
            Relevance::AppliesVia(product_ref) => Some(product_ref),
        };
        outcome.display.push(display_entry(discount, matched));
        outcome.filtered.push(discount.clone());
    }
    outcome
}

/// Build display projections for every discount, with no product filter.
///
/// Used when the request names a shop but no product. The projection shows
/// the first product or collection of each applicability set so the list
/// stays one row per discount.
#[must_use]
pub fn display_all(discounts: &[NormalizedDiscount]) -> Vec<DiscountDisplay> {
    discounts
        .iter()
        .map(|discount| {
            let gets = discount.customer_gets.as_ref();
            DiscountDisplay {
                title: discount.title.clone(),
                code: discount.first_code().map(str::to_owned),
                products: gets.and_then(|g| g.products.first().cloned()),
                collections: gets.and_then(|g| g.first_collection().cloned()),
                kind: discount.typename,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::discounts::tests::{all_items, basic_node, node_from_json, product_items};
    use crate::discounts::normalize;

    fn gid(id: &str) -> ProductGid {
        ProductGid::from_legacy_id(id)
    }

    fn free_shipping(status: &str) -> NormalizedDiscount {
        normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/fs",
            "codeDiscount": {
                "__typename": "DiscountCodeFreeShipping",
                "title": "Ship free",
                "status": status,
                "codes": {"edges": [{"node": {"code": "FREESHIP"}}]}
            }
        })))
        .unwrap()
    }

    fn bxgy(status: &str, buy_ids: &[&str]) -> NormalizedDiscount {
        normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/bxgy",
            "codeDiscount": {
                "__typename": "DiscountCodeBxgy",
                "title": "BOGO",
                "status": status,
                "codes": {"edges": [{"node": {"code": "BOGO"}}]},
                "customerBuys": product_items(buy_ids),
                "customerGets": all_items()
            }
        })))
        .unwrap()
    }

    #[test]
    fn test_inactive_discounts_excluded() {
        let discounts = vec![
            normalize(basic_node("1", "EXPIRED", all_items())).unwrap(),
            normalize(basic_node("2", "SCHEDULED", all_items())).unwrap(),
            free_shipping("EXPIRED"),
        ];
        let outcome = filter_for_product(&discounts, &gid("111"));
        assert!(outcome.filtered.is_empty());
        assert!(outcome.display.is_empty());
    }

    #[test]
    fn test_unknown_status_excluded() {
        let discounts = vec![normalize(basic_node("1", "PAUSED", all_items())).unwrap()];
        let outcome = filter_for_product(&discounts, &gid("111"));
        assert!(outcome.filtered.is_empty());
    }

    #[test]
    fn test_active_free_shipping_always_included() {
        let discounts = vec![free_shipping("ACTIVE")];
        let outcome = filter_for_product(&discounts, &gid("999"));
        assert_eq!(outcome.filtered.len(), 1);
        let entry = &outcome.display[0];
        assert_eq!(entry.code.as_deref(), Some("FREESHIP"));
        assert!(entry.products.is_none());
        assert_eq!(entry.kind, DiscountKind::DiscountCodeFreeShipping);
    }

    #[test]
    fn test_bxgy_included_only_for_buy_side_product() {
        let discounts = vec![bxgy("ACTIVE", &["5", "6"])];

        let hit = filter_for_product(&discounts, &gid("5"));
        assert_eq!(hit.filtered.len(), 1);
        assert_eq!(
            hit.display[0].products.as_ref().unwrap().id,
            "gid://shopify/Product/5"
        );

        let miss = filter_for_product(&discounts, &gid("7"));
        assert!(miss.filtered.is_empty());
    }

    #[test]
    fn test_basic_all_items_included_for_any_product() {
        let discounts = vec![normalize(basic_node("1", "ACTIVE", all_items())).unwrap()];
        let outcome = filter_for_product(&discounts, &gid("424242"));
        assert_eq!(outcome.filtered.len(), 1);
        assert!(outcome.display[0].products.is_none());
    }

    #[test]
    fn test_basic_product_scoped_inclusion() {
        let discounts =
            vec![normalize(basic_node("1", "ACTIVE", product_items(&["111", "222"]))).unwrap()];

        let hit = filter_for_product(&discounts, &gid("111"));
        assert_eq!(hit.filtered.len(), 1);
        let entry = &hit.display[0];
        assert_eq!(entry.title, "Basic 1");
        assert_eq!(entry.code.as_deref(), Some("SAVE10"));
        assert_eq!(
            entry.products.as_ref().unwrap().id,
            "gid://shopify/Product/111"
        );
        assert_eq!(entry.kind, DiscountKind::DiscountCodeBasic);

        let miss = filter_for_product(&discounts, &gid("333"));
        assert!(miss.filtered.is_empty());
    }

    #[test]
    fn test_no_applicability_payload_fails_closed() {
        let discounts = vec![normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/1",
            "codeDiscount": {
                "__typename": "DiscountCodeBasic",
                "title": "No payload",
                "status": "ACTIVE",
                "codes": {"edges": [{"node": {"code": "MYSTERY"}}]}
            }
        })))
        .unwrap()];
        let outcome = filter_for_product(&discounts, &gid("111"));
        assert!(outcome.filtered.is_empty());
    }

    #[test]
    fn test_first_match_only_in_display() {
        let discounts =
            vec![normalize(basic_node("1", "ACTIVE", product_items(&["111", "111"]))).unwrap()];
        let outcome = filter_for_product(&discounts, &gid("111"));
        assert_eq!(outcome.display.len(), 1);
        assert!(outcome.display[0].products.is_some());
    }

    #[test]
    fn test_display_entry_serialization_shape() {
        let discounts =
            vec![normalize(basic_node("1", "ACTIVE", product_items(&["111"]))).unwrap()];
        let outcome = filter_for_product(&discounts, &gid("111"));
        let value = serde_json::to_value(&outcome.display[0]).unwrap();

        assert_eq!(value["discountTitle"], "Basic 1");
        assert_eq!(value["discountCodes"], "SAVE10");
        assert_eq!(value["products"]["id"], "gid://shopify/Product/111");
        assert_eq!(value["discountType"], "DiscountCodeBasic");
        assert!(value.get("collections").is_none());
    }

    #[test]
    fn test_display_all_keeps_every_discount() {
        let discounts = vec![
            normalize(basic_node("1", "EXPIRED", product_items(&["111"]))).unwrap(),
            free_shipping("ACTIVE"),
        ];
        let display = display_all(&discounts);
        assert_eq!(display.len(), 2);
        assert_eq!(
            display[0].products.as_ref().unwrap().id,
            "gid://shopify/Product/111"
        );
        assert!(display[1].products.is_none());
    }
}
