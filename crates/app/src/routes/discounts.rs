//! Embedded admin discount list page.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use discount_lens_core::ShopDomain;

use crate::db::SessionRepository;
use crate::discounts::{NormalizedDiscount, normalize_all};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the list page.
#[derive(Debug, Deserialize)]
pub struct DiscountPageQuery {
    pub shop: Option<String>,
}

/// Discount view for templates.
#[derive(Debug, Clone)]
pub struct DiscountView {
    pub id: String,
    pub title: String,
    pub status: String,
    pub is_active: bool,
    pub code: String,
    pub starts_at: String,
    pub ends_at: String,
    pub discount_type: String,
    pub product_titles: Vec<String>,
    pub collection_titles: Vec<String>,
    pub all_items: bool,
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "N/A".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

impl From<&NormalizedDiscount> for DiscountView {
    fn from(discount: &NormalizedDiscount) -> Self {
        let gets = discount.customer_gets.as_ref();
        let titled = |title: &Option<String>, id: &str| {
            title.clone().unwrap_or_else(|| id.to_string())
        };

        Self {
            id: discount.id.clone(),
            title: discount.title.clone(),
            status: discount.status.as_str().to_string(),
            is_active: discount.is_active(),
            code: discount
                .first_code()
                .unwrap_or("No code found")
                .to_string(),
            starts_at: format_time(discount.starts_at),
            ends_at: format_time(discount.ends_at),
            discount_type: discount.typename.to_string(),
            product_titles: gets
                .map(|g| g.products.iter().map(|p| titled(&p.title, &p.id)).collect())
                .unwrap_or_default(),
            collection_titles: gets
                .map(|g| {
                    g.collections
                        .iter()
                        .map(|c| titled(&c.title, &c.id))
                        .collect()
                })
                .unwrap_or_default(),
            all_items: gets.is_some_and(|g| g.all_items),
        }
    }
}

/// Discount list page template.
///
/// `error` empty means no banner.
#[derive(Template)]
#[template(path = "discounts/index.html")]
pub struct DiscountsIndexTemplate {
    pub shop: String,
    pub error: String,
    pub discounts: Vec<DiscountView>,
}

/// Discount list page handler.
#[instrument(skip(state), fields(shop = ?query.shop))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DiscountPageQuery>,
) -> Result<Html<String>, ApiError> {
    let shop_param = query.shop.as_deref().ok_or(ApiError::MissingShop)?;
    let shop =
        ShopDomain::parse(shop_param).map_err(|e| ApiError::InvalidShop(e.to_string()))?;

    let session = SessionRepository::new(state.pool())
        .load(&shop)
        .await?
        .ok_or_else(|| ApiError::SessionNotFound {
            shop: shop.to_string(),
        })?;

    if session.access_token.is_empty() {
        return Err(ApiError::SessionIncomplete {
            shop: shop.to_string(),
        });
    }

    let (discounts, error) = match state
        .shopify()
        .code_discount_nodes(&shop, &session.access_token)
        .await
    {
        Ok(outcome) => {
            let normalized = normalize_all(
                outcome
                    .data
                    .code_discount_nodes
                    .edges
                    .into_iter()
                    .map(|edge| edge.node),
            );
            let views = normalized.iter().map(DiscountView::from).collect();
            (views, String::new())
        }
        Err(e) => {
            tracing::error!("Failed to fetch discounts: {e}");
            (vec![], "Could not load discounts from Shopify".to_string())
        }
    };

    let template = DiscountsIndexTemplate {
        shop: shop.to_string(),
        error,
        discounts,
    };

    Ok(Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::discounts::normalize;
    use crate::discounts::tests::{basic_node, node_from_json, product_items};

    #[test]
    fn test_view_from_product_scoped_discount() {
        let discount = normalize(basic_node("1", "ACTIVE", product_items(&["111"]))).unwrap();
        let view = DiscountView::from(&discount);

        assert_eq!(view.title, "Basic 1");
        assert_eq!(view.status, "ACTIVE");
        assert!(view.is_active);
        assert_eq!(view.code, "SAVE10");
        assert_eq!(view.product_titles, vec!["Product 111"]);
        assert!(view.collection_titles.is_empty());
        assert!(!view.all_items);
        assert_eq!(view.starts_at, "N/A");
    }

    #[test]
    fn test_view_without_codes() {
        let discount = normalize(node_from_json(json!({
            "id": "gid://shopify/DiscountCodeNode/2",
            "codeDiscount": {
                "__typename": "DiscountCodeFreeShipping",
                "title": "Ship free",
                "status": "EXPIRED"
            }
        })))
        .unwrap();
        let view = DiscountView::from(&discount);
        assert_eq!(view.code, "No code found");
        assert!(!view.is_active);
        assert_eq!(view.discount_type, "DiscountCodeFreeShipping");
    }

    #[test]
    fn test_template_renders() {
        let discount = normalize(basic_node("1", "ACTIVE", product_items(&["111"]))).unwrap();
        let template = DiscountsIndexTemplate {
            shop: "demo.myshopify.com".to_string(),
            error: String::new(),
            discounts: vec![DiscountView::from(&discount)],
        };

        let html = template.render().unwrap();
        assert!(html.contains("Basic 1"));
        assert!(html.contains("SAVE10"));
        assert!(html.contains("demo.myshopify.com"));
    }
}
