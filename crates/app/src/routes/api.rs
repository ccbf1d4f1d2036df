//! Storefront proxy endpoint.
//!
//! Called by a storefront script with the shop domain and (optionally) the
//! product being viewed. Responds with the raw upstream payload plus the
//! filtered, display-ready views so the script never parses the union.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use discount_lens_core::{ProductGid, ShopDomain};

use crate::db::SessionRepository;
use crate::discounts::{
    NormalizedDiscount,
    matcher::{self, DiscountDisplay},
    normalize_all,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct DiscountProxyQuery {
    pub shop: Option<String>,
    pub product_id: Option<String>,
}

/// Proxy response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountProxyResponse {
    pub shop: String,
    pub product_id: Option<String>,
    /// The upstream GraphQL response, verbatim.
    pub response_json: serde_json::Value,
    pub filtered_discounts: Vec<NormalizedDiscount>,
    #[serde(rename = "discountJSON")]
    pub discount_json: Vec<DiscountDisplay>,
}

/// Proxy endpoint handler.
#[instrument(skip(state), fields(shop = ?query.shop, product_id = ?query.product_id))]
pub async fn discounts(
    State(state): State<AppState>,
    Query(query): Query<DiscountProxyQuery>,
) -> Result<Json<DiscountProxyResponse>, ApiError> {
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

    let outcome = state
        .shopify()
        .code_discount_nodes(&shop, &session.access_token)
        .await?;

    let normalized = normalize_all(
        outcome
            .data
            .code_discount_nodes
            .edges
            .into_iter()
            .map(|edge| edge.node),
    );

    let (filtered, display) = match query.product_id.as_deref() {
        Some(product_id) => {
            let gid = ProductGid::from_legacy_id(product_id);
            let outcome = matcher::filter_for_product(&normalized, &gid);
            (outcome.filtered, outcome.display)
        }
        None => {
            let display = matcher::display_all(&normalized);
            (normalized, display)
        }
    };

    Ok(Json(DiscountProxyResponse {
        shop: shop.to_string(),
        product_id: query.product_id,
        response_json: outcome.raw,
        filtered_discounts: filtered,
        discount_json: display,
    }))
}
