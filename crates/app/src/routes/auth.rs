//! OAuth install flow.
//!
//! `GET /auth?shop=` sends the merchant to Shopify's consent page;
//! `GET /auth/callback` verifies the signed callback, exchanges the grant
//! code for an offline token, and persists it.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::Sha256;
use tracing::instrument;

use discount_lens_core::ShopDomain;

use crate::db::SessionRepository;
use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Query parameters for the install entry point.
#[derive(Debug, Deserialize)]
pub struct InstallQuery {
    pub shop: Option<String>,
}

/// Query parameters Shopify sends to the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub hmac: Option<String>,
    pub host: Option<String>,
    pub shop: Option<String>,
    pub state: Option<String>,
    pub timestamp: Option<String>,
}

/// Install entry point handler.
#[instrument(skip(state), fields(shop = ?query.shop))]
pub async fn begin(
    State(state): State<AppState>,
    Query(query): Query<InstallQuery>,
) -> Result<Redirect, ApiError> {
    let shop_param = query.shop.as_deref().ok_or(ApiError::MissingShop)?;
    let shop =
        ShopDomain::parse(shop_param).map_err(|e| ApiError::InvalidShop(e.to_string()))?;

    let config = state.config();
    let redirect_uri = format!("{}/auth/callback", config.base_url);
    let nonce = oauth_state(&shop, config.shopify.api_secret.expose_secret());
    let url = state
        .shopify()
        .authorization_url(&shop, &redirect_uri, &nonce);

    Ok(Redirect::temporary(&url))
}

/// OAuth callback handler.
#[instrument(skip(state, params), fields(shop = ?params.shop))]
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<Redirect, ApiError> {
    let config = state.config();
    let secret = config.shopify.api_secret.expose_secret();

    if !verify_shopify_hmac(&params, secret) {
        return Err(ApiError::OAuth("HMAC verification failed".to_string()));
    }

    let shop_param = params.shop.as_deref().ok_or(ApiError::MissingShop)?;
    let shop =
        ShopDomain::parse(shop_param).map_err(|e| ApiError::InvalidShop(e.to_string()))?;

    // The state nonce is self-validating: recompute and compare.
    let expected_state = oauth_state(&shop, secret);
    if params.state.as_deref() != Some(expected_state.as_str()) {
        return Err(ApiError::OAuth("state mismatch".to_string()));
    }

    let code = params
        .code
        .as_deref()
        .ok_or_else(|| ApiError::OAuth("missing authorization code".to_string()))?;

    let token = state.shopify().exchange_code(&shop, code).await?;

    SessionRepository::new(state.pool())
        .save(&shop, &token.access_token, &token.scope)
        .await?;

    tracing::info!(shop = %shop, "App installed");

    Ok(Redirect::to(&format!(
        "/app/discounts?shop={}",
        urlencoding::encode(shop.as_str())
    )))
}

/// Derive the OAuth state nonce for a shop.
///
/// Keyed on the app secret so the callback can validate it without server
/// side storage.
fn oauth_state(shop: &ShopDomain, client_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(b"oauth-state:");
    mac.update(shop.as_str().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify the HMAC signature on a Shopify OAuth callback.
fn verify_shopify_hmac(params: &OAuthCallbackParams, client_secret: &str) -> bool {
    let Some(provided_hmac) = &params.hmac else {
        return false;
    };
    let Ok(provided) = hex::decode(provided_hmac) else {
        return false;
    };

    // Build the message from sorted params (excluding hmac)
    let mut param_pairs: Vec<(&str, &str)> = Vec::new();

    if let Some(v) = &params.code {
        param_pairs.push(("code", v));
    }
    if let Some(v) = &params.host {
        param_pairs.push(("host", v));
    }
    if let Some(v) = &params.shop {
        param_pairs.push(("shop", v));
    }
    if let Some(v) = &params.state {
        param_pairs.push(("state", v));
    }
    if let Some(v) = &params.timestamp {
        param_pairs.push(("timestamp", v));
    }

    param_pairs.sort_by(|a, b| a.0.cmp(b.0));

    let message: String = param_pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let Ok(mut mac) = HmacSha256::new_from_slice(client_secret.as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());

    // Constant-time comparison
    mac.verify_slice(&provided).is_ok()
}
