//! Admin API client.
//!
//! One client instance is shared across handlers; per-shop state (the
//! offline access token) is passed per call because every request can
//! target a different shop.

use std::sync::Arc;

use discount_lens_core::ShopDomain;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::config::ShopifyAppConfig;

use super::ShopifyError;
use super::queries::DISCOUNT_QUERY;
use super::types::CodeDiscountData;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API client.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    api_key: String,
    api_secret: SecretString,
    api_version: String,
    scopes: Vec<String>,
}

/// The result of the discount query: the verbatim response body plus the
/// typed parse of its `data` payload.
///
/// Both are kept because the proxy endpoint echoes the raw upstream JSON
/// alongside the filtered view.
#[derive(Debug)]
pub struct DiscountQueryOutcome {
    pub raw: serde_json::Value,
    pub data: CodeDiscountData,
}

/// An offline access token from the OAuth code exchange.
#[derive(Debug, Deserialize)]
pub struct OfflineToken {
    pub access_token: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Deserialize)]
struct GraphQLEnvelope {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<super::GraphQLError>,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(config: &ShopifyAppConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
                api_version: config.api_version.clone(),
                scopes: config.scopes.clone(),
            }),
        }
    }

    /// Fetch the first page of code discounts for a shop.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Upstream` for non-2xx responses (with the
    /// upstream status and body preserved), `ShopifyError::GraphQL` when
    /// the query itself is rejected, and `ShopifyError::Shape` when the
    /// body does not parse.
    #[instrument(skip(self, access_token), fields(shop = %shop))]
    pub async fn code_discount_nodes(
        &self,
        shop: &ShopDomain,
        access_token: &str,
    ) -> Result<DiscountQueryOutcome, ShopifyError> {
        let url = format!(
            "https://{shop}/admin/api/{}/graphql.json",
            self.inner.api_version
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, access_token)
            .json(&serde_json::json!({ "query": DISCOUNT_QUERY }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ShopifyError::Upstream { status, body });
        }

        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ShopifyError::Shape(format!("response is not JSON: {e}")))?;

        let envelope: GraphQLEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| ShopifyError::Shape(format!("unexpected envelope: {e}")))?;

        if !envelope.errors.is_empty() {
            return Err(ShopifyError::GraphQL(envelope.errors));
        }

        let data = envelope
            .data
            .ok_or_else(|| ShopifyError::Shape("response has no data".to_string()))?;
        let data: CodeDiscountData = serde_json::from_value(data)
            .map_err(|e| ShopifyError::Shape(format!("unexpected data shape: {e}")))?;

        Ok(DiscountQueryOutcome { raw, data })
    }

    /// Build the OAuth authorization URL the merchant is redirected to at
    /// install time.
    #[must_use]
    pub fn authorization_url(&self, shop: &ShopDomain, redirect_uri: &str, state: &str) -> String {
        format!(
            "https://{shop}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
            urlencoding::encode(&self.inner.api_key),
            urlencoding::encode(&self.inner.scopes.join(",")),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
        )
    }

    /// Exchange an OAuth authorization code for an offline access token.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::OAuth` if Shopify rejects the exchange.
    #[instrument(skip(self, code), fields(shop = %shop))]
    pub async fn exchange_code(
        &self,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<OfflineToken, ShopifyError> {
        let url = format!("https://{shop}/admin/oauth/access_token");

        let response = self
            .inner
            .client
            .post(&url)
            .form(&[
                ("client_id", self.inner.api_key.as_str()),
                ("client_secret", self.inner.api_secret.expose_secret()),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::OAuth(format!(
                "token exchange returned {status}: {body}"
            )));
        }

        let token = response
            .json::<OfflineToken>()
            .await
            .map_err(|e| ShopifyError::OAuth(format!("token response did not parse: {e}")))?;

        Ok(token)
    }
}
