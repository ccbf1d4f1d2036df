//! Offline session repository.
//!
//! One row per shop. The access token is the offline token granted at
//! install time; it stays valid until the merchant uninstalls the app.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use discount_lens_core::ShopDomain;

use super::RepositoryError;

/// An installed shop's offline session.
#[derive(Debug, Clone)]
pub struct OfflineSession {
    pub shop: ShopDomain,
    pub access_token: String,
    pub scope: String,
    pub installed_at: DateTime<Utc>,
}

/// Internal row type for `PostgreSQL` session queries.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    shop: String,
    access_token: String,
    scope: String,
    installed_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for OfflineSession {
    type Error = RepositoryError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::parse(&row.shop).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid shop domain in database: {e}"))
        })?;

        Ok(Self {
            shop,
            access_token: row.access_token,
            scope: row.scope,
            installed_at: row.installed_at,
        })
    }
}

/// Repository for offline session storage.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the offline session for a shop, if the app is installed there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn load(&self, shop: &ShopDomain) -> Result<Option<OfflineSession>, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            SELECT shop, access_token, scope, installed_at
            FROM shopify_sessions
            WHERE shop = $1
            ",
        )
        .bind(shop.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(OfflineSession::try_from).transpose()
    }

    /// Persist (or refresh) the offline session for a shop.
    ///
    /// Re-installing overwrites the previous token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn save(
        &self,
        shop: &ShopDomain,
        access_token: &str,
        scope: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shopify_sessions (shop, access_token, scope, installed_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (shop)
            DO UPDATE SET access_token = $2, scope = $3, installed_at = NOW()
            ",
        )
        .bind(shop.as_str())
        .bind(access_token)
        .bind(scope)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a shop's session (uninstall).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no session existed.
    pub async fn delete(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopify_sessions WHERE shop = $1")
            .bind(shop.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_validates_shop() {
        let row = SessionRow {
            shop: "demo.myshopify.com".to_string(),
            access_token: "shpat_abc".to_string(),
            scope: "read_discounts".to_string(),
            installed_at: Utc::now(),
        };
        let session = OfflineSession::try_from(row).unwrap();
        assert_eq!(session.shop.as_str(), "demo.myshopify.com");
    }

    #[test]
    fn test_row_conversion_rejects_corrupt_shop() {
        let row = SessionRow {
            shop: "Not A Domain".to_string(),
            access_token: "shpat_abc".to_string(),
            scope: String::new(),
            installed_at: Utc::now(),
        };
        assert!(matches!(
            OfflineSession::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
