use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::profilemodels::{BuyerContact, SellerContact, SellerContactRow};

/// Subject resolution and contact projection for the access gate. Every call
/// here is a pure read.
#[async_trait]
pub trait ContactExt {
    async fn requirement_owner(&self, requirement_id: Uuid) -> Result<Option<Uuid>, sqlx::Error>;

    async fn seller_profile_owner(
        &self,
        seller_profile_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error>;

    /// `None` when the account or its buyer profile is missing.
    async fn buyer_contact(&self, account_id: Uuid) -> Result<Option<BuyerContact>, sqlx::Error>;

    /// `None` when the account or its seller profile is missing.
    async fn seller_contact(&self, account_id: Uuid)
        -> Result<Option<SellerContact>, sqlx::Error>;
}

#[async_trait]
impl ContactExt for DBClient {
    async fn requirement_owner(&self, requirement_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT buyer_id FROM requirements WHERE id = $1")
            .bind(requirement_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn seller_profile_owner(
        &self,
        seller_profile_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT account_id FROM seller_profiles WHERE id = $1")
            .bind(seller_profile_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn buyer_contact(&self, account_id: Uuid) -> Result<Option<BuyerContact>, sqlx::Error> {
        sqlx::query_as::<_, BuyerContact>(
            r#"
            SELECT
                a.id AS account_id,
                a.name,
                a.email,
                a.avatar_url,
                bp.company_name,
                bp.phone,
                bp.location
            FROM accounts a
            JOIN buyer_profiles bp ON bp.account_id = a.id
            WHERE a.id = $1
            "#
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn seller_contact(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SellerContact>, sqlx::Error> {
        let row = sqlx::query_as::<_, SellerContactRow>(
            r#"
            SELECT
                a.id AS account_id,
                sp.id AS seller_profile_id,
                a.name,
                a.email,
                a.avatar_url,
                sp.title,
                sp.skills,
                sp.experience_years,
                sp.country,
                sp.bio
            FROM accounts a
            JOIN seller_profiles sp ON sp.account_id = a.id
            WHERE a.id = $1
            "#
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SellerContact::from))
    }
}
