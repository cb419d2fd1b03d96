use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::profiledtos::{BuyerProfileDto, SellerProfileDto},
    models::profilemodels::{BuyerProfile, BuyerProfileView, ProfessionalSummary, SellerProfile},
    service::error::ServiceError,
};

#[async_trait]
pub trait ProfileExt {
    async fn get_buyer_profile_view(
        &self,
        account_id: Uuid,
    ) -> Result<Option<BuyerProfileView>, sqlx::Error>;

    /// Saves the buyer profile and marks the account complete.
    async fn upsert_buyer_profile(
        &self,
        account_id: Uuid,
        profile: &BuyerProfileDto,
    ) -> Result<BuyerProfile, sqlx::Error>;

    async fn get_seller_profile(&self, account_id: Uuid)
        -> Result<Option<SellerProfile>, sqlx::Error>;

    async fn create_seller_profile(
        &self,
        account_id: Uuid,
        profile: &SellerProfileDto,
    ) -> Result<SellerProfile, ServiceError>;

    async fn update_seller_profile(
        &self,
        account_id: Uuid,
        profile: &SellerProfileDto,
    ) -> Result<Option<SellerProfile>, sqlx::Error>;

    async fn delete_seller_profile(&self, account_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn list_professionals(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfessionalSummary>, sqlx::Error>;
}

#[async_trait]
impl ProfileExt for DBClient {
    async fn get_buyer_profile_view(
        &self,
        account_id: Uuid,
    ) -> Result<Option<BuyerProfileView>, sqlx::Error> {
        sqlx::query_as::<_, BuyerProfileView>(
            r#"
            SELECT
                a.id AS account_id,
                a.name,
                a.email,
                a.avatar_url,
                bp.company_name,
                bp.phone,
                bp.location,
                bp.requirements,
                bp.updated_at
            FROM accounts a
            LEFT JOIN buyer_profiles bp ON bp.account_id = a.id
            WHERE a.id = $1
            "#
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_buyer_profile(
        &self,
        account_id: Uuid,
        profile: &BuyerProfileDto,
    ) -> Result<BuyerProfile, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, BuyerProfile>(
            r#"
            INSERT INTO buyer_profiles (account_id, company_name, requirements, phone, location)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (account_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                requirements = EXCLUDED.requirements,
                phone = EXCLUDED.phone,
                location = EXCLUDED.location,
                updated_at = NOW()
            RETURNING *
            "#
        )
        .bind(account_id)
        .bind(&profile.company_name)
        .bind(&profile.requirements)
        .bind(&profile.phone)
        .bind(&profile.location)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE accounts SET is_profile_complete = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn get_seller_profile(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SellerProfile>, sqlx::Error> {
        sqlx::query_as::<_, SellerProfile>("SELECT * FROM seller_profiles WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_seller_profile(
        &self,
        account_id: Uuid,
        profile: &SellerProfileDto,
    ) -> Result<SellerProfile, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, SellerProfile>(
            r#"
            INSERT INTO seller_profiles (account_id, title, skills, experience_years, bio, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(account_id)
        .bind(&profile.title)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(&profile.bio)
        .bind(&profile.country)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if ServiceError::is_unique_violation(&e, "seller_profiles_account_id_key") {
                ServiceError::Conflict("Seller profile already exists".to_string())
            } else {
                ServiceError::from(e)
            }
        })?;

        sqlx::query(
            "UPDATE accounts SET is_profile_complete = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%account_id, seller_profile_id = %created.id, "seller profile created");

        Ok(created)
    }

    async fn update_seller_profile(
        &self,
        account_id: Uuid,
        profile: &SellerProfileDto,
    ) -> Result<Option<SellerProfile>, sqlx::Error> {
        sqlx::query_as::<_, SellerProfile>(
            r#"
            UPDATE seller_profiles
            SET title = $2,
                skills = $3,
                experience_years = $4,
                bio = $5,
                country = $6,
                updated_at = NOW()
            WHERE account_id = $1
            RETURNING *
            "#
        )
        .bind(account_id)
        .bind(&profile.title)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(&profile.bio)
        .bind(&profile.country)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_seller_profile(&self, account_id: Uuid) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM seller_profiles WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_professionals(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfessionalSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProfessionalSummary>(
            r#"
            SELECT
                id AS seller_profile_id,
                title,
                skills,
                experience_years,
                country,
                created_at
            FROM seller_profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}
