use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::requirementdtos::{CreateRequirementDto, UpdateRequirementDto},
    models::requirementmodel::{Requirement, RequirementListing},
    service::error::ServiceError,
};

#[async_trait]
pub trait RequirementExt {
    async fn create_requirement(
        &self,
        buyer_id: Uuid,
        requirement: &CreateRequirementDto,
    ) -> Result<Requirement, sqlx::Error>;

    async fn get_requirement(&self, requirement_id: Uuid)
        -> Result<Option<Requirement>, sqlx::Error>;

    async fn get_buyer_requirements(&self, buyer_id: Uuid)
        -> Result<Vec<Requirement>, sqlx::Error>;

    /// Owner-only. `Forbidden` for another buyer's requirement.
    async fn update_requirement(
        &self,
        requirement_id: Uuid,
        buyer_id: Uuid,
        requirement: &UpdateRequirementDto,
    ) -> Result<Requirement, ServiceError>;

    async fn delete_requirement(
        &self,
        requirement_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<(), ServiceError>;

    /// Open requirements, newest first.
    async fn browse_requirements(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequirementListing>, sqlx::Error>;

    async fn get_requirement_listing(
        &self,
        requirement_id: Uuid,
    ) -> Result<Option<RequirementListing>, sqlx::Error>;
}

impl DBClient {
    /// Tells a missing requirement apart from one owned by someone else after
    /// an owner-scoped write touched no row.
    async fn requirement_miss(&self, requirement_id: Uuid) -> ServiceError {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM requirements WHERE id = $1)",
        )
        .bind(requirement_id)
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => ServiceError::Forbidden("You do not own this requirement".to_string()),
            Ok(false) => ServiceError::NotFound("Requirement not found".to_string()),
            Err(e) => ServiceError::from(e),
        }
    }
}

#[async_trait]
impl RequirementExt for DBClient {
    async fn create_requirement(
        &self,
        buyer_id: Uuid,
        requirement: &CreateRequirementDto,
    ) -> Result<Requirement, sqlx::Error> {
        sqlx::query_as::<_, Requirement>(
            r#"
            INSERT INTO requirements
                (buyer_id, title, description, budget, deadline, category, urgency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(buyer_id)
        .bind(&requirement.title)
        .bind(&requirement.description)
        .bind(&requirement.budget)
        .bind(requirement.deadline)
        .bind(&requirement.category)
        .bind(requirement.urgency.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
    }

    async fn get_requirement(
        &self,
        requirement_id: Uuid,
    ) -> Result<Option<Requirement>, sqlx::Error> {
        sqlx::query_as::<_, Requirement>("SELECT * FROM requirements WHERE id = $1")
            .bind(requirement_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_buyer_requirements(
        &self,
        buyer_id: Uuid,
    ) -> Result<Vec<Requirement>, sqlx::Error> {
        sqlx::query_as::<_, Requirement>(
            "SELECT * FROM requirements WHERE buyer_id = $1 ORDER BY created_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_requirement(
        &self,
        requirement_id: Uuid,
        buyer_id: Uuid,
        requirement: &UpdateRequirementDto,
    ) -> Result<Requirement, ServiceError> {
        let updated = sqlx::query_as::<_, Requirement>(
            r#"
            UPDATE requirements
            SET title = $3,
                description = $4,
                budget = $5,
                deadline = $6,
                category = $7,
                urgency = COALESCE($8, urgency),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1 AND buyer_id = $2
            RETURNING *
            "#
        )
        .bind(requirement_id)
        .bind(buyer_id)
        .bind(&requirement.title)
        .bind(&requirement.description)
        .bind(&requirement.budget)
        .bind(requirement.deadline)
        .bind(&requirement.category)
        .bind(requirement.urgency)
        .bind(requirement.status)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(requirement) => Ok(requirement),
            None => Err(self.requirement_miss(requirement_id).await),
        }
    }

    async fn delete_requirement(
        &self,
        requirement_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<(), ServiceError> {
        let deleted = sqlx::query("DELETE FROM requirements WHERE id = $1 AND buyer_id = $2")
            .bind(requirement_id)
            .bind(buyer_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(self.requirement_miss(requirement_id).await);
        }

        tracing::info!(%requirement_id, %buyer_id, "requirement deleted");
        Ok(())
    }

    async fn browse_requirements(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequirementListing>, sqlx::Error> {
        sqlx::query_as::<_, RequirementListing>(
            r#"
            SELECT id, title, description, budget, deadline, category, urgency, created_at
            FROM requirements
            WHERE status = 'open'
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_requirement_listing(
        &self,
        requirement_id: Uuid,
    ) -> Result<Option<RequirementListing>, sqlx::Error> {
        sqlx::query_as::<_, RequirementListing>(
            r#"
            SELECT id, title, description, budget, deadline, category, urgency, created_at
            FROM requirements
            WHERE id = $1
            "#
        )
        .bind(requirement_id)
        .fetch_optional(&self.pool)
        .await
    }
}
