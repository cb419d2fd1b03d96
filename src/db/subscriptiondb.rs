use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    models::{
        accountmodel::AccountRole,
        subscriptionmodels::{PlanType, Subscription},
    },
    service::error::ServiceError,
};

#[async_trait]
pub trait SubscriptionExt {
    async fn get_active_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Subscription>, sqlx::Error>;

    /// Deactivates every prior plan for (account, role) and activates a new
    /// one, atomically.
    async fn purchase_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
        plan_type: PlanType,
        views_remaining: Option<i32>,
    ) -> Result<Subscription, sqlx::Error>;

    async fn decrement_views(&self, subscription_id: Uuid) -> Result<Subscription, ServiceError>;
}

/// Single-step decrement with a floor at zero. Shared by the standalone
/// store call and the unlock transaction.
pub(crate) async fn decrement_views_on(
    conn: &mut PgConnection,
    subscription_id: Uuid,
) -> Result<Subscription, ServiceError> {
    let updated = sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET views_remaining = views_remaining - 1, updated_at = NOW()
        WHERE id = $1 AND plan_type = 'basic' AND views_remaining > 0
        RETURNING *
        "#
    )
    .bind(subscription_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(subscription) = updated {
        return Ok(subscription);
    }

    let current = sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
        .bind(subscription_id)
        .fetch_optional(&mut *conn)
        .await?;

    match current {
        None => Err(ServiceError::NotFound(format!(
            "Subscription {} not found",
            subscription_id
        ))),
        Some(subscription) if subscription.plan_type != PlanType::Basic => {
            Err(ServiceError::NotBasicPlan(subscription_id))
        }
        Some(_) => Err(ServiceError::AlreadyExhausted(subscription_id)),
    }
}

#[async_trait]
impl SubscriptionExt for DBClient {
    async fn get_active_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE account_id = $1 AND role = $2 AND is_active
            "#
        )
        .bind(account_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
    }

    async fn purchase_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
        plan_type: PlanType,
        views_remaining: Option<i32>,
    ) -> Result<Subscription, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Same first lock as `unlock_subject`. NO KEY UPDATE leaves the
        // foreign-key checks of concurrent ledger inserts unblocked.
        sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR NO KEY UPDATE")
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let deactivated = sqlx::query(
            r#"
            UPDATE subscriptions
            SET is_active = FALSE, updated_at = NOW()
            WHERE account_id = $1 AND role = $2 AND is_active
            "#
        )
        .bind(account_id)
        .bind(role)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (account_id, role, plan_type, views_remaining, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#
        )
        .bind(account_id)
        .bind(role)
        .bind(plan_type)
        .bind(views_remaining)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            %account_id,
            role = role.to_str(),
            plan = plan_type.to_str(),
            deactivated,
            "subscription activated"
        );

        Ok(subscription)
    }

    async fn decrement_views(&self, subscription_id: Uuid) -> Result<Subscription, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        decrement_views_on(&mut *conn, subscription_id).await
    }
}
