use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::accountmodel::{Account, AccountRole, ExternalIdentity};

#[async_trait]
pub trait AccountExt {
    async fn get_account(&self, account_id: Uuid) -> Result<Option<Account>, sqlx::Error>;

    /// Idempotent first-sign-in provisioning: the account (keyed by email)
    /// and an empty buyer profile.
    async fn ensure_account_provisioned(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<Account, sqlx::Error>;

    async fn update_active_role(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Account>, sqlx::Error>;

    async fn mark_profile_complete(&self, account_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl AccountExt for DBClient {
    async fn get_account(&self, account_id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn ensure_account_provisioned(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<Account, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO accounts (google_id, email, name, avatar_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(&identity.provider_subject)
        .bind(&identity.email)
        .bind(&identity.name)
        .bind(&identity.avatar_url)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Email first; the provider id covers an email changed upstream.
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE email = $1 OR google_id = $2
            ORDER BY (email = $1) DESC
            LIMIT 1
            "#
        )
        .bind(&identity.email)
        .bind(&identity.provider_subject)
        .fetch_one(&mut *tx)
        .await?;

        let account = if account.google_id.is_none() {
            sqlx::query_as::<_, Account>(
                r#"
                UPDATE accounts
                SET google_id = $2, updated_at = NOW()
                WHERE id = $1 AND google_id IS NULL
                RETURNING *
                "#
            )
            .bind(account.id)
            .bind(&identity.provider_subject)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(account)
        } else {
            account
        };

        sqlx::query(
            r#"
            INSERT INTO buyer_profiles (account_id)
            VALUES ($1)
            ON CONFLICT (account_id) DO NOTHING
            "#
        )
        .bind(account.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if inserted > 0 {
            tracing::info!(account_id = %account.id, "provisioned new account");
        }

        Ok(account)
    }

    async fn update_active_role(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET active_role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(account_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_profile_complete(&self, account_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET is_profile_complete = TRUE, updated_at = NOW()
            WHERE id = $1 AND NOT is_profile_complete
            "#
        )
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
