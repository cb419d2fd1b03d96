use async_trait::async_trait;
use uuid::Uuid;

use super::{
    db::DBClient,
    subscriptiondb::{decrement_views_on, SubscriptionExt},
};
use crate::{
    models::{
        accountmodel::AccountRole,
        subscriptionmodels::{Admission, Subscription, UnlockReceipt},
    },
    service::error::ServiceError,
};

#[async_trait]
pub trait UnlockLedgerExt {
    async fn has_unlocked(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<bool, sqlx::Error>;

    /// Duplicate calls are no-ops.
    async fn record_unlock(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<(), sqlx::Error>;

    /// Check-and-consume for one view attempt. Subscription lookup, ledger
    /// check, decrement and ledger insert happen as one unit.
    async fn unlock_subject(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<UnlockReceipt, ServiceError>;
}

#[async_trait]
impl UnlockLedgerExt for DBClient {
    async fn has_unlocked(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM unlocked_profiles
                WHERE viewer_id = $1 AND subject_id = $2 AND lens = $3
            )
            "#
        )
        .bind(viewer_id)
        .bind(subject_id)
        .bind(lens)
        .fetch_one(&self.pool)
        .await
    }

    async fn record_unlock(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO unlocked_profiles (viewer_id, subject_id, lens)
            VALUES ($1, $2, $3)
            ON CONFLICT (viewer_id, subject_id, lens) DO NOTHING
            "#
        )
        .bind(viewer_id)
        .bind(subject_id)
        .bind(lens)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unlock_subject(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<UnlockReceipt, ServiceError> {
        let mut tx = self.pool.begin().await?;

        // Viewer row first, the same order as `purchase_subscription`. The
        // subscription select below then runs after any racing plan switch
        // has committed and sees the new active row.
        sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR NO KEY UPDATE")
            .bind(viewer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::SubscriptionRequired)?;

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE account_id = $1 AND role = $2 AND is_active
            FOR UPDATE
            "#
        )
        .bind(viewer_id)
        .bind(lens)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::SubscriptionRequired)?;

        let already_unlocked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM unlocked_profiles
                WHERE viewer_id = $1 AND subject_id = $2 AND lens = $3
            )
            "#
        )
        .bind(viewer_id)
        .bind(subject_id)
        .bind(lens)
        .fetch_one(&mut *tx)
        .await?;

        let admission = subscription.admit(already_unlocked);

        let subscription = match admission {
            Admission::Replay => {
                tx.rollback().await?;
                return Ok(UnlockReceipt { subscription, admission });
            }
            Admission::Exhausted => return Err(ServiceError::ViewLimitReached),
            Admission::Consume => decrement_views_on(&mut *tx, subscription.id).await?,
            Admission::Record => subscription,
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO unlocked_profiles (viewer_id, subject_id, lens)
            VALUES ($1, $2, $3)
            ON CONFLICT (viewer_id, subject_id, lens) DO NOTHING
            "#
        )
        .bind(viewer_id)
        .bind(subject_id)
        .bind(lens)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            // Someone else recorded this pair first; undo our decrement.
            tx.rollback().await?;
            let subscription = self
                .get_active_subscription(viewer_id, lens)
                .await?
                .unwrap_or(subscription);
            return Ok(UnlockReceipt {
                subscription,
                admission: Admission::Replay,
            });
        }

        tx.commit().await?;

        Ok(UnlockReceipt { subscription, admission })
    }
}
