use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{
    accountmodel::{AccountRole, AccountSummary},
    dashboardmodels::{BuyerDashboard, RecentProposal, RecentRequirement, SellerDashboard},
    profilemodels::{BuyerProfile, SellerProfile},
    subscriptionmodels::PlanType,
};

const RECENT_LIMIT: i64 = 5;

#[async_trait]
pub trait DashboardExt {
    async fn get_buyer_dashboard(&self, account_id: Uuid)
        -> Result<Option<BuyerDashboard>, sqlx::Error>;

    async fn get_seller_dashboard(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SellerDashboard>, sqlx::Error>;
}

impl DBClient {
    async fn account_summary(&self, account_id: Uuid) -> Result<Option<AccountSummary>, sqlx::Error> {
        sqlx::query_as::<_, AccountSummary>(
            "SELECT id, name, email, avatar_url, created_at FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn active_plan(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<PlanType>, sqlx::Error> {
        sqlx::query_scalar::<_, PlanType>(
            r#"
            SELECT plan_type FROM subscriptions
            WHERE account_id = $1 AND role = $2 AND is_active
            "#
        )
        .bind(account_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn get_buyer_dashboard(
        &self,
        account_id: Uuid,
    ) -> Result<Option<BuyerDashboard>, sqlx::Error> {
        let Some(account) = self.account_summary(account_id).await? else {
            return Ok(None);
        };

        let profile = sqlx::query_as::<_, BuyerProfile>(
            "SELECT * FROM buyer_profiles WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        let total_requirements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM requirements WHERE buyer_id = $1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let proposals_received = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM proposals p
            JOIN requirements r ON r.id = p.requirement_id
            WHERE r.buyer_id = $1
            "#
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let recent_requirements = sqlx::query_as::<_, RecentRequirement>(
            r#"
            SELECT id, title, budget, category, deadline, created_at
            FROM requirements
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        )
        .bind(account_id)
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let plan = self.active_plan(account_id, AccountRole::Buyer).await?;

        Ok(Some(BuyerDashboard {
            account,
            profile,
            total_requirements,
            proposals_received,
            recent_requirements,
            plan,
        }))
    }

    async fn get_seller_dashboard(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SellerDashboard>, sqlx::Error> {
        let Some(account) = self.account_summary(account_id).await? else {
            return Ok(None);
        };

        let profile = sqlx::query_as::<_, SellerProfile>(
            "SELECT * FROM seller_profiles WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        let (total_requests, accepted_requests) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'accepted')
            FROM proposals
            WHERE seller_id = $1
            "#
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let recent_requests = sqlx::query_as::<_, RecentProposal>(
            r#"
            SELECT
                p.id AS proposal_id,
                r.title,
                r.budget,
                a.name AS buyer_name,
                p.status
            FROM proposals p
            JOIN requirements r ON r.id = p.requirement_id
            JOIN accounts a ON a.id = r.buyer_id
            WHERE p.seller_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2
            "#
        )
        .bind(account_id)
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let plan = self.active_plan(account_id, AccountRole::Seller).await?;

        Ok(Some(SellerDashboard {
            account,
            profile,
            total_requests,
            accepted_requests,
            recent_requests,
            plan,
        }))
    }
}
