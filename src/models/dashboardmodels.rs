use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{
    accountmodel::AccountSummary,
    profilemodels::{BuyerProfile, SellerProfile},
    proposalmodels::ProposalStatus,
    subscriptionmodels::PlanType,
};

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct RecentRequirement {
    pub id: Uuid,
    pub title: String,
    pub budget: Option<BigDecimal>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct RecentProposal {
    pub proposal_id: Uuid,
    pub title: String,
    pub budget: Option<BigDecimal>,
    pub buyer_name: String,
    pub status: ProposalStatus,
}

#[derive(Debug, Serialize, Clone)]
pub struct BuyerDashboard {
    pub account: AccountSummary,
    pub profile: Option<BuyerProfile>,
    pub total_requirements: i64,
    pub proposals_received: i64,
    pub recent_requirements: Vec<RecentRequirement>,
    /// `None` without an active buyer plan.
    pub plan: Option<PlanType>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SellerDashboard {
    pub account: AccountSummary,
    pub profile: Option<SellerProfile>,
    pub total_requests: i64,
    pub accepted_requests: i64,
    pub recent_requests: Vec<RecentProposal>,
    pub plan: Option<PlanType>,
}
