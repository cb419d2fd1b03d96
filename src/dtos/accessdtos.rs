use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    profilemodels::ProfileView,
    subscriptionmodels::{Admission, PlanType, Subscription, ViewAllowance},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseSubscriptionDto {
    pub plan_type: PlanType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckAccessQuery {
    pub subject_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Account,
    Requirement,
    SellerProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewSubjectQuery {
    pub kind: SubjectKind,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub role: String,
    pub plan_type: PlanType,
    /// `None` for unlimited plans.
    pub views_remaining: Option<i32>,
    pub unlimited: bool,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl SubscriptionDto {
    pub fn filter_subscription(subscription: &Subscription) -> Self {
        let (views_remaining, unlimited) = match subscription.allowance() {
            ViewAllowance::Metered(remaining) => (Some(remaining), false),
            ViewAllowance::Unlimited => (None, true),
        };

        SubscriptionDto {
            id: subscription.id,
            role: subscription.role.to_str().to_string(),
            plan_type: subscription.plan_type,
            views_remaining,
            unlimited,
            is_active: subscription.is_active,
            created_at: subscription.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessCheckDto {
    pub allowed: bool,
}

/// A granted view: the contact card plus what it cost.
#[derive(Debug, Serialize)]
pub struct ViewOutcomeDto {
    pub profile: ProfileView,
    pub replay: bool,
    pub views_remaining: Option<i32>,
    pub unlimited: bool,
}

impl ViewOutcomeDto {
    pub fn new(profile: ProfileView, subscription: &Subscription, admission: Admission) -> Self {
        let (views_remaining, unlimited) = match subscription.allowance() {
            ViewAllowance::Metered(remaining) => (Some(remaining), false),
            ViewAllowance::Unlimited => (None, true),
        };

        ViewOutcomeDto {
            profile,
            replay: admission == Admission::Replay,
            views_remaining,
            unlimited,
        }
    }
}
