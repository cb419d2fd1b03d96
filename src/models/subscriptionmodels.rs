use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::accountmodel::AccountRole;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "plan_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Basic,
    Lifetime,
}

impl PlanType {
    pub fn to_str(&self) -> &str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Lifetime => "lifetime",
        }
    }

    /// Starting `views_remaining` for a fresh plan. Lifetime plans store no
    /// counter at all.
    pub fn initial_views(&self, basic_allotment: i32) -> Option<i32> {
        match self {
            PlanType::Basic => Some(basic_allotment.max(0)),
            PlanType::Lifetime => None,
        }
    }
}

/// How many gated views a subscription still grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAllowance {
    Metered(i32),
    Unlimited,
}

/// What the access gate does for one view attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Already unlocked. No writes.
    Replay,
    /// Basic plan with views left. Decrement and record.
    Consume,
    /// Unlimited plan. Record only.
    Record,
    /// Basic plan with nothing left. No writes.
    Exhausted,
}

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub account_id: Uuid,
    pub role: AccountRole,
    pub plan_type: PlanType,
    pub views_remaining: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Lifetime plans are unlimited whatever the counter column holds.
    pub fn allowance(&self) -> ViewAllowance {
        match self.plan_type {
            PlanType::Basic => ViewAllowance::Metered(self.views_remaining.unwrap_or(0)),
            PlanType::Lifetime => ViewAllowance::Unlimited,
        }
    }

    pub fn admit(&self, already_unlocked: bool) -> Admission {
        if already_unlocked {
            return Admission::Replay;
        }

        match self.allowance() {
            ViewAllowance::Unlimited => Admission::Record,
            ViewAllowance::Metered(remaining) if remaining > 0 => Admission::Consume,
            ViewAllowance::Metered(_) => Admission::Exhausted,
        }
    }

    /// Pre-flight answer: could a new subject be unlocked right now?
    pub fn has_views_left(&self) -> bool {
        match self.allowance() {
            ViewAllowance::Unlimited => true,
            ViewAllowance::Metered(remaining) => remaining > 0,
        }
    }
}

/// Result of a successful pass through the access gate.
#[derive(Debug, Clone)]
pub struct UnlockReceipt {
    pub subscription: Subscription,
    pub admission: Admission,
}
