use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requirementmodel::Urgency;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "proposal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A buyer's answer to a pending proposal.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProposalDecision {
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }

    /// Next status after a buyer decision. `None` once the proposal has left
    /// `Pending`; accepted and rejected are terminal.
    pub fn decide(self, decision: ProposalDecision) -> Option<ProposalStatus> {
        match (self, decision) {
            (ProposalStatus::Pending, ProposalDecision::Accepted) => Some(ProposalStatus::Accepted),
            (ProposalStatus::Pending, ProposalDecision::Rejected) => Some(ProposalStatus::Rejected),
            _ => None,
        }
    }

    /// Message and budget are editable while pending.
    pub fn is_editable(&self) -> bool {
        *self == ProposalStatus::Pending
    }

    pub fn is_withdrawable(&self) -> bool {
        matches!(self, ProposalStatus::Pending | ProposalStatus::Rejected)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct Proposal {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub requirement_id: Uuid,
    pub message: Option<String>,
    pub proposed_budget: Option<BigDecimal>,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Seller's outbox entry.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct SellerProposalRow {
    pub proposal_id: Uuid,
    pub status: ProposalStatus,
    pub proposed_budget: Option<BigDecimal>,
    pub proposed_at: DateTime<Utc>,
    pub requirement_id: Uuid,
    pub title: String,
    pub budget: Option<BigDecimal>,
    pub category: Option<String>,
    pub urgency: Urgency,
    pub requirement_date: DateTime<Utc>,
}

/// Buyer's inbox entry.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct BuyerProposalRow {
    pub proposal_id: Uuid,
    pub status: ProposalStatus,
    pub message: Option<String>,
    pub proposed_budget: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
    pub requirement_id: Uuid,
    pub requirement_title: String,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub seller_profile_id: Option<Uuid>,
    pub seller_title: Option<String>,
    pub experience_years: Option<i32>,
    pub country: Option<String>,
}

/// Accepted proposal, seen from the seller's side.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct SellerClientRow {
    pub proposal_id: Uuid,
    pub proposed_budget: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
    pub requirement_id: Uuid,
    pub requirement_title: String,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub email: String,
}
