use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "urgency_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "requirement_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct Requirement {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Option<BigDecimal>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub urgency: Urgency,
    pub status: RequirementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a seller sees while browsing. No buyer identity.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct RequirementListing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Option<BigDecimal>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
}
