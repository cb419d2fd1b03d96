use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct BuyerProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct SellerProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Buyer account joined with its buyer profile, as the owner sees it.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct BuyerProfileView {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Non-gated card shown while browsing professionals.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct ProfessionalSummary {
    pub seller_profile_id: Uuid,
    pub title: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact card of a buyer, shown to a seller after an unlock.
#[derive(Debug, Serialize, Clone, PartialEq, sqlx::FromRow)]
pub struct BuyerContact {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Row shape of the seller contact query. Skills are still comma-separated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SellerContactRow {
    pub account_id: Uuid,
    pub seller_profile_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub country: Option<String>,
    pub bio: Option<String>,
}

/// Full seller profile, shown to a buyer after an unlock.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SellerContact {
    pub account_id: Uuid,
    pub seller_profile_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
    pub country: Option<String>,
    pub bio: Option<String>,
}

impl From<SellerContactRow> for SellerContact {
    fn from(row: SellerContactRow) -> Self {
        SellerContact {
            account_id: row.account_id,
            seller_profile_id: row.seller_profile_id,
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
            title: row.title,
            skills: split_skills(row.skills.as_deref()),
            experience_years: row.experience_years,
            country: row.country,
            bio: row.bio,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", content = "profile", rename_all = "lowercase")]
pub enum ProfileView {
    Buyer(BuyerContact),
    Seller(SellerContact),
}

impl ProfileView {
    pub fn account_id(&self) -> Uuid {
        match self {
            ProfileView::Buyer(contact) => contact.account_id,
            ProfileView::Seller(contact) => contact.account_id,
        }
    }
}

pub fn split_skills(skills: Option<&str>) -> Vec<String> {
    skills
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(String::from)
        .collect()
}
