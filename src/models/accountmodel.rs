use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The lens an account acts through. One account can be both.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Buyer,
    Seller,
}

impl AccountRole {
    pub fn to_str(&self) -> &str {
        match self {
            AccountRole::Buyer => "buyer",
            AccountRole::Seller => "seller",
        }
    }

    /// The role of the accounts this lens looks at.
    pub fn counterpart(&self) -> AccountRole {
        match self {
            AccountRole::Buyer => AccountRole::Seller,
            AccountRole::Seller => AccountRole::Buyer,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub google_id: Option<String>,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub active_role: AccountRole,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard header: who is signed in.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Who the OAuth provider says signed in.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub provider_subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart() {
        assert_eq!(AccountRole::Buyer.counterpart(), AccountRole::Seller);
        assert_eq!(AccountRole::Seller.counterpart(), AccountRole::Buyer);
    }

    #[test]
    fn test_role_serde() {
        let role: AccountRole = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(role, AccountRole::Seller);
        assert_eq!(serde_json::to_string(&AccountRole::Buyer).unwrap(), "\"buyer\"");
    }
}
