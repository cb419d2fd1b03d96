use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::accountmodel::{Account, AccountRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchRoleDto {
    pub role: AccountRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterAccountDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub active_role: String,
    pub is_profile_complete: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterAccountDto {
    pub fn filter_account(account: &Account) -> Self {
        FilterAccountDto {
            id: account.id.to_string(),
            name: account.name.to_owned(),
            email: account.email.to_owned(),
            avatar_url: account.avatar_url.clone(),
            active_role: account.active_role.to_str().to_string(),
            is_profile_complete: account.is_profile_complete,
            created_at: account.created_at,
        }
    }
}
