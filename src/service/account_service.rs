use std::sync::Arc;

use uuid::Uuid;

use super::error::ServiceError;
use crate::{
    db::{accountdb::AccountExt, DBClient},
    models::accountmodel::{Account, AccountRole, ExternalIdentity},
};

pub struct AccountService<S = DBClient> {
    store: Arc<S>,
}

impl<S> AccountService<S>
where
    S: AccountExt + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// First sign-in creates the account and an empty buyer profile. Every
    /// later sign-in returns the same account.
    pub async fn ensure_account_provisioned(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<Account, ServiceError> {
        if identity.email.trim().is_empty() {
            return Err(ServiceError::Validation(
                "The identity provider returned no email".to_string(),
            ));
        }
        if identity.provider_subject.trim().is_empty() {
            return Err(ServiceError::Validation(
                "The identity provider returned no subject".to_string(),
            ));
        }

        let account = self.store.ensure_account_provisioned(identity).await?;
        Ok(account)
    }

    pub async fn get_account(&self, account_id: Uuid) -> Result<Account, ServiceError> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".to_string()))
    }

    pub async fn switch_role(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Account, ServiceError> {
        let account = self
            .store
            .update_active_role(account_id, role)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".to_string()))?;

        tracing::debug!(%account_id, role = role.to_str(), "active role switched");
        Ok(account)
    }
}
