use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::error::ServiceError;
use crate::{
    db::{
        contactdb::ContactExt, ledgerdb::UnlockLedgerExt, query_timeout::QueryTimeout,
        subscriptiondb::SubscriptionExt, DBClient,
    },
    dtos::accessdtos::{SubjectKind, ViewSubjectQuery},
    models::{
        accountmodel::AccountRole,
        profilemodels::ProfileView,
        subscriptionmodels::{Admission, UnlockReceipt},
    },
};

/// How a caller names the account whose contact card it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectRef {
    Account(Uuid),
    /// Resolves to the buyer who posted it.
    Requirement(Uuid),
    /// Resolves to the seller who owns it.
    SellerProfile(Uuid),
}

impl From<ViewSubjectQuery> for SubjectRef {
    fn from(query: ViewSubjectQuery) -> Self {
        match query.kind {
            SubjectKind::Account => SubjectRef::Account(query.id),
            SubjectKind::Requirement => SubjectRef::Requirement(query.id),
            SubjectKind::SellerProfile => SubjectRef::SellerProfile(query.id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewOutcome {
    pub profile: ProfileView,
    pub receipt: UnlockReceipt,
}

/// The one place a gated contact card is released. Metering, replay and
/// self-view rules all live here.
pub struct AccessGateService<S = DBClient> {
    store: Arc<S>,
    store_timeout: Duration,
}

impl<S> AccessGateService<S>
where
    S: SubscriptionExt + UnlockLedgerExt + ContactExt + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    async fn resolve_subject(
        &self,
        lens: AccountRole,
        subject: SubjectRef,
    ) -> Result<Uuid, ServiceError> {
        let owner = match (lens, subject) {
            (_, SubjectRef::Account(account_id)) => return Ok(account_id),
            (AccountRole::Seller, SubjectRef::Requirement(requirement_id)) => {
                QueryTimeout::run(self.store_timeout, self.store.requirement_owner(requirement_id))
                    .await?
            }
            (AccountRole::Buyer, SubjectRef::SellerProfile(seller_profile_id)) => {
                QueryTimeout::run(
                    self.store_timeout,
                    self.store.seller_profile_owner(seller_profile_id),
                )
                .await?
            }
            (AccountRole::Buyer, SubjectRef::Requirement(_)) => {
                return Err(ServiceError::Validation(
                    "A requirement identifies a buyer; view it through the seller lens".to_string(),
                ))
            }
            (AccountRole::Seller, SubjectRef::SellerProfile(_)) => {
                return Err(ServiceError::Validation(
                    "A seller profile identifies a seller; view it through the buyer lens"
                        .to_string(),
                ))
            }
        };

        owner.ok_or(ServiceError::SubjectNotFound)
    }

    /// The card the lens is allowed to see. Sellers see buyers and buyers see
    /// sellers.
    async fn project(&self, lens: AccountRole, subject_id: Uuid) -> Result<ProfileView, ServiceError> {
        let profile = match lens {
            AccountRole::Seller => {
                QueryTimeout::run(self.store_timeout, self.store.buyer_contact(subject_id))
                    .await?
                    .map(ProfileView::Buyer)
            }
            AccountRole::Buyer => {
                QueryTimeout::run(self.store_timeout, self.store.seller_contact(subject_id))
                    .await?
                    .map(ProfileView::Seller)
            }
        };

        profile.ok_or(ServiceError::SubjectNotFound)
    }

    pub async fn view_subject(
        &self,
        viewer_id: Uuid,
        lens: AccountRole,
        subject: SubjectRef,
    ) -> Result<ViewOutcome, ServiceError> {
        let subject_id = self.resolve_subject(lens, subject).await?;

        if subject_id == viewer_id {
            return Err(ServiceError::SelfViewForbidden);
        }

        // Existence is settled before any counter is touched.
        let profile = self.project(lens, subject_id).await?;

        let receipt = QueryTimeout::run(
            self.store_timeout,
            self.store.unlock_subject(viewer_id, subject_id, lens),
        )
        .await
        .map_err(|e| {
            tracing::info!(
                %viewer_id,
                %subject_id,
                lens = lens.to_str(),
                code = e.code(),
                "view denied"
            );
            e
        })?;

        match receipt.admission {
            Admission::Replay => {
                tracing::debug!(%viewer_id, %subject_id, lens = lens.to_str(), "view replayed");
            }
            _ => {
                tracing::info!(
                    %viewer_id,
                    %subject_id,
                    lens = lens.to_str(),
                    views_remaining = ?receipt.subscription.views_remaining,
                    "subject unlocked"
                );
            }
        }

        Ok(ViewOutcome { profile, receipt })
    }

    /// Pre-flight answer. Never writes.
    pub async fn check_access(
        &self,
        viewer_id: Uuid,
        lens: AccountRole,
        subject_id: Option<Uuid>,
    ) -> Result<bool, ServiceError> {
        if let Some(subject_id) = subject_id {
            if subject_id == viewer_id {
                return Ok(false);
            }

            let unlocked = QueryTimeout::run(
                self.store_timeout,
                self.store.has_unlocked(viewer_id, subject_id, lens),
            )
            .await?;

            if unlocked {
                return Ok(true);
            }
        }

        let subscription = QueryTimeout::run(
            self.store_timeout,
            self.store.get_active_subscription(viewer_id, lens),
        )
        .await?;

        Ok(subscription.map_or(false, |s| s.has_views_left()))
    }
}
