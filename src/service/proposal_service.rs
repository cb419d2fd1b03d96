use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use validator::Validate;

use super::error::ServiceError;
use crate::{
    db::{proposaldb::ProposalExt, query_timeout::QueryTimeout, DBClient},
    dtos::proposaldtos::{CreateProposalDto, UpdateProposalDto},
    models::proposalmodels::{Proposal, ProposalDecision},
};

pub struct ProposalService<S = DBClient> {
    store: Arc<S>,
    store_timeout: Duration,
}

impl<S> ProposalService<S>
where
    S: ProposalExt + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub async fn create_proposal(
        &self,
        seller_id: Uuid,
        proposal: CreateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        proposal.validate()?;

        QueryTimeout::run(
            self.store_timeout,
            self.store.create_proposal(seller_id, &proposal),
        )
        .await
    }

    /// Buyer accepts or rejects a pending proposal on one of their
    /// requirements. A decided proposal never moves again.
    pub async fn transition_proposal(
        &self,
        buyer_id: Uuid,
        proposal_id: Uuid,
        decision: ProposalDecision,
    ) -> Result<Proposal, ServiceError> {
        QueryTimeout::run(
            self.store_timeout,
            self.store.transition_proposal(proposal_id, buyer_id, decision),
        )
        .await
    }

    pub async fn update_proposal(
        &self,
        seller_id: Uuid,
        proposal_id: Uuid,
        changes: UpdateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        changes.validate()?;

        QueryTimeout::run(
            self.store_timeout,
            self.store
                .update_pending_proposal(proposal_id, seller_id, &changes),
        )
        .await
    }

    pub async fn withdraw_proposal(
        &self,
        seller_id: Uuid,
        proposal_id: Uuid,
    ) -> Result<(), ServiceError> {
        QueryTimeout::run(
            self.store_timeout,
            self.store
                .delete_withdrawable_proposal(proposal_id, seller_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::{db::memory::MemoryStore, models::proposalmodels::ProposalStatus};

    fn service(store: &Arc<MemoryStore>) -> ProposalService<MemoryStore> {
        ProposalService::new(store.clone(), Duration::from_secs(2))
    }

    fn proposal_for(requirement_id: Uuid) -> CreateProposalDto {
        CreateProposalDto {
            requirement_id,
            message: Some("I can do this in a week".to_string()),
            proposed_budget: Some(BigDecimal::from_str("250.00").unwrap()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_proposal_rejected() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let seller = store.seed_account("Sam").await;
        let requirement = store.seed_requirement(buyer.id, "Logo").await;
        let service = service(&store);

        let first = service
            .create_proposal(seller.id, proposal_for(requirement.id))
            .await
            .unwrap();
        assert_eq!(first.status, ProposalStatus::Pending);

        let err = service
            .create_proposal(seller.id, proposal_for(requirement.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateProposal));
    }

    #[tokio::test]
    async fn test_missing_requirement_not_found() {
        let store = Arc::new(MemoryStore::new());
        let seller = store.seed_account("Sam").await;

        let err = service(&store)
            .create_proposal(seller.id, proposal_for(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_negative_budget_is_validation_error() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let seller = store.seed_account("Sam").await;
        let requirement = store.seed_requirement(buyer.id, "Logo").await;

        let mut dto = proposal_for(requirement.id);
        dto.proposed_budget = Some(BigDecimal::from_str("-1").unwrap());
        let err = service(&store).create_proposal(seller.id, dto).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_transition_is_one_shot() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let seller = store.seed_account("Sam").await;
        let requirement = store.seed_requirement(buyer.id, "Logo").await;
        let service = service(&store);
        let proposal = service
            .create_proposal(seller.id, proposal_for(requirement.id))
            .await
            .unwrap();

        let accepted = service
            .transition_proposal(buyer.id, proposal.id, ProposalDecision::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, ProposalStatus::Accepted);

        let err = service
            .transition_proposal(buyer.id, proposal.id, ProposalDecision::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyProcessed(_)));

        let stored = store.get_proposal(proposal.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProposalStatus::Accepted);
    }

    #[tokio::test]
    async fn test_only_requirement_owner_decides() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let stranger = store.seed_account("Eve").await;
        let seller = store.seed_account("Sam").await;
        let requirement = store.seed_requirement(buyer.id, "Logo").await;
        let service = service(&store);
        let proposal = service
            .create_proposal(seller.id, proposal_for(requirement.id))
            .await
            .unwrap();

        let err = service
            .transition_proposal(stranger.id, proposal.id, ProposalDecision::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = service
            .transition_proposal(buyer.id, Uuid::new_v4(), ProposalDecision::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_only_while_pending() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let seller = store.seed_account("Sam").await;
        let other_seller = store.seed_account("Tom").await;
        let requirement = store.seed_requirement(buyer.id, "Logo").await;
        let service = service(&store);
        let proposal = service
            .create_proposal(seller.id, proposal_for(requirement.id))
            .await
            .unwrap();

        let changes = UpdateProposalDto {
            message: Some("Two days".to_string()),
            proposed_budget: Some(BigDecimal::from_str("300").unwrap()),
        };
        let updated = service
            .update_proposal(seller.id, proposal.id, changes.clone())
            .await
            .unwrap();
        assert_eq!(updated.message.as_deref(), Some("Two days"));

        let err = service
            .update_proposal(other_seller.id, proposal.id, changes.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        service
            .transition_proposal(buyer.id, proposal.id, ProposalDecision::Accepted)
            .await
            .unwrap();
        let err = service
            .update_proposal(seller.id, proposal.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyProcessed(_)));
    }

    #[tokio::test]
    async fn test_withdraw_rules() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let seller = store.seed_account("Sam").await;
        let first = store.seed_requirement(buyer.id, "Logo").await;
        let second = store.seed_requirement(buyer.id, "Website").await;
        let service = service(&store);

        let rejected = service
            .create_proposal(seller.id, proposal_for(first.id))
            .await
            .unwrap();
        service
            .transition_proposal(buyer.id, rejected.id, ProposalDecision::Rejected)
            .await
            .unwrap();
        service.withdraw_proposal(seller.id, rejected.id).await.unwrap();
        assert!(store.get_proposal(rejected.id).await.unwrap().is_none());

        let accepted = service
            .create_proposal(seller.id, proposal_for(second.id))
            .await
            .unwrap();
        service
            .transition_proposal(buyer.id, accepted.id, ProposalDecision::Accepted)
            .await
            .unwrap();
        let err = service
            .withdraw_proposal(seller.id, accepted.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyProcessed(_)));
        assert!(store.get_proposal(accepted.id).await.unwrap().is_some());
    }
}
