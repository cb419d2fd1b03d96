use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::proposaldtos::{CreateProposalDto, UpdateProposalDto},
    models::proposalmodels::{
        BuyerProposalRow, Proposal, ProposalDecision, SellerClientRow, SellerProposalRow,
    },
    service::error::ServiceError,
};

/// Proposal writes. Every mutation checks ownership and status under a row
/// lock so a proposal leaves `pending` at most once.
#[async_trait]
pub trait ProposalExt {
    async fn create_proposal(
        &self,
        seller_id: Uuid,
        proposal: &CreateProposalDto,
    ) -> Result<Proposal, ServiceError>;

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error>;

    async fn transition_proposal(
        &self,
        proposal_id: Uuid,
        buyer_id: Uuid,
        decision: ProposalDecision,
    ) -> Result<Proposal, ServiceError>;

    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
        changes: &UpdateProposalDto,
    ) -> Result<Proposal, ServiceError>;

    async fn delete_withdrawable_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
    ) -> Result<(), ServiceError>;
}

/// Read models for the proposal lists.
#[async_trait]
pub trait ProposalQueryExt {
    async fn get_seller_proposals(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<SellerProposalRow>, sqlx::Error>;

    async fn get_seller_proposal_for_requirement(
        &self,
        seller_id: Uuid,
        requirement_id: Uuid,
    ) -> Result<Option<Proposal>, sqlx::Error>;

    async fn get_buyer_proposals(&self, buyer_id: Uuid)
        -> Result<Vec<BuyerProposalRow>, sqlx::Error>;

    async fn get_seller_clients(&self, seller_id: Uuid)
        -> Result<Vec<SellerClientRow>, sqlx::Error>;
}

fn proposal_not_found() -> ServiceError {
    ServiceError::NotFound("Proposal not found".to_string())
}

#[async_trait]
impl ProposalExt for DBClient {
    async fn create_proposal(
        &self,
        seller_id: Uuid,
        proposal: &CreateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        let created = sqlx::query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals (seller_id, requirement_id, message, proposed_budget)
            SELECT $1, r.id, $3, $4
            FROM requirements r
            WHERE r.id = $2
            RETURNING *
            "#
        )
        .bind(seller_id)
        .bind(proposal.requirement_id)
        .bind(&proposal.message)
        .bind(&proposal.proposed_budget)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if ServiceError::is_unique_violation(&e, "proposals_seller_requirement_key") {
                ServiceError::DuplicateProposal
            } else {
                ServiceError::from(e)
            }
        })?;

        let created =
            created.ok_or_else(|| ServiceError::NotFound("Requirement not found".to_string()))?;

        tracing::info!(
            proposal_id = %created.id,
            %seller_id,
            requirement_id = %created.requirement_id,
            "proposal sent"
        );

        Ok(created)
    }

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error> {
        sqlx::query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = $1")
            .bind(proposal_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn transition_proposal(
        &self,
        proposal_id: Uuid,
        buyer_id: Uuid,
        decision: ProposalDecision,
    ) -> Result<Proposal, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let proposal =
            sqlx::query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = $1 FOR UPDATE")
                .bind(proposal_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(proposal_not_found)?;

        let owner_id =
            sqlx::query_scalar::<_, Uuid>("SELECT buyer_id FROM requirements WHERE id = $1")
                .bind(proposal.requirement_id)
                .fetch_one(&mut *tx)
                .await?;

        if owner_id != buyer_id {
            return Err(ServiceError::Forbidden(
                "This proposal was not sent to your requirement".to_string(),
            ));
        }

        let next = proposal.status.decide(decision).ok_or_else(|| {
            ServiceError::AlreadyProcessed(format!(
                "Proposal is already {}",
                proposal.status.to_str()
            ))
        })?;

        let updated = sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(proposal_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%proposal_id, %buyer_id, status = next.to_str(), "proposal decided");

        Ok(updated)
    }

    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
        changes: &UpdateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let proposal =
            sqlx::query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = $1 FOR UPDATE")
                .bind(proposal_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(proposal_not_found)?;

        if proposal.seller_id != seller_id {
            return Err(ServiceError::Forbidden("This proposal is not yours".to_string()));
        }
        if !proposal.status.is_editable() {
            return Err(ServiceError::AlreadyProcessed(
                "Only pending proposals can be edited".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET message = $2, proposed_budget = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(proposal_id)
        .bind(&changes.message)
        .bind(&changes.proposed_budget)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_withdrawable_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let proposal =
            sqlx::query_as::<_, Proposal>("SELECT * FROM proposals WHERE id = $1 FOR UPDATE")
                .bind(proposal_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(proposal_not_found)?;

        if proposal.seller_id != seller_id {
            return Err(ServiceError::Forbidden("This proposal is not yours".to_string()));
        }
        if !proposal.status.is_withdrawable() {
            return Err(ServiceError::AlreadyProcessed(
                "Accepted proposals cannot be withdrawn".to_string(),
            ));
        }

        sqlx::query("DELETE FROM proposals WHERE id = $1")
            .bind(proposal_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%proposal_id, %seller_id, "proposal withdrawn");
        Ok(())
    }
}

#[async_trait]
impl ProposalQueryExt for DBClient {
    async fn get_seller_proposals(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<SellerProposalRow>, sqlx::Error> {
        sqlx::query_as::<_, SellerProposalRow>(
            r#"
            SELECT
                p.id AS proposal_id,
                p.status,
                p.proposed_budget,
                p.created_at AS proposed_at,
                r.id AS requirement_id,
                r.title,
                r.budget,
                r.category,
                r.urgency,
                r.created_at AS requirement_date
            FROM proposals p
            JOIN requirements r ON r.id = p.requirement_id
            WHERE p.seller_id = $1
            ORDER BY p.created_at DESC
            "#
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_seller_proposal_for_requirement(
        &self,
        seller_id: Uuid,
        requirement_id: Uuid,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        sqlx::query_as::<_, Proposal>(
            "SELECT * FROM proposals WHERE seller_id = $1 AND requirement_id = $2",
        )
        .bind(seller_id)
        .bind(requirement_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_buyer_proposals(
        &self,
        buyer_id: Uuid,
    ) -> Result<Vec<BuyerProposalRow>, sqlx::Error> {
        sqlx::query_as::<_, BuyerProposalRow>(
            r#"
            SELECT
                p.id AS proposal_id,
                p.status,
                p.message,
                p.proposed_budget,
                p.created_at,
                r.id AS requirement_id,
                r.title AS requirement_title,
                a.id AS seller_id,
                a.name AS seller_name,
                sp.id AS seller_profile_id,
                sp.title AS seller_title,
                sp.experience_years,
                sp.country
            FROM proposals p
            JOIN requirements r ON r.id = p.requirement_id
            JOIN accounts a ON a.id = p.seller_id
            LEFT JOIN seller_profiles sp ON sp.account_id = a.id
            WHERE r.buyer_id = $1
            ORDER BY p.created_at DESC
            "#
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_seller_clients(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<SellerClientRow>, sqlx::Error> {
        sqlx::query_as::<_, SellerClientRow>(
            r#"
            SELECT
                p.id AS proposal_id,
                p.proposed_budget,
                p.created_at,
                r.id AS requirement_id,
                r.title AS requirement_title,
                a.id AS buyer_id,
                a.name AS buyer_name,
                a.email
            FROM proposals p
            JOIN requirements r ON r.id = p.requirement_id
            JOIN accounts a ON a.id = r.buyer_id
            WHERE p.seller_id = $1 AND p.status = 'accepted'
            ORDER BY p.updated_at DESC
            "#
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
    }
}
