//! In-process store used by the service tests. Mirrors the PostgreSQL
//! semantics of each extension trait; the single mutex stands in for row
//! locks.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    accountdb::AccountExt, contactdb::ContactExt, ledgerdb::UnlockLedgerExt,
    proposaldb::ProposalExt, subscriptiondb::SubscriptionExt,
};
use crate::{
    dtos::proposaldtos::{CreateProposalDto, UpdateProposalDto},
    models::{
        accountmodel::{Account, AccountRole, ExternalIdentity},
        profilemodels::{BuyerContact, BuyerProfile, SellerContact, SellerProfile, split_skills},
        proposalmodels::{Proposal, ProposalDecision, ProposalStatus},
        requirementmodel::{Requirement, RequirementStatus, Urgency},
        subscriptionmodels::{Admission, PlanType, Subscription, UnlockReceipt},
    },
    service::error::ServiceError,
};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    buyer_profiles: HashMap<Uuid, BuyerProfile>,
    seller_profiles: HashMap<Uuid, SellerProfile>,
    requirements: HashMap<Uuid, Requirement>,
    proposals: HashMap<Uuid, Proposal>,
    subscriptions: Vec<Subscription>,
    ledger: HashSet<(Uuid, Uuid, AccountRole)>,
}

impl MemoryState {
    fn active_index(&self, account_id: Uuid, role: AccountRole) -> Option<usize> {
        self.subscriptions
            .iter()
            .position(|s| s.account_id == account_id && s.role == role && s.is_active)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store call sleeps this long before touching state.
    pub fn with_latency(latency: Duration) -> Self {
        MemoryStore {
            latency: Some(latency),
            ..Self::default()
        }
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub async fn seed_account(&self, name: &str) -> Account {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            google_id: None,
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            avatar_url: None,
            active_role: AccountRole::Buyer,
            is_profile_complete: false,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.lock().await;
        state.buyer_profiles.insert(account.id, empty_buyer_profile(account.id));
        state.accounts.insert(account.id, account.clone());
        account
    }

    pub async fn seed_seller_profile(&self, account_id: Uuid, title: &str, skills: &str) -> SellerProfile {
        let now = Utc::now();
        let profile = SellerProfile {
            id: Uuid::new_v4(),
            account_id,
            title: Some(title.to_string()),
            skills: Some(skills.to_string()),
            experience_years: Some(4),
            bio: None,
            country: Some("Kenya".to_string()),
            created_at: now,
            updated_at: now,
        };

        self.state
            .lock()
            .await
            .seller_profiles
            .insert(account_id, profile.clone());
        profile
    }

    pub async fn seed_requirement(&self, buyer_id: Uuid, title: &str) -> Requirement {
        let now = Utc::now();
        let requirement = Requirement {
            id: Uuid::new_v4(),
            buyer_id,
            title: title.to_string(),
            description: format!("{} wanted", title),
            budget: None,
            deadline: None,
            category: None,
            urgency: Urgency::default(),
            status: RequirementStatus::Open,
            created_at: now,
            updated_at: now,
        };

        self.state
            .lock()
            .await
            .requirements
            .insert(requirement.id, requirement.clone());
        requirement
    }

    /// Deletes a requirement and cascades to its proposals.
    pub async fn remove_requirement(&self, requirement_id: Uuid) {
        let mut state = self.state.lock().await;
        state.requirements.remove(&requirement_id);
        state.proposals.retain(|_, p| p.requirement_id != requirement_id);
    }

    pub async fn remove_buyer_profile(&self, account_id: Uuid) {
        self.state.lock().await.buyer_profiles.remove(&account_id);
    }

    pub async fn subscriptions_for(&self, account_id: Uuid, role: AccountRole) -> Vec<Subscription> {
        self.state
            .lock()
            .await
            .subscriptions
            .iter()
            .filter(|s| s.account_id == account_id && s.role == role)
            .cloned()
            .collect()
    }

    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.ledger.len()
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    pub async fn buyer_profile_count(&self) -> usize {
        self.state.lock().await.buyer_profiles.len()
    }
}

fn empty_buyer_profile(account_id: Uuid) -> BuyerProfile {
    let now = Utc::now();
    BuyerProfile {
        id: Uuid::new_v4(),
        account_id,
        company_name: None,
        phone: None,
        location: None,
        requirements: None,
        created_at: now,
        updated_at: now,
    }
}

fn decrement_in(state: &mut MemoryState, subscription_id: Uuid) -> Result<Subscription, ServiceError> {
    let subscription = state
        .subscriptions
        .iter_mut()
        .find(|s| s.id == subscription_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Subscription {} not found", subscription_id)))?;

    if subscription.plan_type != PlanType::Basic {
        return Err(ServiceError::NotBasicPlan(subscription_id));
    }

    match subscription.views_remaining {
        Some(remaining) if remaining > 0 => {
            subscription.views_remaining = Some(remaining - 1);
            subscription.updated_at = Utc::now();
            Ok(subscription.clone())
        }
        _ => Err(ServiceError::AlreadyExhausted(subscription_id)),
    }
}

#[async_trait]
impl SubscriptionExt for MemoryStore {
    async fn get_active_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        self.delay().await;
        let state = self.state.lock().await;
        Ok(state
            .active_index(account_id, role)
            .map(|i| state.subscriptions[i].clone()))
    }

    async fn purchase_subscription(
        &self,
        account_id: Uuid,
        role: AccountRole,
        plan_type: PlanType,
        views_remaining: Option<i32>,
    ) -> Result<Subscription, sqlx::Error> {
        self.delay().await;
        let mut state = self.state.lock().await;

        if !state.accounts.contains_key(&account_id) {
            return Err(sqlx::Error::RowNotFound);
        }

        let now = Utc::now();
        for subscription in state
            .subscriptions
            .iter_mut()
            .filter(|s| s.account_id == account_id && s.role == role && s.is_active)
        {
            subscription.is_active = false;
            subscription.updated_at = now;
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            account_id,
            role,
            plan_type,
            views_remaining,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.subscriptions.push(subscription.clone());

        Ok(subscription)
    }

    async fn decrement_views(&self, subscription_id: Uuid) -> Result<Subscription, ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;
        decrement_in(&mut state, subscription_id)
    }
}

#[async_trait]
impl UnlockLedgerExt for MemoryStore {
    async fn has_unlocked(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<bool, sqlx::Error> {
        self.delay().await;
        Ok(self
            .state
            .lock()
            .await
            .ledger
            .contains(&(viewer_id, subject_id, lens)))
    }

    async fn record_unlock(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<(), sqlx::Error> {
        self.delay().await;
        self.state
            .lock()
            .await
            .ledger
            .insert((viewer_id, subject_id, lens));
        Ok(())
    }

    async fn unlock_subject(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
        lens: AccountRole,
    ) -> Result<UnlockReceipt, ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let index = state
            .active_index(viewer_id, lens)
            .ok_or(ServiceError::SubscriptionRequired)?;
        let subscription = state.subscriptions[index].clone();

        let already_unlocked = state.ledger.contains(&(viewer_id, subject_id, lens));
        let admission = subscription.admit(already_unlocked);

        let subscription = match admission {
            Admission::Replay => return Ok(UnlockReceipt { subscription, admission }),
            Admission::Exhausted => return Err(ServiceError::ViewLimitReached),
            Admission::Consume => decrement_in(&mut state, subscription.id)?,
            Admission::Record => subscription,
        };

        state.ledger.insert((viewer_id, subject_id, lens));

        Ok(UnlockReceipt { subscription, admission })
    }
}

#[async_trait]
impl ContactExt for MemoryStore {
    async fn requirement_owner(&self, requirement_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        self.delay().await;
        Ok(self
            .state
            .lock()
            .await
            .requirements
            .get(&requirement_id)
            .map(|r| r.buyer_id))
    }

    async fn seller_profile_owner(
        &self,
        seller_profile_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        self.delay().await;
        Ok(self
            .state
            .lock()
            .await
            .seller_profiles
            .values()
            .find(|p| p.id == seller_profile_id)
            .map(|p| p.account_id))
    }

    async fn buyer_contact(&self, account_id: Uuid) -> Result<Option<BuyerContact>, sqlx::Error> {
        self.delay().await;
        let state = self.state.lock().await;
        let (Some(account), Some(profile)) = (
            state.accounts.get(&account_id),
            state.buyer_profiles.get(&account_id),
        ) else {
            return Ok(None);
        };

        Ok(Some(BuyerContact {
            account_id,
            name: account.name.clone(),
            email: account.email.clone(),
            avatar_url: account.avatar_url.clone(),
            company_name: profile.company_name.clone(),
            phone: profile.phone.clone(),
            location: profile.location.clone(),
        }))
    }

    async fn seller_contact(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SellerContact>, sqlx::Error> {
        self.delay().await;
        let state = self.state.lock().await;
        let (Some(account), Some(profile)) = (
            state.accounts.get(&account_id),
            state.seller_profiles.get(&account_id),
        ) else {
            return Ok(None);
        };

        Ok(Some(SellerContact {
            account_id,
            seller_profile_id: profile.id,
            name: account.name.clone(),
            email: account.email.clone(),
            avatar_url: account.avatar_url.clone(),
            title: profile.title.clone(),
            skills: split_skills(profile.skills.as_deref()),
            experience_years: profile.experience_years,
            country: profile.country.clone(),
            bio: profile.bio.clone(),
        }))
    }
}

#[async_trait]
impl ProposalExt for MemoryStore {
    async fn create_proposal(
        &self,
        seller_id: Uuid,
        proposal: &CreateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;

        if !state.requirements.contains_key(&proposal.requirement_id) {
            return Err(ServiceError::NotFound("Requirement not found".to_string()));
        }
        if state
            .proposals
            .values()
            .any(|p| p.seller_id == seller_id && p.requirement_id == proposal.requirement_id)
        {
            return Err(ServiceError::DuplicateProposal);
        }

        let now = Utc::now();
        let created = Proposal {
            id: Uuid::new_v4(),
            seller_id,
            requirement_id: proposal.requirement_id,
            message: proposal.message.clone(),
            proposed_budget: proposal.proposed_budget.clone(),
            status: ProposalStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.proposals.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error> {
        self.delay().await;
        Ok(self.state.lock().await.proposals.get(&proposal_id).cloned())
    }

    async fn transition_proposal(
        &self,
        proposal_id: Uuid,
        buyer_id: Uuid,
        decision: ProposalDecision,
    ) -> Result<Proposal, ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let requirement_id = state
            .proposals
            .get(&proposal_id)
            .map(|p| p.requirement_id)
            .ok_or_else(|| ServiceError::NotFound("Proposal not found".to_string()))?;
        let owner_id = state.requirements.get(&requirement_id).map(|r| r.buyer_id);

        if owner_id != Some(buyer_id) {
            return Err(ServiceError::Forbidden(
                "This proposal was not sent to your requirement".to_string(),
            ));
        }

        let proposal = state
            .proposals
            .get_mut(&proposal_id)
            .ok_or_else(|| ServiceError::NotFound("Proposal not found".to_string()))?;
        let next = proposal.status.decide(decision).ok_or_else(|| {
            ServiceError::AlreadyProcessed(format!(
                "Proposal is already {}",
                proposal.status.to_str()
            ))
        })?;

        proposal.status = next;
        proposal.updated_at = Utc::now();
        Ok(proposal.clone())
    }

    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
        changes: &UpdateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let proposal = state
            .proposals
            .get_mut(&proposal_id)
            .ok_or_else(|| ServiceError::NotFound("Proposal not found".to_string()))?;

        if proposal.seller_id != seller_id {
            return Err(ServiceError::Forbidden("This proposal is not yours".to_string()));
        }
        if !proposal.status.is_editable() {
            return Err(ServiceError::AlreadyProcessed(
                "Only pending proposals can be edited".to_string(),
            ));
        }

        proposal.message = changes.message.clone();
        proposal.proposed_budget = changes.proposed_budget.clone();
        proposal.updated_at = Utc::now();
        Ok(proposal.clone())
    }

    async fn delete_withdrawable_proposal(
        &self,
        proposal_id: Uuid,
        seller_id: Uuid,
    ) -> Result<(), ServiceError> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let proposal = state
            .proposals
            .get(&proposal_id)
            .ok_or_else(|| ServiceError::NotFound("Proposal not found".to_string()))?;

        if proposal.seller_id != seller_id {
            return Err(ServiceError::Forbidden("This proposal is not yours".to_string()));
        }
        if !proposal.status.is_withdrawable() {
            return Err(ServiceError::AlreadyProcessed(
                "Accepted proposals cannot be withdrawn".to_string(),
            ));
        }

        state.proposals.remove(&proposal_id);
        Ok(())
    }
}

#[async_trait]
impl AccountExt for MemoryStore {
    async fn get_account(&self, account_id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        self.delay().await;
        Ok(self.state.lock().await.accounts.get(&account_id).cloned())
    }

    async fn ensure_account_provisioned(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<Account, sqlx::Error> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let existing = state
            .accounts
            .values()
            .find(|a| a.email == identity.email)
            .or_else(|| {
                state
                    .accounts
                    .values()
                    .find(|a| a.google_id.as_deref() == Some(identity.provider_subject.as_str()))
            })
            .map(|a| a.id);

        let account_id = match existing {
            Some(id) => id,
            None => {
                let now = Utc::now();
                let account = Account {
                    id: Uuid::new_v4(),
                    google_id: Some(identity.provider_subject.clone()),
                    email: identity.email.clone(),
                    name: identity.name.clone(),
                    avatar_url: identity.avatar_url.clone(),
                    active_role: AccountRole::Buyer,
                    is_profile_complete: false,
                    created_at: now,
                    updated_at: now,
                };
                let id = account.id;
                state.accounts.insert(id, account);
                id
            }
        };

        state
            .buyer_profiles
            .entry(account_id)
            .or_insert_with(|| empty_buyer_profile(account_id));

        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if account.google_id.is_none() {
            account.google_id = Some(identity.provider_subject.clone());
        }

        Ok(account.clone())
    }

    async fn update_active_role(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Account>, sqlx::Error> {
        self.delay().await;
        let mut state = self.state.lock().await;
        Ok(state.accounts.get_mut(&account_id).map(|account| {
            account.active_role = role;
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn mark_profile_complete(&self, account_id: Uuid) -> Result<(), sqlx::Error> {
        self.delay().await;
        if let Some(account) = self.state.lock().await.accounts.get_mut(&account_id) {
            account.is_profile_complete = true;
        }
        Ok(())
    }
}
