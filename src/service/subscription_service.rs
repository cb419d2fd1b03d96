use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::error::ServiceError;
use crate::{
    db::{query_timeout::QueryTimeout, subscriptiondb::SubscriptionExt, DBClient},
    models::{
        accountmodel::AccountRole,
        subscriptionmodels::{PlanType, Subscription},
    },
};

pub struct SubscriptionService<S = DBClient> {
    store: Arc<S>,
    basic_plan_views: i32,
    store_timeout: Duration,
}

impl<S> SubscriptionService<S>
where
    S: SubscriptionExt + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, basic_plan_views: i32, store_timeout: Duration) -> Self {
        Self {
            store,
            basic_plan_views,
            store_timeout,
        }
    }

    pub async fn get_active(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<Option<Subscription>, ServiceError> {
        QueryTimeout::run(
            self.store_timeout,
            self.store.get_active_subscription(account_id, role),
        )
        .await
    }

    /// Records the plan; no payment is taken. Any previously active plan for
    /// the same role is switched off in the same step.
    pub async fn purchase(
        &self,
        account_id: Uuid,
        role: AccountRole,
        plan_type: PlanType,
    ) -> Result<Subscription, ServiceError> {
        let views_remaining = plan_type.initial_views(self.basic_plan_views);

        QueryTimeout::run(
            self.store_timeout,
            self.store
                .purchase_subscription(account_id, role, plan_type, views_remaining),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> SubscriptionService<MemoryStore> {
        SubscriptionService::new(store.clone(), 5, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_basic_purchase_starts_with_allotment() {
        let store = Arc::new(MemoryStore::new());
        let seller = store.seed_account("Sam").await;

        let subscription = service(&store)
            .purchase(seller.id, AccountRole::Seller, PlanType::Basic)
            .await
            .unwrap();

        assert_eq!(subscription.views_remaining, Some(5));
        assert!(subscription.is_active);
    }

    #[tokio::test]
    async fn test_lifetime_replaces_basic() {
        let store = Arc::new(MemoryStore::new());
        let buyer = store.seed_account("Bea").await;
        let service = service(&store);

        let basic = store
            .purchase_subscription(buyer.id, AccountRole::Buyer, PlanType::Basic, Some(3))
            .await
            .unwrap();
        let lifetime = service
            .purchase(buyer.id, AccountRole::Buyer, PlanType::Lifetime)
            .await
            .unwrap();

        let rows = store.subscriptions_for(buyer.id, AccountRole::Buyer).await;
        let active: Vec<_> = rows.iter().filter(|s| s.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, lifetime.id);
        assert_eq!(active[0].views_remaining, None);

        let old = rows.iter().find(|s| s.id == basic.id).unwrap();
        assert!(!old.is_active);
        assert_eq!(old.views_remaining, Some(3));
    }

    #[tokio::test]
    async fn test_repeated_purchases_leave_one_active() {
        let store = Arc::new(MemoryStore::new());
        let seller = store.seed_account("Sam").await;
        let service = service(&store);

        for plan in [PlanType::Basic, PlanType::Basic, PlanType::Lifetime, PlanType::Basic] {
            service.purchase(seller.id, AccountRole::Seller, plan).await.unwrap();
        }

        let rows = store.subscriptions_for(seller.id, AccountRole::Seller).await;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().filter(|s| s.is_active).count(), 1);

        let active = service
            .get_active(seller.id, AccountRole::Seller)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.plan_type, PlanType::Basic);
    }

    #[tokio::test]
    async fn test_roles_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let account = store.seed_account("Ola").await;
        let service = service(&store);

        service
            .purchase(account.id, AccountRole::Buyer, PlanType::Lifetime)
            .await
            .unwrap();

        assert!(service
            .get_active(account.id, AccountRole::Seller)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_decrement_rules() {
        let store = MemoryStore::new();
        let seller = store.seed_account("Sam").await;

        let basic = store
            .purchase_subscription(seller.id, AccountRole::Seller, PlanType::Basic, Some(1))
            .await
            .unwrap();
        let after = store.decrement_views(basic.id).await.unwrap();
        assert_eq!(after.views_remaining, Some(0));
        assert!(matches!(
            store.decrement_views(basic.id).await,
            Err(ServiceError::AlreadyExhausted(_))
        ));

        let lifetime = store
            .purchase_subscription(seller.id, AccountRole::Seller, PlanType::Lifetime, None)
            .await
            .unwrap();
        assert!(matches!(
            store.decrement_views(lifetime.id).await,
            Err(ServiceError::NotBasicPlan(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_purchase_fails_closed() {
        let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(200)));
        let seller = store.seed_account("Sam").await;
        let service = SubscriptionService::new(store.clone(), 5, Duration::from_millis(20));

        let err = service
            .purchase(seller.id, AccountRole::Seller, PlanType::Basic)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::TransientStore(_)));
        assert!(store.subscriptions_for(seller.id, AccountRole::Seller).await.is_empty());
    }
}
