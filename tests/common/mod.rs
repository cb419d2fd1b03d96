#![allow(dead_code)]

use std::sync::Arc;

use meetwise::{
    config::Config,
    db::{accountdb::AccountExt, DBClient},
    models::accountmodel::{Account, ExternalIdentity},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// App state over a pool that never connects. Enough for routes that are
/// rejected before any query runs.
pub fn offline_state() -> Arc<AppState> {
    let config = Config::test_default();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    Arc::new(AppState::new(DBClient::new(pool), config))
}

/// A migrated store, or `None` when TEST_DATABASE_URL is unset.
pub async fn live_store() -> Option<Arc<DBClient>> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");

    let client = DBClient::new(pool);
    client.migrate().await.expect("migrations");
    Some(Arc::new(client))
}

pub async fn provision(store: &DBClient, name: &str) -> Account {
    let tag = Uuid::new_v4().simple().to_string();
    let identity = ExternalIdentity {
        provider_subject: format!("google-{}", tag),
        email: format!("{}-{}@example.com", name.to_lowercase(), tag),
        name: name.to_string(),
        avatar_url: None,
    };

    store
        .ensure_account_provisioned(&identity)
        .await
        .expect("provision account")
}
