pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::DBClient;
use service::{
    access_gate::AccessGateService, account_service::AccountService,
    google_oauth::GoogleAuthService, proposal_service::ProposalService,
    subscription_service::SubscriptionService,
};

/// Shared handler state. Every service runs over the same pool.
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub access_gate: AccessGateService,
    pub subscription_service: SubscriptionService,
    pub proposal_service: ProposalService,
    pub account_service: AccountService,
    pub google_auth: GoogleAuthService,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        AppState {
            access_gate: AccessGateService::new(db_client.clone(), config.store_timeout),
            subscription_service: SubscriptionService::new(
                db_client.clone(),
                config.basic_plan_views,
                config.store_timeout,
            ),
            proposal_service: ProposalService::new(db_client.clone(), config.store_timeout),
            account_service: AccountService::new(db_client.clone()),
            google_auth: GoogleAuthService::new(&config),
            db_client,
            env: config,
        }
    }
}
