pub mod access_gate;
pub mod account_service;
pub mod error;
pub mod google_oauth;
pub mod proposal_service;
pub mod subscription_service;
