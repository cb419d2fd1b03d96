pub mod access;
pub mod account;
pub mod auth;
pub mod buyer;
pub mod google_oauth;
pub mod seller;
