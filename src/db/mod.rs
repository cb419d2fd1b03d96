pub mod accountdb;
pub mod contactdb;
pub mod dashboarddb;
pub mod db;
pub mod ledgerdb;
#[cfg(test)]
pub mod memory;
pub mod profiledb;
pub mod proposaldb;
pub mod query_timeout;
pub mod requirementdb;
pub mod subscriptiondb;

pub use db::DBClient;
