pub mod accountmodel;
pub mod dashboardmodels;
pub mod profilemodels;
pub mod proposalmodels;
pub mod requirementmodel;
pub mod subscriptionmodels;
