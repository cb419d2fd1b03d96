use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_non_negative;
use crate::models::proposalmodels::ProposalDecision;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateProposalDto {
    pub requirement_id: Uuid,

    #[validate(length(max = 5000, message = "Message is too long"))]
    pub message: Option<String>,

    #[validate(custom = "validate_non_negative")]
    pub proposed_budget: Option<BigDecimal>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProposalDto {
    #[validate(length(max = 5000, message = "Message is too long"))]
    pub message: Option<String>,

    #[validate(custom = "validate_non_negative")]
    pub proposed_budget: Option<BigDecimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDecisionDto {
    pub status: ProposalDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_accepts_only_terminal_states() {
        let dto: ProposalDecisionDto = serde_json::from_str(r#"{"status":"accepted"}"#).unwrap();
        assert_eq!(dto.status, ProposalDecision::Accepted);
        assert!(serde_json::from_str::<ProposalDecisionDto>(r#"{"status":"pending"}"#).is_err());
    }
}
