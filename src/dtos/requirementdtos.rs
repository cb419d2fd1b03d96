use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_non_negative;
use crate::models::requirementmodel::{RequirementStatus, Urgency};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateRequirementDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(custom = "validate_non_negative")]
    pub budget: Option<BigDecimal>,

    pub deadline: Option<NaiveDate>,

    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,

    pub urgency: Option<Urgency>,
}

/// Full replacement of the editable fields. `urgency` and `status` are kept
/// when omitted.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateRequirementDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(custom = "validate_non_negative")]
    pub budget: Option<BigDecimal>,

    pub deadline: Option<NaiveDate>,

    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,

    pub urgency: Option<Urgency>,

    pub status: Option<RequirementStatus>,
}
