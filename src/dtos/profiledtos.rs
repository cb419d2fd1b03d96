use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct BuyerProfileDto {
    #[validate(length(max = 255, message = "Company name is too long"))]
    pub company_name: Option<String>,

    pub requirements: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SellerProfileDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Comma-separated.
    pub skills: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: Option<i32>,

    pub bio: Option<String>,

    #[validate(length(max = 100, message = "Country is too long"))]
    pub country: Option<String>,
}
