pub mod accessdtos;
pub mod accountdtos;
pub mod profiledtos;
pub mod proposaldtos;
pub mod requirementdtos;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

impl RequestQueryDto {
    /// (limit, offset), defaulting to the first page of 20.
    pub fn window(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(20) as i64;
        let page = self.page.unwrap_or(1).max(1) as i64;
        (limit, (page - 1) * limit)
    }
}

pub fn validate_non_negative(amount: &BigDecimal) -> Result<(), ValidationError> {
    if *amount < BigDecimal::zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Amount cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&BigDecimal::from_str("0").unwrap()).is_ok());
        assert!(validate_non_negative(&BigDecimal::from_str("120.50").unwrap()).is_ok());
        assert!(validate_non_negative(&BigDecimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_request_query_window() {
        assert_eq!(RequestQueryDto::default().window(), (20, 0));
        let query = RequestQueryDto {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(query.window(), (10, 20));
    }

    #[test]
    fn test_api_response_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][1], 2);
    }
}
