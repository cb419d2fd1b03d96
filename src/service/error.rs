use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("You cannot unlock your own profile")]
    SelfViewForbidden,

    #[error("An active subscription is required to view this profile")]
    SubscriptionRequired,

    #[error("No views left on your plan")]
    ViewLimitReached,

    #[error("The requested profile does not exist")]
    SubjectNotFound,

    #[error("You have already sent a proposal for this requirement")]
    DuplicateProposal,

    #[error("{0}")]
    AlreadyProcessed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Subscription {0} is not a basic plan")]
    NotBasicPlan(Uuid),

    #[error("Subscription {0} has no views left")]
    AlreadyExhausted(Uuid),

    #[error("Store unavailable: {0}")]
    TransientStore(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ServiceError::TransientStore(error.to_string())
            }
            other => ServiceError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated(_) => "UNAUTHENTICATED",
            ServiceError::SelfViewForbidden => "SELF_VIEW_FORBIDDEN",
            ServiceError::SubscriptionRequired => "SUBSCRIPTION_REQUIRED",
            ServiceError::ViewLimitReached => "VIEW_LIMIT_REACHED",
            ServiceError::SubjectNotFound => "SUBJECT_NOT_FOUND",
            ServiceError::DuplicateProposal => "DUPLICATE_PROPOSAL",
            ServiceError::AlreadyProcessed(_) => "ALREADY_PROCESSED",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::NotBasicPlan(_) => "NOT_BASIC_PLAN",
            ServiceError::AlreadyExhausted(_) => "ALREADY_EXHAUSTED",
            ServiceError::TransientStore(_) => "TRANSIENT_STORE_ERROR",
            ServiceError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,

            ServiceError::SelfViewForbidden
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::SubscriptionRequired
            | ServiceError::ViewLimitReached
            | ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,

            ServiceError::SubjectNotFound
            | ServiceError::NotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::DuplicateProposal
            | ServiceError::AlreadyProcessed(_)
            | ServiceError::Conflict(_)
            | ServiceError::NotBasicPlan(_)
            | ServiceError::AlreadyExhausted(_) => StatusCode::CONFLICT,

            ServiceError::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Unique-constraint violation (SQLSTATE 23505) on the named constraint.
    pub fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
        match error {
            sqlx::Error::Database(db_error) => {
                db_error.code().as_deref() == Some("23505")
                    && db_error.constraint() == Some(constraint)
            }
            _ => false,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        let code = error.code();

        let message = match &error {
            ServiceError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal Server Error".to_string()
            }
            ServiceError::TransientStore(e) => {
                tracing::warn!(error = %e, "store unavailable, failing closed");
                "Service temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        };

        HttpError::new(message, status).with_code(code)
    }
}
