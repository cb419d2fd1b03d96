use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::accountdb::AccountExt,
    error::{ErrorMessage, HttpError},
    models::accountmodel::Account,
    service::error::ServiceError,
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddleware {
    pub account: Account,
}

/// Session token from the `token` cookie, else a bearer header.
fn session_token(cookie_jar: &CookieJar, req: &Request) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_owned())
        })
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = session_token(&cookie_jar, &req).ok_or_else(|| {
        ServiceError::Unauthenticated(ErrorMessage::TokenNotProvided.to_string())
    })?;

    let account_id = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let account_id = uuid::Uuid::parse_str(&account_id)
        .map_err(|_| ServiceError::Unauthenticated(ErrorMessage::InvalidToken.to_string()))?;

    let account = app_state
        .db_client
        .get_account(account_id)
        .await
        .map_err(|e| {
            tracing::error!("session lookup failed: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| {
            ServiceError::Unauthenticated(ErrorMessage::AccountNoLongerExists.to_string())
        })?;

    req.extensions_mut().insert(JWTAuthMiddleware { account });

    Ok(next.run(req).await)
}
