use std::sync::Arc;

use axum::{
    extract::Query,
    response::{IntoResponse, Redirect},
    routing::get,
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use oauth2::CsrfToken;
use serde::Deserialize;
use time::Duration;

use crate::{
    error::{ErrorMessage, HttpError},
    utils::token,
    AppState,
};

const STATE_COOKIE: &str = "oauth_state";

#[derive(Debug, Deserialize)]
pub struct GoogleAuthQuery {
    pub code: String,
    pub state: Option<String>,
}

pub fn oauth_handler() -> Router {
    Router::new()
        .route("/google", get(google_login))
        .route("/google/callback", get(google_callback))
}

pub async fn google_login(
    Extension(app_state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, HttpError> {
    let state = CsrfToken::new_random();
    let state_secret = state.secret().to_string();

    let cookie = Cookie::build((STATE_COOKIE, state_secret.clone()))
        .path("/")
        .max_age(Duration::minutes(10))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let auth_url = app_state.google_auth.get_authorization_url(&state_secret);

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

pub async fn google_callback(
    Extension(app_state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<GoogleAuthQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let stored_state = jar
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::InvalidCsrfState.to_string()))?;

    if query.state.as_deref() != Some(stored_state.as_str()) {
        tracing::warn!("oauth callback with mismatched state");
        return Err(HttpError::unauthorized(ErrorMessage::InvalidCsrfState.to_string()));
    }

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));

    let identity = app_state
        .google_auth
        .exchange_code_for_identity(&query.code)
        .await
        .map_err(|e| {
            tracing::warn!("google sign-in failed: {}", e);
            HttpError::unauthorized(e.to_string())
        })?;

    let account = app_state
        .account_service
        .ensure_account_provisioned(&identity)
        .await?;

    let token = token::create_token(
        &account.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", token))
        .path("/")
        .max_age(Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(account_id = %account.id, "signed in with google");

    Ok((jar.add(cookie), Redirect::to(&app_state.env.app_url)))
}
