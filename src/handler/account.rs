use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};

use crate::{
    dtos::{
        accountdtos::{FilterAccountDto, SwitchRoleDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn account_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/role", put(switch_role))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(ApiResponse::ok(FilterAccountDto::filter_account(
        &user.account,
    ))))
}

pub async fn switch_role(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<SwitchRoleDto>,
) -> Result<impl IntoResponse, HttpError> {
    let account = app_state
        .account_service
        .switch_role(user.account.id, body.role)
        .await?;

    Ok(Json(ApiResponse::ok(FilterAccountDto::filter_account(
        &account,
    ))))
}
