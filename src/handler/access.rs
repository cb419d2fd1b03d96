use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    dtos::{
        accessdtos::{
            AccessCheckDto, CheckAccessQuery, PurchaseSubscriptionDto, SubscriptionDto,
            ViewOutcomeDto, ViewSubjectQuery,
        },
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::accountmodel::AccountRole,
    AppState,
};

pub fn subscription_handler() -> Router {
    Router::new().route("/:role", get(get_active_subscription).post(purchase_subscription))
}

pub fn access_handler() -> Router {
    Router::new()
        .route("/:role/check", get(check_access))
        .route("/:role/view", get(view_subject))
}

pub async fn get_active_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(role): Path<AccountRole>,
) -> Result<impl IntoResponse, HttpError> {
    let subscription = app_state
        .subscription_service
        .get_active(user.account.id, role)
        .await?;

    Ok(Json(ApiResponse::ok(
        subscription.as_ref().map(SubscriptionDto::filter_subscription),
    )))
}

pub async fn purchase_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(role): Path<AccountRole>,
    Json(body): Json<PurchaseSubscriptionDto>,
) -> Result<impl IntoResponse, HttpError> {
    let subscription = app_state
        .subscription_service
        .purchase(user.account.id, role, body.plan_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SubscriptionDto::filter_subscription(
            &subscription,
        ))),
    ))
}

pub async fn check_access(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(role): Path<AccountRole>,
    Query(query): Query<CheckAccessQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let allowed = app_state
        .access_gate
        .check_access(user.account.id, role, query.subject_id)
        .await?;

    Ok(Json(ApiResponse::ok(AccessCheckDto { allowed })))
}

pub async fn view_subject(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(role): Path<AccountRole>,
    Query(query): Query<ViewSubjectQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .access_gate
        .view_subject(user.account.id, role, query.into())
        .await?;

    Ok(Json(ApiResponse::ok(ViewOutcomeDto::new(
        outcome.profile,
        &outcome.receipt.subscription,
        outcome.receipt.admission,
    ))))
}
