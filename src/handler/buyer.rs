use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        dashboarddb::DashboardExt, profiledb::ProfileExt, proposaldb::ProposalQueryExt,
        requirementdb::RequirementExt,
    },
    dtos::{
        accessdtos::ViewOutcomeDto,
        profiledtos::BuyerProfileDto,
        proposaldtos::ProposalDecisionDto,
        requirementdtos::{CreateRequirementDto, UpdateRequirementDto},
        ApiResponse, MessageResponse, RequestQueryDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::accountmodel::AccountRole,
    service::{access_gate::SubjectRef, error::ServiceError},
    AppState,
};

pub fn buyer_handler() -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(save_profile))
        .route("/requirements", get(list_requirements).post(create_requirement))
        .route(
            "/requirements/:id",
            get(get_requirement)
                .put(update_requirement)
                .delete(delete_requirement),
        )
        .route("/proposals", get(list_proposals))
        .route("/proposals/:id", patch(decide_proposal))
        .route("/professionals", get(list_professionals))
        .route("/professionals/:seller_profile_id", get(view_professional))
        .route("/dashboard", get(dashboard))
}

pub async fn get_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_buyer_profile_view(user.account.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Buyer not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn save_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<BuyerProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .upsert_buyer_profile(user.account.id, &body)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn list_requirements(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let requirements = app_state
        .db_client
        .get_buyer_requirements(user.account.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(requirements)))
}

pub async fn create_requirement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateRequirementDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let requirement = app_state
        .db_client
        .create_requirement(user.account.id, &body)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(requirement_id = %requirement.id, buyer_id = %user.account.id, "requirement posted");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(requirement))))
}

pub async fn get_requirement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(requirement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let requirement = app_state
        .db_client
        .get_requirement(requirement_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Requirement not found"))?;

    if requirement.buyer_id != user.account.id {
        return Err(ServiceError::Forbidden("You do not own this requirement".to_string()).into());
    }

    Ok(Json(ApiResponse::ok(requirement)))
}

pub async fn update_requirement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(requirement_id): Path<Uuid>,
    Json(body): Json<UpdateRequirementDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let requirement = app_state
        .db_client
        .update_requirement(requirement_id, user.account.id, &body)
        .await?;

    Ok(Json(ApiResponse::ok(requirement)))
}

pub async fn delete_requirement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(requirement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .delete_requirement(requirement_id, user.account.id)
        .await?;

    Ok(Json(MessageResponse::ok("Requirement deleted")))
}

pub async fn list_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let proposals = app_state
        .db_client
        .get_buyer_proposals(user.account.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(proposals)))
}

pub async fn decide_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(proposal_id): Path<Uuid>,
    Json(body): Json<ProposalDecisionDto>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .proposal_service
        .transition_proposal(user.account.id, proposal_id, body.status)
        .await?;

    Ok(Json(ApiResponse::ok(proposal)))
}

pub async fn list_professionals(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (limit, offset) = query.window();
    let professionals = app_state
        .db_client
        .list_professionals(limit, offset)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(professionals)))
}

pub async fn view_professional(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(seller_profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .access_gate
        .view_subject(
            user.account.id,
            AccountRole::Buyer,
            SubjectRef::SellerProfile(seller_profile_id),
        )
        .await?;

    Ok(Json(ApiResponse::ok(ViewOutcomeDto::new(
        outcome.profile,
        &outcome.receipt.subscription,
        outcome.receipt.admission,
    ))))
}

pub async fn dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state
        .db_client
        .get_buyer_dashboard(user.account.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Account not found"))?;

    Ok(Json(ApiResponse::ok(dashboard)))
}
