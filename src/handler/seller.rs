use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        dashboarddb::DashboardExt, profiledb::ProfileExt, proposaldb::ProposalQueryExt,
        requirementdb::RequirementExt,
    },
    dtos::{
        accessdtos::ViewOutcomeDto,
        profiledtos::SellerProfileDto,
        proposaldtos::{CreateProposalDto, UpdateProposalDto},
        ApiResponse, MessageResponse, RequestQueryDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::{
        accountmodel::AccountRole, proposalmodels::Proposal,
        requirementmodel::RequirementListing,
    },
    service::{access_gate::SubjectRef, error::ServiceError},
    AppState,
};

/// A seller's own proposal together with the requirement it answers.
#[derive(Debug, Serialize)]
pub struct SellerRequestDetail {
    pub proposal: Proposal,
    pub requirement: RequirementListing,
}

pub fn seller_handler() -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile)
                .post(create_profile)
                .put(update_profile)
                .delete(delete_profile),
        )
        .route("/requirements", get(browse_requirements))
        .route("/requirements/:id", get(get_requirement))
        .route("/requests", get(list_requests).post(create_request))
        // GET takes a requirement id; PUT and DELETE take a proposal id.
        .route(
            "/requests/:id",
            get(get_request).put(update_request).delete(withdraw_request),
        )
        .route("/clients", get(list_clients))
        .route("/view-buyer/:requirement_id", get(view_buyer))
        .route("/dashboard", get(dashboard))
}

pub async fn get_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_seller_profile(user.account.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Seller profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn create_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<SellerProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .create_seller_profile(user.account.id, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<SellerProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .update_seller_profile(user.account.id, &body)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Seller profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn delete_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_seller_profile(user.account.id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(HttpError::not_found("Seller profile not found"));
    }

    Ok(Json(MessageResponse::ok("Seller profile deleted")))
}

pub async fn browse_requirements(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (limit, offset) = query.window();
    let requirements = app_state
        .db_client
        .browse_requirements(limit, offset)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(requirements)))
}

pub async fn get_requirement(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(requirement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let requirement = app_state
        .db_client
        .get_requirement_listing(requirement_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Requirement not found"))?;

    Ok(Json(ApiResponse::ok(requirement)))
}

pub async fn list_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let proposals = app_state
        .db_client
        .get_seller_proposals(user.account.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(proposals)))
}

pub async fn create_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .proposal_service
        .create_proposal(user.account.id, body)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(proposal))))
}

pub async fn get_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(requirement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .db_client
        .get_seller_proposal_for_requirement(user.account.id, requirement_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Proposal not found"))?;

    let requirement = app_state
        .db_client
        .get_requirement_listing(requirement_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Requirement not found"))?;

    Ok(Json(ApiResponse::ok(SellerRequestDetail {
        proposal,
        requirement,
    })))
}

pub async fn update_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(proposal_id): Path<Uuid>,
    Json(body): Json<UpdateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .proposal_service
        .update_proposal(user.account.id, proposal_id, body)
        .await?;

    Ok(Json(ApiResponse::ok(proposal)))
}

pub async fn withdraw_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(proposal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .proposal_service
        .withdraw_proposal(user.account.id, proposal_id)
        .await?;

    Ok(Json(MessageResponse::ok("Proposal withdrawn")))
}

pub async fn list_clients(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let clients = app_state
        .db_client
        .get_seller_clients(user.account.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(ApiResponse::ok(clients)))
}

pub async fn view_buyer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(requirement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .access_gate
        .view_subject(
            user.account.id,
            AccountRole::Seller,
            SubjectRef::Requirement(requirement_id),
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
        .get_seller_dashboard(user.account.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found("Account not found"))?;

    Ok(Json(ApiResponse::ok(dashboard)))
}
