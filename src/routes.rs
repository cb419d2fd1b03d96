use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        access::{access_handler, subscription_handler},
        account::account_handler,
        auth::auth_handler,
        buyer::buyer_handler,
        google_oauth::oauth_handler,
        seller::seller_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .nest("/account", account_handler())
        .nest("/subscriptions", subscription_handler())
        .nest("/access", access_handler())
        .nest("/buyer", buyer_handler())
        .nest("/seller", seller_handler())
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/oauth", oauth_handler())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
