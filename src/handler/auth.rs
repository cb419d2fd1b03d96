use axum::{response::IntoResponse, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{dtos::MessageResponse, error::HttpError};

pub fn auth_handler() -> Router {
    Router::new().route("/logout", post(logout))
}

pub async fn logout(jar: CookieJar) -> Result<impl IntoResponse, HttpError> {
    let jar = jar.remove(Cookie::build("token").path("/"));

    Ok((jar, Json(MessageResponse::ok("Logged out"))))
}
