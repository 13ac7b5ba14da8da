use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::communication::emails::EmailService,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod email;
pub mod stoplight;

pub fn router<E: EmailService>() -> Router<AppState<E>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/email/send", post(email::send_email::handler::<E>))
}
