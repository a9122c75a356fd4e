use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(handler::search))
        .route("/stream-info/{id}", get(handler::stream_info))
}
