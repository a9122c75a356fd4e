use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod cache;
pub mod dto;
pub mod handler;
pub mod range;
pub mod resolver;
pub mod service;
pub mod transcoder;

pub fn router() -> Router<AppState> {
    Router::new().route("/stream/{id}", get(handler::stream_video))
}
