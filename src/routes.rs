use crate::common::response::ApiError;
use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower_http::cors::{Any, CorsLayer};

pub fn configure_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", crate::modules::meta::router())
        .nest("/api", crate::modules::search::router())
        .nest("/api", crate::modules::stream::router())
        .fallback(|| async { ApiError::RouteNotFound })
        .layer(cors)
}
