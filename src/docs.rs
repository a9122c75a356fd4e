use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::meta::handler::health,
        crate::modules::meta::handler::update_log,
        crate::modules::search::handler::search,
        crate::modules::search::handler::stream_info,
        crate::modules::stream::handler::stream_video,
    ),
    components(
        schemas(
            crate::modules::meta::dto::HealthResponse,
            crate::modules::meta::dto::UpdateEntry,
            crate::modules::search::dto::SearchItem,
            crate::modules::search::dto::VideoInfoResponse,
            crate::modules::stream::dto::StreamFormat,
            crate::common::response::ErrorBody,
        )
    ),
    tags(
        (name = "Meta", description = "Service health and changelog"),
        (name = "Search", description = "YouTube search and video metadata"),
        (name = "Stream", description = "Transcoded video delivery")
    )
)]
pub struct ApiDoc;
