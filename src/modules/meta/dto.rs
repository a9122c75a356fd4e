use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

/// One changelog entry, rendered as `version|date|notes` for the
/// handheld or as JSON for everyone else.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateEntry {
    pub version: &'static str,
    pub date: &'static str,
    pub notes: &'static str,
}
