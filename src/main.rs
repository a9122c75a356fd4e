use dotenvy::dotenv;
use tracing::info;

mod app;
mod common;
mod config;
mod docs;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting server...");

    let config = config::settings::AppConfig::new().expect("YT_API_KEY must be set");

    // The scratch cache directory must exist before the first stream request.
    std::fs::create_dir_all(&config.cache_dir).expect("failed to create cache directory");

    let state = state::AppState::new(config);
    let addr = format!("0.0.0.0:{}", state.config.server_port);

    let app = app::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
