use sketchroom::config::ServerConfig;
use sketchroom::error::AppError;
use sketchroom::routes;
use sketchroom::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let addr = config.listen_addr();
    let state = AppState::new(config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "sketchroom listening");
    axum::serve(listener, app).await?;
    Ok(())
}
