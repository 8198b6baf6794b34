mod auth_log;
mod config;
mod guard;
mod routes;
mod state;

use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env()?;
    if config.guard.login_referer_bypass {
        tracing::warn!("login-referer dashboard bypass is enabled");
    }
    if !config.static_dir.join("index.html").exists() {
        tracing::warn!(dir = %config.static_dir.display(), "static dir has no index.html");
    }

    let state = state::AppState::new(config.guard);
    let app = routes::app(state, &config.static_dir);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "backoffice server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
