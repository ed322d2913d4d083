use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use abi::config::{Config, ServerConfig};
use abi::errors::Error;
use db::UserRepo;
use relation::RelationService;

mod api_utils;
pub(crate) mod handlers;
pub(crate) mod routes;

#[derive(Clone, Debug)]
pub struct AppState {
    pub relation: RelationService,
    pub jwt_secret: String,
    /// token lifetime in seconds
    pub token_expires: i64,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let repo = db::user_repo(config).await?;
        Ok(Self::with_repo(repo, &config.server))
    }

    pub fn with_repo(repo: Arc<dyn UserRepo>, server: &ServerConfig) -> Self {
        Self {
            relation: RelationService::new(repo),
            jwt_secret: server.jwt_secret.clone(),
            token_expires: server.token_expires,
        }
    }
}

/// the full router, layers included
pub fn app(state: AppState) -> Router {
    routes::app_routes(state)
}

pub async fn start(config: Config) -> Result<(), Error> {
    let state = AppState::new(&config).await?;
    let app = app(state);
    let listener = TcpListener::bind(&config.server.server_url()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
