use std::{future::Future, net::SocketAddr};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    let (host, port) = (&server.host, server.port);
    format!("{host}:{port}")
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {host}:{port}: {e}")))
}

/// Create the `book` table if it does not exist yet.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), StartupError> {
    migration::Migrator::up(db, None)
        .await
        .map_err(|e| StartupError::Migration(e.to_string()))
}

/// Router over a database connection, schema already applied.
pub fn app(db: DatabaseConnection) -> Router {
    routes::build_router(AppState::from_db(db), build_cors())
}

/// Resolves on Ctrl+C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!(event = "shutdown_signal", "shutdown requested, draining in-flight requests");
}

/// Serve until `shutdown` resolves, then finish in-flight requests and return.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StartupError::Any(e.into()))
}

/// Connect, migrate, and serve with graceful shutdown. `cfg` is expected to be validated.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg.server)?;
    let db_cfg = DatabaseConfig::from(cfg.database);
    if db_cfg.is_in_memory() {
        warn!("using an in-memory database; data is lost on shutdown");
    }
    let db = connect_with_config(&db_cfg).await?;
    migrate(&db).await?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "starting book server");
    serve_until(listener, app(db), shutdown_signal()).await?;
    info!("book server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_comes_from_server_section() -> anyhow::Result<()> {
        let server = ServerConfig { host: "0.0.0.0".into(), port: 9000, worker_threads: None };
        assert_eq!(bind_addr(&server)?, "0.0.0.0:9000".parse::<SocketAddr>()?);

        let bad = ServerConfig { host: "not a host".into(), ..server };
        assert!(matches!(bind_addr(&bad), Err(StartupError::InvalidConfig(_))));
        Ok(())
    }
}
