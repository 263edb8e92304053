use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::env::non_empty_var;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::{repo::SeaOrmAuthRepository, AuthConfig, AuthService};
use service::cache::{CacheStore, MokaCache, NoopCache};
use service::catalog::{repo::SeaOrmCatalogRepository, CatalogService};
use service::intake::{notifier, repo::SeaOrmIntakeRepository, IntakeService, NotifyAddresses};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file if present, otherwise defaults plus `SERVER_HOST` / `SERVER_PORT`.
fn load_config() -> Result<(AppConfig, SocketAddr), StartupError> {
    let (cfg, host, port) = match AppConfig::load_and_validate() {
        Ok(cfg) => {
            let (host, port) = (cfg.server.host.clone(), cfg.server.port);
            (cfg, host, port)
        }
        Err(e) => {
            warn!(error = %e, "config file unusable, falling back to defaults and environment");
            let cfg = AppConfig::load_or_default().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            let host = non_empty_var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
            let port = non_empty_var("SERVER_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (cfg, host, port)
        }
    };
    let addr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {host}:{port}: {e}")))?;
    Ok((cfg, addr))
}

pub fn cache_from_config(cfg: &configs::CacheConfig) -> Arc<dyn CacheStore> {
    if cfg.enabled {
        Arc::new(MokaCache::from_config(cfg))
    } else {
        info!("catalog cache disabled");
        Arc::new(NoopCache)
    }
}

/// Wire sea-orm repositories, the cache and the notifier into handler state.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let auth = AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), AuthConfig::from(&cfg.auth));
    let catalog = CatalogService::new(Arc::new(SeaOrmCatalogRepository::new(db.clone())), cache_from_config(&cfg.cache))
        .with_ttl(Duration::from_secs(cfg.cache.ttl_secs));
    let notifier = notifier::from_config(&cfg.notification).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let intake = IntakeService::new(
        Arc::new(SeaOrmIntakeRepository::new(db)),
        notifier,
        NotifyAddresses::from(&cfg.notification),
    );
    Ok(ServerState { auth: Arc::new(auth), catalog: Arc::new(catalog), intake: Arc::new(intake) })
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let (cfg, addr) = load_config()?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db).await?;

    let app = build_app(build_state(db, &cfg)?);

    // Bind and serve
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
