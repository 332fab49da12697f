//! Entry point: load config, wire dependencies, and run the server.

use shopcart::auth::JwtSecret;
use shopcart::config::{self, Config, StorageBackend};
use shopcart::db::{self, DynProductStore, DynUserStore, MemoryStore, PgProductStore, PgUserStore};
use shopcart::services::{AuthService, CatalogService};
use shopcart::{create_app, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match env_file {
        Some(file) => tracing::info!(file = %file, app_env = %config.app_env, "loaded env file"),
        None => tracing::warn!(app_env = %config.app_env, "no .env file found, using process environment"),
    }

    let users: DynUserStore;
    let products: DynProductStore;
    match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("connected to postgres");
            users = Arc::new(PgUserStore::new(pool.clone()));
            products = Arc::new(PgProductStore::new(pool));
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            users = Arc::new(store.clone());
            products = Arc::new(store);
        }
    }

    let auth_service = AuthService::new(users, JwtSecret::new(config.jwt_secret.clone()));
    let catalog_service = CatalogService::new(products);
    let state = AppState::new(auth_service, catalog_service)
        .map_err(|e| anyhow::anyhow!("schema: {}", e))?;

    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
