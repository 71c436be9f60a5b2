// Talent API Server
// Multi-tenant REST API for managing a customer's talent pool

mod config;
mod handlers;
mod middleware;
mod routes;
mod store;

use anyhow::Context;
use crate::config::Config;
use dotenvy::dotenv;
use saas_auth::JwtService;
use saas_database::{Database, InMemoryStore, PgStore};
use saas_talent::TalentService;
use saas_tenant::TenantResolver;
use std::sync::Arc;
use store::TalentStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub jwt: JwtService,
    pub resolver: TenantResolver,
    pub talents: TalentService<TalentStore>,
}

impl AppState {
    pub fn new(jwt: JwtService, resolver: TenantResolver, store: TalentStore) -> Self {
        Self {
            jwt,
            resolver,
            talents: TalentService::new(store),
        }
    }
}

async fn open_store(config: &Config) -> anyhow::Result<TalentStore> {
    let Some(db_config) = config.database.clone() else {
        tracing::warn!("⚠️  DATABASE_URL not set, talents are kept in memory only");
        return Ok(TalentStore::Memory(InMemoryStore::new()));
    };

    tracing::info!("🗄️  Connecting to database...");
    let database = Database::new(db_config)
        .await
        .context("Failed to connect to database")?;
    database.ping().await.context("Database ping failed")?;
    database.migrate().await.context("Database migration failed")?;
    tracing::info!("✅ Database connected");

    Ok(TalentStore::Postgres(PgStore::new(database.pool().clone())))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,saas_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("🚀 Starting Talent API Server");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Talent store ready");

    // Initialize JWT service
    let jwt = JwtService::new(&config.jwt_secret)?
        .with_access_token_hours(config.jwt_access_token_hours);
    tracing::info!("🔐 JWT service initialized");

    let resolver = TenantResolver::new(config.tenant_exclusions.clone());
    tracing::info!(
        excluded = ?resolver.exclusions().prefixes(),
        "Tenant resolution configured"
    );

    let state = Arc::new(AppState::new(jwt, resolver, store));

    // Create router
    let app = routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!("📡 Routes configured:");
    tracing::info!("   GET    /health");
    tracing::info!("   GET    /api/talents");
    tracing::info!("   POST   /api/talents");
    tracing::info!("   GET    /api/talents/count");
    tracing::info!("   GET    /api/talents/search?keyword=");
    tracing::info!("   GET    /api/talents/:id");
    tracing::info!("   PUT    /api/talents/:id");
    tracing::info!("   DELETE /api/talents/:id");

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
