use anyhow::Context;
use saas_database::DatabaseConfig;
use saas_tenant::ExclusionList;
use serde::Deserialize;

/// Raw view of the process environment. Keys are the lowercased variable
/// names (`SERVER_PORT` -> `server_port`).
#[derive(Debug, Deserialize)]
struct EnvSettings {
    server_host: String,
    server_port: u16,
    jwt_secret: Option<String>,
    jwt_access_token_hours: i64,
    database_url: Option<String>,
    database_max_connections: Option<u32>,
    database_min_connections: Option<u32>,
    tenant_excluded_paths: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_access_token_hours: i64,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub tenant_exclusions: ExclusionList,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 3000)?
            .set_default("jwt_access_token_hours", 1)?
            .add_source(::config::Environment::default())
            .build()
            .context("Failed to read configuration from environment")?;

        let env: EnvSettings = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::from_settings(env)
    }

    fn from_settings(env: EnvSettings) -> anyhow::Result<Self> {
        let jwt_secret = env
            .jwt_secret
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET must be set")?;

        let database = env.database_url.map(|url| {
            let config = DatabaseConfig::new(url);
            let min = env.database_min_connections.unwrap_or(config.min_connections);
            let max = env.database_max_connections.unwrap_or(config.max_connections);
            config.with_pool_size(min, max)
        });

        let tenant_exclusions = env
            .tenant_excluded_paths
            .as_deref()
            .map(ExclusionList::from_csv)
            .unwrap_or_default();

        Ok(Self {
            server_host: env.server_host,
            server_port: env.server_port,
            jwt_secret,
            jwt_access_token_hours: env.jwt_access_token_hours,
            database,
            tenant_exclusions,
        })
    }
}
