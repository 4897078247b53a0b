//! Configuración de base de datos
//!
//! Este módulo resuelve la cadena de conexión de Postgres (Neon) desde el
//! entorno y construye el pool de conexiones con SQLx.

use std::str::FromStr;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::{first_present, normalize_env_value, parse_or_default, ConfigError, EnvLookup};

/// Variables reconocidas, en orden de preferencia
pub const DATABASE_URL_VARS: [&str; 2] = ["NEON_DATABASE_URL", "DATABASE_URL"];

lazy_static! {
    static ref POSTGRES_URL: Regex = Regex::new(r#"postgres(?:ql)?://[^\s'"]+"#)
        .expect("postgres url regex is valid");
}

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub statement_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&super::process_env)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let url = resolve_database_url(lookup)?;
        let max_connections = parse_or_default(lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let statement_timeout_ms =
            parse_or_default(lookup, "DATABASE_STATEMENT_TIMEOUT_MS", 10_000u64)?;

        Ok(Self {
            url,
            max_connections: max_connections.max(1),
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_millis(statement_timeout_ms),
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        let statement_timeout = self.statement_timeout.as_millis().to_string();
        let options = PgConnectOptions::from_str(&self.url)?
            .options([("statement_timeout", statement_timeout.as_str())]);

        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(0)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .connect_with(options)
            .await
    }

    /// URL sin credenciales, apta para logs
    pub fn masked_url(&self) -> String {
        mask_database_url(&self.url)
    }
}

/// Resolver la URL desde NEON_DATABASE_URL o DATABASE_URL
pub fn resolve_database_url(lookup: EnvLookup<'_>) -> Result<String, ConfigError> {
    let source = DATABASE_URL_VARS
        .iter()
        .copied()
        .find(|key| first_present(lookup, &[*key]).is_some())
        .ok_or(ConfigError::MissingVariable("NEON_DATABASE_URL or DATABASE_URL"))?;

    let raw = first_present(lookup, &[source]).unwrap_or_default();
    extract_connection_string(&raw).ok_or(ConfigError::InvalidConnectionString(source))
}

/// Extraer la URL de Postgres de un valor crudo: URL directa, valor entre
/// comillas o un comando `psql '<url>'` copiado del panel de Neon.
pub fn extract_connection_string(raw: &str) -> Option<String> {
    let mut value = normalize_env_value(raw)?;

    if let Some(rest) = value.strip_prefix("psql") {
        value = normalize_env_value(rest)?;
    }

    POSTGRES_URL
        .find(&value)
        .map(|m| m.as_str().to_string())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    match url.rfind('@') {
        Some(at_pos) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
