//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor HTTP. Las credenciales de
//! base de datos y Firebase se resuelven de forma perezosa en sus propios módulos.

use super::{first_present, parse_or_default, ConfigError, EnvLookup};

/// Tope por defecto del body: las imágenes pueden llegar como data URL
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub log_level: tracing::Level,
    pub max_body_bytes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            log_level: tracing::Level::INFO,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&super::process_env)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cors_origins = first_present(lookup, &["CORS_ORIGINS"])
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_level = first_present(lookup, &["LOG_LEVEL"])
            .and_then(|level| level.parse().ok())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            environment: first_present(lookup, &["ENVIRONMENT"]).unwrap_or(defaults.environment),
            port: parse_or_default(lookup, "PORT", defaults.port)?,
            host: first_present(lookup, &["HOST"]).unwrap_or(defaults.host),
            cors_origins,
            log_level,
            max_body_bytes: parse_or_default(lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// CORS abierto cuando no hay orígenes o se pide `*`
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// Aviso de arranque cuando CORS queda abierto en producción
    pub fn cors_warning(&self) -> Option<String> {
        (self.is_production() && self.allows_any_origin()).then(|| {
            format!(
                "CORS abierto a cualquier origen en {} (definir CORS_ORIGINS)",
                self.environment
            )
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
