//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, credenciales de
//! Firebase, variables de entorno del servidor y la normalización de sus valores.

pub mod database;
pub mod environment;
pub mod firebase;

pub use database::DatabaseConfig;
pub use environment::EnvironmentConfig;
pub use firebase::FirebaseCredentials;

use thiserror::Error;

/// Errores de configuración del entorno
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVariable(&'static str),

    #[error("{0} does not contain a valid postgres:// connection string")]
    InvalidConnectionString(&'static str),

    #[error("Invalid Firebase private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid Firebase service account: {0}")]
    InvalidServiceAccount(String),

    #[error("{name} must be a valid number (got '{value}')")]
    InvalidNumber { name: &'static str, value: String },
}

/// Lectura de variables de entorno inyectable en tests
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Lectura real del proceso
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Normalizar un valor de entorno: recortar y quitar comillas envolventes.
/// Devuelve `None` si queda vacío.
pub fn normalize_env_value(raw: &str) -> Option<String> {
    let mut value = raw.trim();

    loop {
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)));
        match unquoted {
            Some(inner) if value.len() >= 2 => value = inner.trim(),
            _ => break,
        }
    }

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Primer valor no vacío entre varias variables
pub(crate) fn first_present(lookup: EnvLookup<'_>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .find_map(|raw| normalize_env_value(&raw))
}

/// Variable numérica opcional con valor por defecto
pub(crate) fn parse_or_default<T: std::str::FromStr>(
    lookup: EnvLookup<'_>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name).and_then(|raw| normalize_env_value(&raw)) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
