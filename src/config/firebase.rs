//! Credenciales de Firebase
//!
//! Carga y normaliza la cuenta de servicio de Firebase desde el entorno.
//! La clave privada puede llegar como PEM con `\n` escapados, dentro de un
//! JSON de cuenta de servicio, o el JSON completo codificado en base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use super::{first_present, normalize_env_value, ConfigError, EnvLookup};

/// Cuenta de servicio normalizada
#[derive(Clone, PartialEq)]
pub struct FirebaseCredentials {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
}

// La clave privada nunca va a los logs
impl std::fmt::Debug for FirebaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseCredentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Campos relevantes del JSON de cuenta de servicio de Google
#[derive(Debug, Default, Deserialize)]
struct ServiceAccountJson {
    project_id: Option<String>,
    client_email: Option<String>,
    private_key: Option<String>,
}

impl FirebaseCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&super::process_env)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let blob = match first_present(lookup, &["FIREBASE_SERVICE_ACCOUNT"]) {
            Some(raw) => decode_service_account(&raw)?,
            None => ServiceAccountJson::default(),
        };

        let raw_key = first_present(lookup, &["FIREBASE_PRIVATE_KEY"]);
        // La clave puede venir como JSON completo: sus campos sirven de respaldo
        let embedded = match raw_key.as_deref() {
            Some(raw) if raw.trim_start().starts_with('{') => decode_service_account(raw)?,
            _ => ServiceAccountJson::default(),
        };

        let project_id = first_present(lookup, &["FIREBASE_PROJECT_ID"])
            .or(embedded.project_id)
            .or(blob.project_id)
            .ok_or(ConfigError::MissingVariable("FIREBASE_PROJECT_ID"))?;

        let client_email = first_present(lookup, &["FIREBASE_CLIENT_EMAIL"])
            .or(embedded.client_email)
            .or(blob.client_email)
            .ok_or(ConfigError::MissingVariable("FIREBASE_CLIENT_EMAIL"))?;

        let private_key = raw_key
            .or(blob.private_key)
            .ok_or(ConfigError::MissingVariable("FIREBASE_PRIVATE_KEY"))?;

        Ok(Self {
            project_id,
            client_email,
            private_key: normalize_private_key(&private_key)?,
        })
    }

    /// Emisor esperado en los ID tokens del proyecto
    pub fn token_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Normalizar la clave privada: extraer del JSON si hace falta, convertir los
/// `\n` escapados en saltos reales y verificar los marcadores PEM.
pub fn normalize_private_key(raw: &str) -> Result<String, ConfigError> {
    let value = normalize_env_value(raw)
        .ok_or_else(|| ConfigError::InvalidPrivateKey("value is empty".to_string()))?;

    let value = if value.starts_with('{') {
        decode_service_account(&value)?
            .private_key
            .ok_or_else(|| {
                ConfigError::InvalidPrivateKey(
                    "service account JSON has no private_key".to_string(),
                )
            })?
    } else {
        value
    };

    let unescaped = value
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\r\n", "\n");
    let key = normalize_env_value(&unescaped)
        .ok_or_else(|| ConfigError::InvalidPrivateKey("value is empty".to_string()))?;

    let has_begin = key.starts_with("-----BEGIN ") && key.contains("PRIVATE KEY-----");
    let has_end = key.contains("-----END ") && key.trim_end().ends_with("PRIVATE KEY-----");
    if !has_begin || !has_end {
        return Err(ConfigError::InvalidPrivateKey(
            "missing -----BEGIN/END PRIVATE KEY----- markers".to_string(),
        ));
    }

    Ok(format!("{}\n", key.trim_end()))
}

/// JSON de cuenta de servicio, en claro o en base64
fn decode_service_account(raw: &str) -> Result<ServiceAccountJson, ConfigError> {
    let value = normalize_env_value(raw)
        .ok_or_else(|| ConfigError::InvalidServiceAccount("value is empty".to_string()))?;

    let json = if value.starts_with('{') {
        value
    } else {
        let bytes = STANDARD
            .decode(value.as_bytes())
            .map_err(|e| {
                ConfigError::InvalidServiceAccount(format!("not JSON nor base64: {}", e))
            })?;
        String::from_utf8(bytes)
            .map_err(|_| {
                ConfigError::InvalidServiceAccount("base64 payload is not UTF-8".to_string())
            })?
    };

    serde_json::from_str(&json).map_err(|e| ConfigError::InvalidServiceAccount(e.to_string()))
}
