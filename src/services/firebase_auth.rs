//! Verificación de ID tokens de Firebase
//!
//! Los ID tokens son JWT RS256 firmados por Google. Las claves públicas se
//! descargan como JWK y se cachean según el `Cache-Control` de la respuesta.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::{header::CACHE_CONTROL, Client};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, info, warn};

use crate::config::FirebaseCredentials;
use crate::models::auth::{AuthenticatedUser, FirebaseClaims};
use crate::utils::errors::{AppError, AppResult};

/// JWKs públicas de los ID tokens de Firebase
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Vida de la cache de claves cuando Google no manda `max-age`
const DEFAULT_KEYS_TTL_SECS: i64 = 3600;

/// Tolerancia de reloj para `iat` y `auth_time`
const CLOCK_LEEWAY_SECS: i64 = 60;

/// Intervalo mínimo entre descargas de claves
const MIN_REFETCH_INTERVAL_SECS: i64 = 60;

/// Verificador de bearer tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser>;
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Unauthorized".to_string())
}

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    expires_at: DateTime<Utc>,
}

impl CachedKeys {
    fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn fresh_key(&self, kid: &str) -> Option<DecodingKey> {
        if self.is_expired(Utc::now()) {
            return None;
        }
        self.keys.get(kid).cloned()
    }
}

/// Verificador contra el proyecto de Firebase configurado
pub struct FirebaseTokenVerifier {
    http: Client,
    jwks_url: String,
    credentials: OnceCell<FirebaseCredentials>,
    keys: RwLock<CachedKeys>,
    // Última descarga intentada; el lock serializa las recargas
    last_fetch: Mutex<Option<DateTime<Utc>>>,
}

impl FirebaseTokenVerifier {
    /// Credenciales leídas del entorno en la primera verificación
    pub fn new() -> Self {
        Self::build(OnceCell::new())
    }

    pub fn with_credentials(credentials: FirebaseCredentials) -> Self {
        Self::build(OnceCell::new_with(Some(credentials)))
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    fn build(credentials: OnceCell<FirebaseCredentials>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            credentials,
            keys: RwLock::new(CachedKeys::empty()),
            last_fetch: Mutex::new(None),
        }
    }

    async fn credentials(&self) -> AppResult<&FirebaseCredentials> {
        self.credentials
            .get_or_try_init(|| async {
                let credentials = FirebaseCredentials::from_env()?;
                info!("🔐 Firebase configurado para el proyecto '{}'", credentials.project_id);
                Ok::<_, AppError>(credentials)
            })
            .await
    }

    /// Reemplazar las claves cacheadas
    pub async fn install_keys(&self, set: &JwkSet, ttl: chrono::Duration) {
        let keys: HashMap<String, DecodingKey> = set
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        warn!("⚠️ JWK '{}' ignorada: {}", kid, e);
                        None
                    }
                }
            })
            .collect();

        debug!("🔑 {} claves de firma cacheadas", keys.len());
        let ttl = ttl.max(chrono::Duration::seconds(MIN_REFETCH_INTERVAL_SECS));
        let mut cache = self.keys.write().await;
        *cache = CachedKeys {
            keys,
            expires_at: Utc::now() + ttl,
        };
    }

    async fn refresh_keys(&self) -> AppResult<()> {
        info!("🔄 Descargando claves de firma de Firebase...");
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                AppError::Internal(format!("Failed to fetch Firebase signing keys: {}", e))
            })?;

        let ttl = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_KEYS_TTL_SECS);

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid Firebase signing keys: {}", e)))?;

        self.install_keys(&set, chrono::Duration::seconds(ttl)).await;
        Ok(())
    }

    /// Clave para un `kid`. Un kid desconocido provoca como mucho una
    /// descarga por `MIN_REFETCH_INTERVAL_SECS`, compartida entre requests.
    async fn decoding_key(&self, kid: &str) -> AppResult<DecodingKey> {
        if let Some(key) = self.keys.read().await.fresh_key(kid) {
            return Ok(key);
        }

        let mut last_fetch = self.last_fetch.lock().await;

        // Otra request pudo recargar mientras esperábamos el lock
        if let Some(key) = self.keys.read().await.fresh_key(kid) {
            return Ok(key);
        }

        let now = Utc::now();
        let expired = self.keys.read().await.is_expired(now);
        let throttled = last_fetch
            .is_some_and(|at| now - at < chrono::Duration::seconds(MIN_REFETCH_INTERVAL_SECS));

        if throttled {
            if expired {
                return Err(AppError::Internal(
                    "Firebase signing keys are unavailable".to_string(),
                ));
            }
            debug!("🔑 kid desconocido: {}", kid);
            return Err(invalid_token());
        }

        *last_fetch = Some(now);
        if let Err(e) = self.refresh_keys().await {
            // Con claves vigentes, el kid simplemente no es nuestro
            if !expired {
                warn!("⚠️ Recarga de claves fallida, se conservan las anteriores: {}", e);
                return Err(invalid_token());
            }
            return Err(e);
        }

        self.keys.read().await.fresh_key(kid).ok_or_else(|| {
            debug!("🔑 kid desconocido: {}", kid);
            invalid_token()
        })
    }
}

impl Default for FirebaseTokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let header = decode_header(token).map_err(|_| invalid_token())?;
        if header.alg != Algorithm::RS256 {
            return Err(invalid_token());
        }
        let kid = header.kid.ok_or_else(invalid_token)?;

        let credentials = self.credentials().await?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[credentials.project_id.as_str()]);
        validation.set_issuer(&[credentials.token_issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);

        let data = decode::<FirebaseClaims>(token, &key, &validation).map_err(|e| {
            debug!("🚫 Token rechazado: {}", e);
            invalid_token()
        })?;

        check_firebase_claims(&data.claims, Utc::now().timestamp())?;
        Ok(data.claims.into())
    }
}

/// Reglas propias de Firebase que `jsonwebtoken` no valida
fn check_firebase_claims(claims: &FirebaseClaims, now: i64) -> AppResult<()> {
    if claims.sub.is_empty() || claims.sub.len() > 128 {
        return Err(invalid_token());
    }
    if claims.iat > now + CLOCK_LEEWAY_SECS {
        return Err(invalid_token());
    }
    if claims.auth_time.is_some_and(|t| t > now + CLOCK_LEEWAY_SECS) {
        return Err(invalid_token());
    }
    Ok(())
}

/// `max-age` de una cabecera Cache-Control
fn parse_max_age(header: &str) -> Option<i64> {
    header
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse().ok())
}
