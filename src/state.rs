//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::database::DatabaseConnection;
use crate::repositories::{VehicleRepository, VehicleStore};
use crate::services::firebase_auth::{FirebaseTokenVerifier, TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<dyn VehicleStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        vehicles: Arc<dyn VehicleStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config,
            vehicles,
            verifier,
        }
    }

    /// Estado de producción: Postgres y Firebase, ambos perezosos
    pub fn from_env(config: EnvironmentConfig) -> Self {
        let db = Arc::new(DatabaseConnection::new());
        Self::new(
            config,
            Arc::new(VehicleRepository::new(db)),
            Arc::new(FirebaseTokenVerifier::new()),
        )
    }
}
