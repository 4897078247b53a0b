//! Dobles de test: store en memoria y verificador de tokens estático

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;

use dealership_api::config::EnvironmentConfig;
use dealership_api::models::auth::AuthenticatedUser;
use dealership_api::models::vehicle::{Vehicle, VehicleFilters, VehicleInput};
use dealership_api::repositories::VehicleStore;
use dealership_api::services::TokenVerifier;
use dealership_api::utils::errors::{AppError, AppResult};
use dealership_api::{create_router, AppState};

pub const VALID_TOKEN: &str = "valid-token";

/// Store en memoria con la misma semántica que el upsert de Postgres
#[derive(Default)]
pub struct InMemoryVehicleStore {
    rows: Mutex<Vec<Vehicle>>,
    writes: AtomicUsize,
}

impl InMemoryVehicleStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleStore {
    async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let rows = self.rows.lock().unwrap();
        // Más recientes primero; los empates quedan en orden inverso de inserción
        let mut vehicles: Vec<Vehicle> = rows
            .iter()
            .rev()
            .filter(|v| filters.status.as_deref().map_or(true, |s| v.status == s))
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|v| v.id == id).cloned())
    }

    async fn upsert(&self, input: &VehicleInput) -> AppResult<Vehicle> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();

        match rows.iter_mut().find(|v| v.id == input.id) {
            Some(existing) => {
                let updated_at = now.max(existing.updated_at + chrono::Duration::microseconds(1));
                *existing = input.clone().into_vehicle(existing.created_at, updated_at);
                Ok(existing.clone())
            }
            None => {
                let vehicle = input.clone().into_vehicle(now, now);
                rows.push(vehicle.clone());
                Ok(vehicle)
            }
        }
    }

    async fn delete(&self, id: &str) -> AppResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|v| v.id != id);
        Ok((before - rows.len()) as u64)
    }
}

/// Acepta solo `VALID_TOKEN`
pub struct StaticTokenVerifier;

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser> {
        if token == VALID_TOKEN {
            Ok(AuthenticatedUser {
                uid: "test-uid".to_string(),
                email: Some("sales@dealer.test".to_string()),
            })
        } else {
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryVehicleStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(EnvironmentConfig::default())
    }

    pub fn with_config(config: EnvironmentConfig) -> Self {
        let store = Arc::new(InMemoryVehicleStore::default());
        let state = AppState::new(
            config,
            store.clone(),
            Arc::new(StaticTokenVerifier),
        );
        Self {
            router: create_router(state),
            store,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Method::GET, uri, Some(VALID_TOKEN), None).await
    }

    pub async fn post(&self, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(Method::POST, "/api/vehicles", Some(VALID_TOKEN), Some(body.to_string()))
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Method::DELETE, uri, Some(VALID_TOKEN), None).await
    }
}
