//! Schema de la tabla `vehicles`
//!
//! El DDL es idempotente y se ejecuta una sola vez por proceso, la primera
//! vez que una request necesita la base de datos.

use std::future::Future;

use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::info;

use crate::utils::errors::AppResult;

pub const CREATE_VEHICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    id TEXT PRIMARY KEY,
    stock_number TEXT NOT NULL,
    vin TEXT,
    engine_number TEXT,
    registration_number TEXT,
    natis_number TEXT,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    variant TEXT,
    year INTEGER NOT NULL DEFAULT 0,
    condition TEXT,
    body_type TEXT,
    fuel_type TEXT,
    transmission TEXT,
    drive TEXT,
    color TEXT,
    engine_size TEXT,
    seats INTEGER,
    mileage INTEGER NOT NULL DEFAULT 0,
    price NUMERIC NOT NULL DEFAULT 0,
    original_price NUMERIC,
    est_monthly_payment NUMERIC,
    cost_price NUMERIC,
    reconditioning_cost NUMERIC,
    is_special_offer BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT NOT NULL DEFAULT 'draft',
    images TEXT[] NOT NULL DEFAULT '{}',
    features TEXT[] NOT NULL DEFAULT '{}',
    description TEXT,
    previous_owner TEXT,
    supplier TEXT,
    purchase_date TEXT,
    key_number TEXT,
    branch TEXT NOT NULL,
    service_history TEXT,
    warranty_months INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_vehicles_status ON vehicles (status)";

pub const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_vehicles_created_at ON vehicles (created_at DESC)";

/// Sentencias de bootstrap, en orden
pub const BOOTSTRAP_STATEMENTS: [&str; 3] = [
    CREATE_VEHICLES_TABLE,
    CREATE_STATUS_INDEX,
    CREATE_CREATED_AT_INDEX,
];

/// Ejecutar el DDL de bootstrap contra el pool
pub async fn apply(pool: &PgPool) -> AppResult<()> {
    info!("🛠️ Verificando schema de vehicles...");
    for statement in BOOTSTRAP_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("✅ Schema de vehicles listo");
    Ok(())
}

/// Bandera "schema listo" compartida por todo el proceso.
///
/// Las requests concurrentes durante el arranque esperan la misma
/// inicialización; un fallo no se memoiza y la siguiente request reintenta.
#[derive(Debug, Default)]
pub struct SchemaGate {
    ready: OnceCell<()>,
}

impl SchemaGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    pub async fn ensure<F, Fut>(&self, init: F) -> AppResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<()>>,
    {
        self.ready.get_or_try_init(init).await.map(|_| ())
    }
}
