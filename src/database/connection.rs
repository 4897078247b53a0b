//! Configuración de conexión a PostgreSQL
//!
//! El pool y el schema se crean de forma perezosa en la primera request que
//! toca la base de datos y se comparten durante toda la vida del proceso.

use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::schema::{self, SchemaGate};
use crate::config::DatabaseConfig;
use crate::utils::errors::{AppError, AppResult};

/// Conexión perezosa a la base de datos
#[derive(Debug, Default)]
pub struct DatabaseConnection {
    pool: OnceCell<PgPool>,
    schema: SchemaGate,
}

impl DatabaseConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conexión sobre un pool ya creado; el schema se verifica igual en el primer uso
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool: OnceCell::new_with(Some(pool)),
            schema: SchemaGate::new(),
        }
    }

    /// Pool listo para usar, con el schema verificado.
    ///
    /// Los errores de configuración o conexión no se memoizan.
    pub async fn ready(&self) -> AppResult<&PgPool> {
        let pool = self.pool.get_or_try_init(create_pool).await?;
        self.schema.ensure(|| schema::apply(pool)).await?;
        Ok(pool)
    }

    /// Indica si el pool ya fue creado en este proceso
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }
}

/// Crear un pool de conexiones a la base de datos desde el entorno
async fn create_pool() -> AppResult<PgPool> {
    let config = DatabaseConfig::from_env()?;
    info!("🔌 Conectando a PostgreSQL: {}", config.masked_url());

    config.create_pool().await.map_err(|e| {
        error!("❌ Error conectando a la base de datos: {}", e);
        AppError::Database(e)
    })
}
