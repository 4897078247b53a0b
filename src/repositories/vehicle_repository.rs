use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use sqlx::PgPool;

use crate::database::DatabaseConnection;
use crate::models::vehicle::{Vehicle, VehicleFilters, VehicleInput};
use crate::utils::errors::AppResult;

/// Máximo de filas que devuelve un listado
pub const LIST_LIMIT: i64 = 1000;

/// Columnas reescritas en cada upsert, en el orden de los binds
pub const MUTABLE_COLUMNS: [&str; 36] = [
    "id",
    "stock_number",
    "vin",
    "engine_number",
    "registration_number",
    "natis_number",
    "make",
    "model",
    "variant",
    "year",
    "condition",
    "body_type",
    "fuel_type",
    "transmission",
    "drive",
    "color",
    "engine_size",
    "seats",
    "mileage",
    "price",
    "original_price",
    "est_monthly_payment",
    "cost_price",
    "reconditioning_cost",
    "is_special_offer",
    "status",
    "images",
    "features",
    "description",
    "previous_owner",
    "supplier",
    "purchase_date",
    "key_number",
    "branch",
    "service_history",
    "warranty_months",
];

lazy_static! {
    static ref SELECT_COLUMNS: String =
        format!("{}, created_at, updated_at", MUTABLE_COLUMNS.join(", "));
    static ref UPSERT_SQL: String = build_upsert_sql();
}

fn build_upsert_sql() -> String {
    let placeholders = (1..=MUTABLE_COLUMNS.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");

    // Todo menos la clave; created_at no se toca
    let assignments = MUTABLE_COLUMNS
        .iter()
        .skip(1)
        .map(|col| format!("{col} = EXCLUDED.{col}"))
        .collect::<Vec<_>>()
        .join(",\n            ");

    format!(
        r#"
        INSERT INTO vehicles ({columns}, created_at, updated_at)
        VALUES ({placeholders}, NOW(), NOW())
        ON CONFLICT (id) DO UPDATE SET
            {assignments},
            updated_at = GREATEST(NOW(), vehicles.updated_at + INTERVAL '1 microsecond')
        RETURNING {select}
        "#,
        columns = MUTABLE_COLUMNS.join(", "),
        placeholders = placeholders,
        assignments = assignments,
        select = SELECT_COLUMNS.as_str(),
    )
}

/// Almacenamiento de vehículos
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Hasta `LIST_LIMIT` vehículos, los más recientes primero
    async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>>;

    /// Insert-or-update atómico por `id`
    async fn upsert(&self, input: &VehicleInput) -> AppResult<Vehicle>;

    /// Borrado incondicional; devuelve las filas afectadas
    async fn delete(&self, id: &str) -> AppResult<u64>;
}

pub struct VehicleRepository {
    db: Arc<DatabaseConnection>,
}

impl VehicleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn pool(&self) -> AppResult<&PgPool> {
        self.db.ready().await
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let pool = self.pool().await?;

        let vehicles = match &filters.status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM vehicles WHERE status = $1 ORDER BY created_at DESC LIMIT $2",
                    SELECT_COLUMNS.as_str()
                );
                sqlx::query_as::<_, Vehicle>(&sql)
                    .bind(status)
                    .bind(LIST_LIMIT)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM vehicles ORDER BY created_at DESC LIMIT $1",
                    SELECT_COLUMNS.as_str()
                );
                sqlx::query_as::<_, Vehicle>(&sql)
                    .bind(LIST_LIMIT)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(vehicles)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let pool = self.pool().await?;

        let sql = format!("SELECT {} FROM vehicles WHERE id = $1", SELECT_COLUMNS.as_str());
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(vehicle)
    }

    async fn upsert(&self, input: &VehicleInput) -> AppResult<Vehicle> {
        let pool = self.pool().await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(UPSERT_SQL.as_str())
            .bind(&input.id)
            .bind(&input.stock_number)
            .bind(&input.vin)
            .bind(&input.engine_number)
            .bind(&input.registration_number)
            .bind(&input.natis_number)
            .bind(&input.make)
            .bind(&input.model)
            .bind(&input.variant)
            .bind(input.year)
            .bind(&input.condition)
            .bind(&input.body_type)
            .bind(&input.fuel_type)
            .bind(&input.transmission)
            .bind(&input.drive)
            .bind(&input.color)
            .bind(&input.engine_size)
            .bind(input.seats)
            .bind(input.mileage)
            .bind(input.price)
            .bind(input.original_price)
            .bind(input.est_monthly_payment)
            .bind(input.cost_price)
            .bind(input.reconditioning_cost)
            .bind(input.is_special_offer)
            .bind(&input.status)
            .bind(&input.images)
            .bind(&input.features)
            .bind(&input.description)
            .bind(&input.previous_owner)
            .bind(&input.supplier)
            .bind(&input.purchase_date)
            .bind(&input.key_number)
            .bind(&input.branch)
            .bind(&input.service_history)
            .bind(input.warranty_months)
            .fetch_one(pool)
            .await?;

        Ok(vehicle)
    }

    async fn delete(&self, id: &str) -> AppResult<u64> {
        let pool = self.pool().await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
