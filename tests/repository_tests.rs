//! Tests del repositorio contra un Postgres real.
//!
//! `#[sqlx::test]` crea una base de datos aislada por test a partir de
//! `DATABASE_URL`. Se ejecutan con `cargo test -- --ignored`.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use dealership_api::database::{schema, DatabaseConnection};
use dealership_api::dto::vehicle_dto::vehicle_input_from_payload;
use dealership_api::models::vehicle::{VehicleFilters, VehicleInput};
use dealership_api::repositories::{VehicleRepository, VehicleStore, LIST_LIMIT};

fn repository(pool: PgPool) -> VehicleRepository {
    VehicleRepository::new(Arc::new(DatabaseConnection::with_pool(pool)))
}

fn input(payload: serde_json::Value) -> VehicleInput {
    vehicle_input_from_payload(payload.as_object().unwrap()).unwrap()
}

fn hilux(id: &str) -> VehicleInput {
    input(json!({
        "id": id,
        "make": "Toyota",
        "model": "Hilux",
        "stockNumber": "ST001",
        "branch": "Main",
        "images": ["a.jpg"],
        "price": "350000"
    }))
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_upsert_round_trips_numeric_and_array_columns(pool: PgPool) {
    let repo = repository(pool);
    let vehicle = input(json!({
        "id": "veh-001",
        "make": "Ford",
        "model": "Ranger",
        "stockNumber": "ST002",
        "branch": "Pretoria",
        "year": "2021",
        "mileage": 48000,
        "price": 489900.5,
        "originalPrice": "519900",
        "status": "available",
        "images": ["front.jpg", "rear.jpg"],
        "features": ["Tow bar", "Canopy"]
    }));

    let saved = repo.upsert(&vehicle).await.unwrap();
    assert_eq!(saved.created_at, saved.updated_at);

    let found = repo.find_by_id("veh-001").await.unwrap().unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.price, Decimal::from_str("489900.5").unwrap());
    assert_eq!(found.original_price, Some(Decimal::from(519900)));
    assert_eq!(found.cost_price, None);
    assert_eq!(found.year, 2021);
    assert_eq!(found.images, vec!["front.jpg", "rear.jpg"]);
    assert_eq!(found.features, vec!["Tow bar", "Canopy"]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_second_upsert_keeps_created_at(pool: PgPool) {
    let repo = repository(pool.clone());

    let created = repo.upsert(&hilux("veh-002")).await.unwrap();

    let mut update = hilux("veh-002");
    update.price = Decimal::from(340000);
    update.features = vec!["Canopy".to_string()];
    let updated = repo.upsert(&update).await.unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.price, Decimal::from(340000));
    assert_eq!(updated.features, vec!["Canopy"]);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_list_filters_by_status_newest_first(pool: PgPool) {
    let repo = repository(pool);

    for (id, status) in [("v1", "available"), ("v2", "draft"), ("v3", "available")] {
        let mut vehicle = hilux(id);
        vehicle.status = status.to_string();
        repo.upsert(&vehicle).await.unwrap();
    }

    let all = repo.list(&VehicleFilters::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v3", "v2", "v1"]);

    let filters = VehicleFilters {
        status: Some("available".to_string()),
    };
    let available = repo.list(&filters).await.unwrap();
    let ids: Vec<&str> = available.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v3", "v1"]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_list_is_capped(pool: PgPool) {
    let repo = repository(pool);

    for n in 0..=LIST_LIMIT {
        repo.upsert(&hilux(&format!("bulk-{}", n))).await.unwrap();
    }

    let vehicles = repo.list(&VehicleFilters::default()).await.unwrap();
    assert_eq!(vehicles.len() as i64, LIST_LIMIT);
    // El más antiguo queda fuera
    assert!(vehicles.iter().all(|v| v.id != "bulk-0"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_delete_reports_affected_rows(pool: PgPool) {
    let repo = repository(pool);
    repo.upsert(&hilux("veh-003")).await.unwrap();

    assert_eq!(repo.delete("veh-003").await.unwrap(), 1);
    assert_eq!(repo.delete("veh-003").await.unwrap(), 0);
    assert!(repo.find_by_id("veh-003").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn test_schema_bootstrap_is_idempotent(pool: PgPool) {
    schema::apply(&pool).await.unwrap();
    schema::apply(&pool).await.unwrap();

    let db = DatabaseConnection::with_pool(pool);
    db.ready().await.unwrap();
    db.ready().await.unwrap();
    assert!(db.is_connected());
}
