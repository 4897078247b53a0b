//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su variante de escritura.
//! Mapea exactamente a la tabla `vehicles`; las columnas snake_case se
//! exponen 1:1 en camelCase en la API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

/// Estado inicial de un vehículo recién cargado
pub const DEFAULT_STATUS: &str = "draft";

/// Estados que usa el back-office (la API no restringe transiciones)
pub const KNOWN_STATUSES: [&str; 4] = ["draft", "available", "reserved", "sold"];

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub stock_number: String,
    pub vin: Option<String>,
    pub engine_number: Option<String>,
    pub registration_number: Option<String>,
    pub natis_number: Option<String>,

    pub make: String,
    pub model: String,
    pub variant: Option<String>,
    pub year: i32,
    pub condition: Option<String>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub seats: Option<i32>,
    pub mileage: i32,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub est_monthly_payment: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cost_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub reconditioning_cost: Option<Decimal>,
    pub is_special_offer: bool,

    pub status: String,

    pub images: Vec<String>,
    pub features: Vec<String>,
    pub description: Option<String>,

    pub previous_owner: Option<String>,
    pub supplier: Option<String>,
    pub purchase_date: Option<String>,
    pub key_number: Option<String>,
    pub branch: String,
    pub service_history: Option<String>,
    pub warranty_months: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehículo normalizado y listo para el upsert.
///
/// Se construye desde el JSON sin tipar en `dto::vehicle_dto`; todos los
/// campos mutables se reescriben en cada upsert.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct VehicleInput {
    pub id: String,
    #[validate(custom = "validate_not_empty")]
    pub stock_number: String,
    pub vin: Option<String>,
    pub engine_number: Option<String>,
    pub registration_number: Option<String>,
    pub natis_number: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub make: String,
    #[validate(custom = "validate_not_empty")]
    pub model: String,
    pub variant: Option<String>,
    pub year: i32,
    pub condition: Option<String>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub seats: Option<i32>,
    pub mileage: i32,

    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub est_monthly_payment: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub reconditioning_cost: Option<Decimal>,
    pub is_special_offer: bool,

    pub status: String,

    #[validate(length(min = 1))]
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub description: Option<String>,

    pub previous_owner: Option<String>,
    pub supplier: Option<String>,
    pub purchase_date: Option<String>,
    pub key_number: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub branch: String,
    pub service_history: Option<String>,
    pub warranty_months: Option<i32>,
}

impl VehicleInput {
    /// Fila resultante de escribir este input, con las marcas de tiempo dadas
    pub fn into_vehicle(self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id: self.id,
            stock_number: self.stock_number,
            vin: self.vin,
            engine_number: self.engine_number,
            registration_number: self.registration_number,
            natis_number: self.natis_number,
            make: self.make,
            model: self.model,
            variant: self.variant,
            year: self.year,
            condition: self.condition,
            body_type: self.body_type,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            drive: self.drive,
            color: self.color,
            engine_size: self.engine_size,
            seats: self.seats,
            mileage: self.mileage,
            price: self.price,
            original_price: self.original_price,
            est_monthly_payment: self.est_monthly_payment,
            cost_price: self.cost_price,
            reconditioning_cost: self.reconditioning_cost,
            is_special_offer: self.is_special_offer,
            status: self.status,
            images: self.images,
            features: self.features,
            description: self.description,
            previous_owner: self.previous_owner,
            supplier: self.supplier,
            purchase_date: self.purchase_date,
            key_number: self.key_number,
            branch: self.branch,
            service_history: self.service_history,
            warranty_months: self.warranty_months,
            created_at,
            updated_at,
        }
    }
}

/// Filtros para el listado de vehículos
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilters {
    pub status: Option<String>,
}
