//! Repositorios
//!
//! Acceso a datos sobre PostgreSQL.

pub mod vehicle_repository;

pub use vehicle_repository::{VehicleRepository, VehicleStore, LIST_LIMIT};
