//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod auth;
pub mod vehicle;

pub use auth::AuthenticatedUser;
pub use vehicle::{Vehicle, VehicleFilters, VehicleInput};
