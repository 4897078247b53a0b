//! DTOs de la API
//!
//! Formas de entrada y salida del endpoint de vehículos.

pub mod vehicle_dto;
