//! API de registros de vehículos del concesionario
//!
//! Endpoint autenticado (Firebase) de list/get/upsert/delete sobre la tabla
//! `vehicles` de PostgreSQL, con bootstrap perezoso del schema.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
