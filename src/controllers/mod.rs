//! Controladores
//!
//! Lógica de cada operación, entre las rutas y los repositorios.

pub mod vehicle_controller;

pub use vehicle_controller::VehicleController;
