//! Servicios del sistema
//!
//! Integraciones externas: verificación de identidad con Firebase.

pub mod firebase_auth;

pub use firebase_auth::{FirebaseTokenVerifier, TokenVerifier};
