use std::sync::Arc;

use tracing::{debug, info};

use crate::dto::vehicle_dto::{parse_payload, vehicle_input_from_payload};
use crate::models::vehicle::{Vehicle, VehicleFilters, KNOWN_STATUSES};
use crate::repositories::{VehicleStore, LIST_LIMIT};
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles = self.store.list(filters).await?;
        // El store ya limita; el tope se respeta igual
        vehicles.truncate(LIST_LIMIT as usize);
        debug!("🚗 {} vehículos listados (filtro: {:?})", vehicles.len(), filters.status);
        Ok(vehicles)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Vehicle, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    /// Crear o actualizar desde el body crudo. Toda la validación ocurre
    /// antes de tocar la base de datos.
    pub async fn upsert(&self, body: &[u8]) -> Result<Vehicle, AppError> {
        let payload = parse_payload(body)?;
        let input = vehicle_input_from_payload(&payload)?;

        if !KNOWN_STATUSES.contains(&input.status.as_str()) {
            debug!("ℹ️ Estado fuera de catálogo para {}: '{}'", input.id, input.status);
        }

        let vehicle = self.store.upsert(&input).await?;
        info!("💾 Vehículo {} guardado (stock {})", vehicle.id, vehicle.stock_number);
        Ok(vehicle)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.store.delete(id).await?;
        info!("🗑️ Delete de vehículo {}: {} fila(s)", id, deleted);
        Ok(())
    }
}
