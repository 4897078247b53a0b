use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Extension, Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{VehicleEnvelope, VehicleListEnvelope, VehicleQuery, MISSING_ID};
use crate::middleware::auth::auth_middleware;
use crate::models::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

/// Un único endpoint, despachado por método HTTP
pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", any(vehicles_endpoint))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

// Los rechazos de query y body pasan por AppError para responder siempre JSON
async fn vehicles_endpoint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    method: Method,
    query: Result<Query<VehicleQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let controller = VehicleController::new(state.vehicles.clone());
    tracing::debug!("🚗 {} /api/vehicles por {}", method, user.uid);

    match method {
        Method::GET => {
            let Query(query) = query?;
            match query.trimmed_id() {
                Some(id) => {
                    let vehicle = controller.get_by_id(id).await?;
                    Ok(Json(VehicleEnvelope { vehicle }).into_response())
                }
                None => {
                    let vehicles = controller.list(&query.filters()).await?;
                    Ok(Json(VehicleListEnvelope { vehicles }).into_response())
                }
            }
        }
        Method::POST => {
            let body = body?;
            let vehicle = controller.upsert(&body).await?;
            Ok(Json(VehicleEnvelope { vehicle }).into_response())
        }
        Method::DELETE => {
            let Query(query) = query?;
            let id = query.trimmed_id().ok_or_else(|| bad_request_error(MISSING_ID))?;
            controller.delete(id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Err(AppError::MethodNotAllowed),
    }
}
