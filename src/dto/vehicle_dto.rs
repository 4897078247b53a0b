use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleFilters, VehicleInput, DEFAULT_STATUS};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::{
    coerce_bool, coerce_decimal, coerce_i32, optional_string, required_string, string_list,
};

pub const INVALID_JSON: &str = "Invalid JSON";
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const IMAGES_REQUIRED: &str = "At least one image is required";
pub const MISSING_ID: &str = "Missing id";

// Query string del endpoint: ?id=... o ?status=...
#[derive(Debug, Default, Deserialize)]
pub struct VehicleQuery {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl VehicleQuery {
    /// Id recortado; vacío cuenta como ausente
    pub fn trimmed_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn filters(&self) -> VehicleFilters {
        VehicleFilters {
            status: self
                .status
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

// Respuesta con un vehículo
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleEnvelope {
    pub vehicle: Vehicle,
}

// Respuesta de listado
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleListEnvelope {
    pub vehicles: Vec<Vehicle>,
}

/// Parsear el body de un upsert: debe ser un objeto JSON
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(bad_request_error(INVALID_JSON)),
    }
}

/// Convertir el payload camelCase en un `VehicleInput` validado.
///
/// Falla con el primer invariante violado: campos obligatorios primero,
/// imágenes después.
pub fn vehicle_input_from_payload(payload: &Map<String, Value>) -> Result<VehicleInput, AppError> {
    let field = |name: &str| payload.get(name);

    let input = VehicleInput {
        id: optional_string(field("id")).unwrap_or_else(|| Uuid::new_v4().to_string()),
        stock_number: required_string(field("stockNumber")),
        vin: optional_string(field("vin")),
        engine_number: optional_string(field("engineNumber")),
        registration_number: optional_string(field("registrationNumber")),
        natis_number: optional_string(field("natisNumber")),

        make: required_string(field("make")),
        model: required_string(field("model")),
        variant: optional_string(field("variant")),
        year: coerce_i32(field("year")).unwrap_or(0),
        condition: optional_string(field("condition")),
        body_type: optional_string(field("bodyType")),
        fuel_type: optional_string(field("fuelType")),
        transmission: optional_string(field("transmission")),
        drive: optional_string(field("drive")),
        color: optional_string(field("color")),
        engine_size: optional_string(field("engineSize")),
        seats: coerce_i32(field("seats")),
        mileage: coerce_i32(field("mileage")).unwrap_or(0),

        price: coerce_decimal(field("price")).unwrap_or_default(),
        original_price: coerce_decimal(field("originalPrice")),
        est_monthly_payment: coerce_decimal(field("estMonthlyPayment")),
        cost_price: coerce_decimal(field("costPrice")),
        reconditioning_cost: coerce_decimal(field("reconditioningCost")),
        is_special_offer: coerce_bool(field("isSpecialOffer")),

        status: optional_string(field("status")).unwrap_or_else(|| DEFAULT_STATUS.to_string()),

        images: string_list(field("images")),
        features: string_list(field("features")),
        description: optional_string(field("description")),

        previous_owner: optional_string(field("previousOwner")),
        supplier: optional_string(field("supplier")),
        purchase_date: optional_string(field("purchaseDate")),
        key_number: optional_string(field("keyNumber")),
        branch: required_string(field("branch")),
        service_history: optional_string(field("serviceHistory")),
        warranty_months: coerce_i32(field("warrantyMonths")),
    };

    if let Err(errors) = input.validate() {
        let fields = errors.field_errors();
        let missing_required = ["stock_number", "make", "model", "branch"]
            .iter()
            .any(|name| fields.contains_key(name));

        return Err(if missing_required {
            bad_request_error(MISSING_REQUIRED_FIELDS)
        } else {
            bad_request_error(IMAGES_REQUIRED)
        });
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn hilux() -> Value {
        json!({
            "make": "Toyota",
            "model": "Hilux",
            "stockNumber": "ST001",
            "branch": "Main",
            "images": ["a.jpg"],
            "price": "350000"
        })
    }

    fn message(err: AppError) -> String {
        err.public_message()
    }

    #[test]
    fn test_parse_payload_rejects_non_objects() {
        assert!(parse_payload(b"{\"make\":\"Toyota\"}").is_ok());
        assert_eq!(message(parse_payload(b"{not json").unwrap_err()), INVALID_JSON);
        assert_eq!(message(parse_payload(b"[1,2]").unwrap_err()), INVALID_JSON);
        assert_eq!(message(parse_payload(b"\"text\"").unwrap_err()), INVALID_JSON);
        assert_eq!(message(parse_payload(b"").unwrap_err()), INVALID_JSON);
    }

    #[test]
    fn test_minimal_payload_gets_defaults() {
        let input = vehicle_input_from_payload(&payload(hilux())).unwrap();
        assert!(Uuid::parse_str(&input.id).is_ok());
        assert_eq!(input.status, "draft");
        assert_eq!(input.price, Decimal::from(350000));
        assert_eq!(input.images, vec!["a.jpg"]);
        assert!(input.features.is_empty());
        assert_eq!(input.year, 0);
        assert_eq!(input.mileage, 0);
        assert_eq!(input.seats, None);
        assert!(!input.is_special_offer);
    }

    #[test]
    fn test_supplied_id_and_status_are_kept() {
        let mut body = hilux();
        body["id"] = json!("  veh-42 ");
        body["status"] = json!("sold");
        let input = vehicle_input_from_payload(&payload(body)).unwrap();
        assert_eq!(input.id, "veh-42");
        assert_eq!(input.status, "sold");
    }

    #[test]
    fn test_numeric_coercion() {
        let mut body = hilux();
        body["year"] = json!("2021");
        body["mileage"] = json!(45000);
        body["seats"] = json!("five");
        body["costPrice"] = json!("");
        body["reconditioningCost"] = json!("12500.50");
        body["warrantyMonths"] = json!(12);
        let input = vehicle_input_from_payload(&payload(body)).unwrap();
        assert_eq!(input.year, 2021);
        assert_eq!(input.mileage, 45000);
        assert_eq!(input.seats, None);
        assert_eq!(input.cost_price, None);
        assert_eq!(input.reconditioning_cost, Some(Decimal::new(1250050, 2)));
        assert_eq!(input.warranty_months, Some(12));
    }

    #[test]
    fn test_required_fields() {
        for field in ["make", "model", "stockNumber", "branch"] {
            let mut body = hilux();
            body[field] = json!("   ");
            let err = vehicle_input_from_payload(&payload(body)).unwrap_err();
            assert_eq!(message(err), MISSING_REQUIRED_FIELDS, "field {}", field);

            let mut body = hilux();
            body.as_object_mut().unwrap().remove(field);
            let err = vehicle_input_from_payload(&payload(body)).unwrap_err();
            assert_eq!(message(err), MISSING_REQUIRED_FIELDS, "field {}", field);
        }
    }

    #[test]
    fn test_images_required() {
        for images in [json!([]), json!(["  "]), json!([1, 2]), json!("a.jpg"), Value::Null] {
            let mut body = hilux();
            body["images"] = images;
            let err = vehicle_input_from_payload(&payload(body)).unwrap_err();
            assert_eq!(message(err), IMAGES_REQUIRED);
        }
    }

    #[test]
    fn test_missing_fields_reported_before_images() {
        let body = json!({ "make": "Toyota", "images": [] });
        let err = vehicle_input_from_payload(&payload(body)).unwrap_err();
        assert_eq!(message(err), MISSING_REQUIRED_FIELDS);
    }

    #[test]
    fn test_query_helpers() {
        let query = VehicleQuery { id: Some("  ".into()), status: Some(" available ".into()) };
        assert_eq!(query.trimmed_id(), None);
        assert_eq!(query.filters().status.as_deref(), Some("available"));

        let query = VehicleQuery { id: Some(" v1 ".into()), status: None };
        assert_eq!(query.trimmed_id(), Some("v1"));
        assert_eq!(query.filters(), VehicleFilters::default());
    }
}
