//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y la conversión permisiva de valores JSON sin tipar.

use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// String recortado, o `None` si no es string o queda vacío
pub fn optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// String recortado, vacío si no es string
pub fn required_string(value: Option<&Value>) -> String {
    optional_string(value).unwrap_or_default()
}

/// Lista de strings: recorta cada entrada y descarta vacíos y no-strings
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| optional_string(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Conversión numérica permisiva: números o strings numéricos
pub fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Entero redondeado; fuera de rango de `i32` cuenta como no numérico
pub fn coerce_i32(value: Option<&Value>) -> Option<i32> {
    let rounded = coerce_f64(value)?.round();
    if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return None;
    }
    Some(rounded as i32)
}

/// Decimal exacto para importes
pub fn coerce_decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Some(Decimal::from(u));
            }
            // serde_json imprime los floats con su representación más corta
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .and_then(Decimal::from_f64)
                })
        }
        _ => None,
    }
}

/// Booleano permisivo: `true`, `"true"`, `1`, `"1"`
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Toyota").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   \t").is_err());
    }

    #[test]
    fn test_optional_string() {
        assert_eq!(optional_string(Some(&json!("  Hilux "))), Some("Hilux".to_string()));
        assert_eq!(optional_string(Some(&json!("   "))), None);
        assert_eq!(optional_string(Some(&json!(42))), None);
        assert_eq!(optional_string(None), None);
    }

    #[test]
    fn test_string_list_keeps_order_and_drops_junk() {
        let value = json!(["cover.jpg", " ", 7, null, " side.jpg "]);
        assert_eq!(string_list(Some(&value)), vec!["cover.jpg", "side.jpg"]);
        assert!(string_list(Some(&json!("a.jpg"))).is_empty());
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(Some(&json!(2019))), Some(2019.0));
        assert_eq!(coerce_f64(Some(&json!(" 350000 "))), Some(350000.0));
        assert_eq!(coerce_f64(Some(&json!("1e3"))), Some(1000.0));
        assert_eq!(coerce_f64(Some(&json!("abc"))), None);
        assert_eq!(coerce_f64(Some(&json!(""))), None);
        assert_eq!(coerce_f64(Some(&json!("NaN"))), None);
        assert_eq!(coerce_f64(Some(&json!(true))), None);
    }

    #[test]
    fn test_coerce_i32() {
        assert_eq!(coerce_i32(Some(&json!("5"))), Some(5));
        assert_eq!(coerce_i32(Some(&json!(4.6))), Some(5));
        assert_eq!(coerce_i32(Some(&json!(1e12))), None);
    }

    #[test]
    fn test_coerce_decimal() {
        assert_eq!(coerce_decimal(Some(&json!("350000"))), Some(Decimal::from(350000)));
        assert_eq!(coerce_decimal(Some(&json!(340000))), Some(Decimal::from(340000)));
        assert_eq!(coerce_decimal(Some(&json!("4999.99"))), Decimal::from_str("4999.99").ok());
        assert_eq!(coerce_decimal(Some(&json!(12.5))), Decimal::from_str("12.5").ok());
        assert_eq!(coerce_decimal(Some(&json!(0.1))), Decimal::from_str("0.1").ok());
        assert_eq!(coerce_decimal(Some(&json!("R 10"))), None);
        assert_eq!(coerce_decimal(Some(&json!(null))), None);
    }

    #[test]
    fn test_coerce_bool() {
        assert!(coerce_bool(Some(&json!(true))));
        assert!(coerce_bool(Some(&json!("true"))));
        assert!(coerce_bool(Some(&json!(1))));
        assert!(!coerce_bool(Some(&json!("no"))));
        assert!(!coerce_bool(None));
    }
}
