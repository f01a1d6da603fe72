//! Explicit conversion of JSON request bodies into typed apartment inputs.
//! Every conversion either yields a typed value or a validation error; numeric
//! strings are accepted, anything that would be NaN is not.

use crate::error::AppError;
use crate::model::{ApartmentPatch, NewApartment};
use serde_json::{Map, Value};

/// Fields that must be present (and non-null) on create, in report order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "unitName",
    "unitNumber",
    "project",
    "price",
    "bedrooms",
    "bathrooms",
    "area",
    "description",
];

pub fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Build a [`NewApartment`]; all missing fields are reported together.
pub fn new_apartment(body: &Map<String, Value>) -> Result<NewApartment, AppError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| body.get(*f).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }
    Ok(NewApartment {
        unit_name: text("unitName", &body["unitName"])?,
        unit_number: text("unitNumber", &body["unitNumber"])?,
        project: text("project", &body["project"])?,
        price: decimal("price", &body["price"])?,
        bedrooms: count("bedrooms", &body["bedrooms"])?,
        bathrooms: count("bathrooms", &body["bathrooms"])?,
        area: decimal("area", &body["area"])?,
        description: text("description", &body["description"])?,
        images: string_list("images", body.get("images"))?,
        amenities: string_list("amenities", body.get("amenities"))?,
    })
}

/// Build an [`ApartmentPatch`] from the fields present. Unknown keys, `_id` and
/// the timestamps are ignored.
pub fn apartment_patch(body: &Map<String, Value>) -> Result<ApartmentPatch, AppError> {
    let mut patch = ApartmentPatch::default();
    for (key, v) in body {
        match key.as_str() {
            "unitName" => patch.unit_name = Some(required(key, v, text)?),
            "unitNumber" => patch.unit_number = Some(required(key, v, text)?),
            "project" => patch.project = Some(required(key, v, text)?),
            "price" => patch.price = Some(required(key, v, decimal)?),
            "bedrooms" => patch.bedrooms = Some(required(key, v, count)?),
            "bathrooms" => patch.bathrooms = Some(required(key, v, count)?),
            "area" => patch.area = Some(required(key, v, decimal)?),
            "description" => patch.description = Some(required(key, v, text)?),
            "images" => patch.images = Some(string_list(key, Some(v))?),
            "amenities" => patch.amenities = Some(string_list(key, Some(v))?),
            _ => {}
        }
    }
    Ok(patch)
}

fn required<T>(
    field: &str,
    v: &Value,
    convert: fn(&str, &Value) -> Result<T, AppError>,
) -> Result<T, AppError> {
    if v.is_null() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    convert(field, v)
}

/// Strings pass through; numbers are stringified ("101" and 101 are the same unit number).
pub fn text(field: &str, v: &Value) -> Result<String, AppError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::Validation(format!("{} must be a string", field))),
    }
}

/// A finite number, given as a JSON number or a numeric string.
pub fn decimal(field: &str, v: &Value) -> Result<f64, AppError> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(AppError::Validation(format!("{} must be a number", field))),
    }
}

/// A whole number that fits in `i32`, given as a JSON number or a numeric string.
pub fn count(field: &str, v: &Value) -> Result<i32, AppError> {
    let n = decimal(field, v)
        .map_err(|_| AppError::Validation(format!("{} must be a whole number", field)))?;
    if n.fract() != 0.0 || n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return Err(AppError::Validation(format!("{} must be a whole number", field)));
    }
    Ok(n as i32)
}

/// Array of strings; absent or null is an empty list.
pub fn string_list(field: &str, v: Option<&Value>) -> Result<Vec<String>, AppError> {
    match v {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(AppError::Validation(format!("{} must contain only strings", field))),
            })
            .collect(),
        Some(_) => Err(AppError::Validation(format!("{} must be an array of strings", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use testresult::TestResult;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    fn full_body() -> Map<String, Value> {
        map(json!({
            "unitName": "A1",
            "unitNumber": 101,
            "project": "Skyline",
            "price": "250000",
            "bedrooms": "2",
            "bathrooms": 1,
            "area": 900,
            "description": "nice"
        }))
    }

    #[test]
    fn numeric_strings_are_coerced() -> TestResult {
        let apt = new_apartment(&full_body())?;
        assert_eq!(apt.price, 250000.0);
        assert_eq!(apt.bedrooms, 2);
        assert_eq!(apt.unit_number, "101");
        assert!(apt.images.is_empty());
        assert!(apt.amenities.is_empty());
        Ok(())
    }

    #[test]
    fn non_numeric_strings_are_rejected() {
        let mut body = full_body();
        body.insert("price".into(), json!("cheap"));
        assert!(matches!(new_apartment(&body), Err(AppError::Validation(_))));

        let mut body = full_body();
        body.insert("area".into(), json!("NaN"));
        assert!(matches!(new_apartment(&body), Err(AppError::Validation(_))));
    }

    #[test]
    fn fractional_counts_are_rejected() {
        assert!(count("bedrooms", &json!(2.5)).is_err());
        assert!(count("bedrooms", &json!(1e12)).is_err());
        assert!(matches!(count("bedrooms", &json!(3.0)), Ok(3)));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let mut body = full_body();
        body.remove("unitName");
        body.insert("price".into(), Value::Null);
        match new_apartment(&body) {
            Err(AppError::MissingFields(fields)) => assert_eq!(fields, vec!["unitName", "price"]),
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn patch_ignores_identity_and_unknown_keys() -> TestResult {
        let patch = apartment_patch(&map(json!({
            "_id": "x",
            "createdAt": "2020-01-01T00:00:00Z",
            "color": "blue",
            "bathrooms": "2",
            "images": null
        })))?;
        assert_eq!(patch.bathrooms, Some(2));
        assert_eq!(patch.images, Some(vec![]));
        assert!(patch.unit_name.is_none());
        Ok(())
    }

    #[test]
    fn patch_rejects_null_mandatory_field() {
        let result = apartment_patch(&map(json!({ "project": null })));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn string_list_rejects_mixed_items() {
        assert!(string_list("images", Some(&json!(["a", 1]))).is_err());
        assert!(string_list("images", Some(&json!("a"))).is_err());
    }
}
