//! Record validation applied by the stores before every write.

use crate::error::AppError;
use crate::model::{Apartment, NewApartment};

pub struct RecordValidator;

impl RecordValidator {
    pub fn validate_new(apt: &NewApartment) -> Result<(), AppError> {
        check_fields(Fields {
            unit_name: &apt.unit_name,
            unit_number: &apt.unit_number,
            project: &apt.project,
            price: apt.price,
            bedrooms: apt.bedrooms,
            bathrooms: apt.bathrooms,
            area: apt.area,
            description: &apt.description,
        })
    }

    /// Same rules applied to a merged record before an update is persisted.
    pub fn validate_record(apt: &Apartment) -> Result<(), AppError> {
        check_fields(Fields {
            unit_name: &apt.unit_name,
            unit_number: &apt.unit_number,
            project: &apt.project,
            price: apt.price,
            bedrooms: apt.bedrooms,
            bathrooms: apt.bathrooms,
            area: apt.area,
            description: &apt.description,
        })
    }
}

struct Fields<'a> {
    unit_name: &'a str,
    unit_number: &'a str,
    project: &'a str,
    price: f64,
    bedrooms: i32,
    bathrooms: i32,
    area: f64,
    description: &'a str,
}

fn check_fields(f: Fields<'_>) -> Result<(), AppError> {
    non_empty("unitName", f.unit_name)?;
    non_empty("unitNumber", f.unit_number)?;
    non_empty("project", f.project)?;
    non_negative_decimal("price", f.price)?;
    non_negative_count("bedrooms", f.bedrooms)?;
    non_negative_count("bathrooms", f.bathrooms)?;
    non_negative_decimal("area", f.area)?;
    non_empty("description", f.description)?;
    Ok(())
}

fn non_empty(field: &str, s: &str) -> Result<(), AppError> {
    if s.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn non_negative_decimal(field: &str, n: f64) -> Result<(), AppError> {
    if !n.is_finite() || n < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

fn non_negative_count(field: &str, n: i32) -> Result<(), AppError> {
    if n < 0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative whole number",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewApartment {
        NewApartment {
            unit_name: "A1".into(),
            unit_number: "101".into(),
            project: "Skyline".into(),
            price: 0.0,
            bedrooms: 0,
            bathrooms: 0,
            area: 0.0,
            description: "nice".into(),
            images: vec![],
            amenities: vec![],
        }
    }

    #[test]
    fn zero_values_are_allowed() {
        assert!(RecordValidator::validate_new(&valid()).is_ok());
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let apt = NewApartment { price: -1.0, ..valid() };
        assert!(matches!(RecordValidator::validate_new(&apt), Err(AppError::Validation(m)) if m.contains("price")));
        let apt = NewApartment { bathrooms: -2, ..valid() };
        assert!(matches!(RecordValidator::validate_new(&apt), Err(AppError::Validation(m)) if m.contains("bathrooms")));
    }

    #[test]
    fn blank_text_is_rejected() {
        let apt = NewApartment { project: "   ".into(), ..valid() };
        assert!(matches!(RecordValidator::validate_new(&apt), Err(AppError::Validation(m)) if m.contains("project")));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let apt = NewApartment { area: f64::INFINITY, ..valid() };
        assert!(RecordValidator::validate_new(&apt).is_err());
    }

    #[test]
    fn merged_records_are_checked() {
        let mut apt = valid().into_apartment(crate::model::now());
        assert!(RecordValidator::validate_record(&apt).is_ok());
        apt.description = String::new();
        assert!(RecordValidator::validate_record(&apt).is_err());
    }
}
