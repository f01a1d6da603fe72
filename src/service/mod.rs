//! ApartmentService: CRUD and search over the store, with input coercion and validation.

pub mod coerce;
mod crud;
mod validation;
pub use crud::ApartmentService;
pub use validation::RecordValidator;
