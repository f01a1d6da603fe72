//! HTTP handlers for apartment CRUD.

pub mod apartments;
