//! Shared application state for all routes.

use crate::service::ApartmentService;

#[derive(Clone)]
pub struct AppState {
    /// Owns the store handle; built once at startup.
    pub apartments: ApartmentService,
}

impl AppState {
    pub fn new(apartments: ApartmentService) -> Self {
        AppState { apartments }
    }
}
