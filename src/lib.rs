//! Apartments API: REST backend for apartment listings.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod shutdown;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Apartment, ApartmentId, ApartmentPatch, NewApartment};
pub use routes::{apartment_routes, app, common_routes};
pub use service::ApartmentService;
pub use shutdown::shutdown_signal;
pub use state::AppState;
pub use store::{
    ensure_database, ensure_database_exists, ApartmentFilter, ApartmentStore, MemoryApartmentStore,
    PgApartmentStore,
};
