//! Apartment persistence: the store trait and its PostgreSQL and in-memory backends.

mod memory;
mod postgres;

pub use memory::MemoryApartmentStore;
pub use postgres::{ensure_database, ensure_database_exists, PgApartmentStore};

use crate::error::AppError;
use crate::model::{Apartment, ApartmentId, ApartmentPatch, NewApartment};
use async_trait::async_trait;

/// Which records `find_all` returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApartmentFilter {
    All,
    /// Full-text search over unit name, unit number and project.
    Text(String),
}

/// Every write validates the resulting record; a rejected write leaves the store unchanged.
#[async_trait]
pub trait ApartmentStore: Send + Sync {
    async fn find_all(&self, filter: &ApartmentFilter) -> Result<Vec<Apartment>, AppError>;

    async fn find_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError>;

    /// Assigns id and timestamps.
    async fn insert(&self, apt: NewApartment) -> Result<Apartment, AppError>;

    /// Returns the record after the update, or None if the id does not resolve.
    async fn update_by_id(
        &self,
        id: ApartmentId,
        patch: ApartmentPatch,
    ) -> Result<Option<Apartment>, AppError>;

    /// Returns the removed record, or None if the id does not resolve.
    async fn delete_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
