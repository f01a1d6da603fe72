//! Apartment CRUD over an injected store.

use crate::error::AppError;
use crate::model::{Apartment, ApartmentId};
use crate::service::coerce;
use crate::store::{ApartmentFilter, ApartmentStore};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApartmentService {
    store: Arc<dyn ApartmentStore>,
}

impl ApartmentService {
    pub fn new(store: Arc<dyn ApartmentStore>) -> Self {
        ApartmentService { store }
    }

    pub fn store(&self) -> &Arc<dyn ApartmentStore> {
        &self.store
    }

    /// All apartments, or those matching `search` when it is non-blank.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Apartment>, AppError> {
        let filter = match search.map(str::trim) {
            Some(term) if !term.is_empty() => ApartmentFilter::Text(term.to_string()),
            _ => ApartmentFilter::All,
        };
        self.store.find_all(&filter).await
    }

    pub async fn get(&self, id: &str) -> Result<Apartment, AppError> {
        let parsed = parse_id(id)?;
        self.store
            .find_by_id(parsed)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    pub async fn create(&self, body: Value) -> Result<Apartment, AppError> {
        let body = coerce::body_to_map(body)?;
        let new = coerce::new_apartment(&body)?;
        let created = self.store.insert(new).await?;
        tracing::info!(id = %created.id, "apartment created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Apartment, AppError> {
        let parsed = parse_id(id)?;
        let body = coerce::body_to_map(body)?;
        let patch = coerce::apartment_patch(&body)?;
        let updated = self
            .store
            .update_by_id(parsed, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::info!(id = %updated.id, "apartment updated");
        Ok(updated)
    }

    /// Returns the removed record.
    pub async fn delete(&self, id: &str) -> Result<Apartment, AppError> {
        let parsed = parse_id(id)?;
        let deleted = self
            .store
            .delete_by_id(parsed)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::info!(id = %deleted.id, "apartment deleted");
        Ok(deleted)
    }
}

/// A malformed id can never resolve, so it is reported as not found.
fn parse_id(id: &str) -> Result<ApartmentId, AppError> {
    ApartmentId::parse(id).ok_or_else(|| AppError::NotFound(id.to_string()))
}
