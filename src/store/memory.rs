//! Process-local store. Search is a case-insensitive substring match on the
//! indexed fields, returned in insertion order.
//!
//! The whole trimmed term is one needle, so a multi-word term only matches when
//! it appears verbatim in a single field. The PostgreSQL store matches any word
//! of the term instead: `"Skyline A1"` finds a unit named `A1` there and nothing here.

use super::{ApartmentFilter, ApartmentStore};
use crate::error::{AppError, StoreError};
use crate::model::{self, Apartment, ApartmentId, ApartmentPatch, NewApartment};
use crate::service::RecordValidator;
use async_trait::async_trait;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryApartmentStore {
    records: RwLock<Vec<Apartment>>,
}

impl MemoryApartmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, AppError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

fn matches_term(apt: &Apartment, needle: &str) -> bool {
    [&apt.unit_name, &apt.unit_number, &apt.project]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl ApartmentStore for MemoryApartmentStore {
    async fn find_all(&self, filter: &ApartmentFilter) -> Result<Vec<Apartment>, AppError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(match filter {
            ApartmentFilter::All => records.clone(),
            ApartmentFilter::Text(term) => {
                let needle = term.trim().to_lowercase();
                records
                    .iter()
                    .filter(|apt| matches_term(apt, &needle))
                    .cloned()
                    .collect()
            }
        })
    }

    async fn find_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.iter().find(|apt| apt.id == id).cloned())
    }

    async fn insert(&self, apt: NewApartment) -> Result<Apartment, AppError> {
        RecordValidator::validate_new(&apt)?;
        let apt = apt.into_apartment(model::now());
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.push(apt.clone());
        Ok(apt)
    }

    async fn update_by_id(
        &self,
        id: ApartmentId,
        patch: ApartmentPatch,
    ) -> Result<Option<Apartment>, AppError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let Some(slot) = records.iter_mut().find(|apt| apt.id == id) else {
            return Ok(None);
        };
        // Merge into a copy so a rejected update leaves the stored record as it was.
        let mut merged = slot.clone();
        patch.apply_to(&mut merged, model::now());
        RecordValidator::validate_record(&merged)?;
        *slot = merged.clone();
        Ok(Some(merged))
    }

    async fn delete_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let Some(pos) = records.iter().position(|apt| apt.id == id) else {
            return Ok(None);
        };
        Ok(Some(records.remove(pos)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.records
            .read()
            .map(|_| ())
            .map_err(|_| StoreError::Poisoned.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    fn unit(name: &str, number: &str, project: &str) -> NewApartment {
        NewApartment {
            unit_name: name.into(),
            unit_number: number.into(),
            project: project.into(),
            price: 100.0,
            bedrooms: 1,
            bathrooms: 1,
            area: 50.0,
            description: "test unit".into(),
            images: vec![],
            amenities: vec![],
        }
    }

    #[tokio::test]
    async fn search_matches_any_indexed_field_case_insensitively() -> TestResult {
        let store = MemoryApartmentStore::new();
        let a = store.insert(unit("Garden Loft", "101", "Skyline")).await?;
        let b = store.insert(unit("Penthouse", "PH-2", "Harbor View")).await?;
        store.insert(unit("Studio", "7", "Riverside")).await?;

        let hits = store.find_all(&ApartmentFilter::Text("garden".into())).await?;
        assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), vec![a.id]);

        let hits = store.find_all(&ApartmentFilter::Text("HARBOR".into())).await?;
        assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), vec![b.id]);

        let hits = store.find_all(&ApartmentFilter::Text("ph-2".into())).await?;
        assert_eq!(hits.len(), 1);

        let hits = store.find_all(&ApartmentFilter::Text("nowhere".into())).await?;
        assert!(hits.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn multi_word_term_is_a_single_needle() -> TestResult {
        let store = MemoryApartmentStore::new();
        let b = store.insert(unit("Penthouse", "PH-2", "Harbor View")).await?;
        store.insert(unit("A1", "101", "Skyline")).await?;

        let hits = store.find_all(&ApartmentFilter::Text("harbor view".into())).await?;
        assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), vec![b.id]);

        let hits = store.find_all(&ApartmentFilter::Text("Skyline A1".into())).await?;
        assert!(hits.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() -> TestResult {
        let store = MemoryApartmentStore::new();
        let first = store.insert(unit("B", "2", "P")).await?;
        let second = store.insert(unit("A", "1", "P")).await?;
        let all = store.find_all(&ApartmentFilter::All).await?;
        assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), vec![first.id, second.id]);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_update_leaves_record_untouched() -> TestResult {
        let store = MemoryApartmentStore::new();
        let apt = store.insert(unit("Loft", "1", "Skyline")).await?;
        let patch = ApartmentPatch {
            unit_name: Some("Renamed".into()),
            price: Some(-5.0),
            ..ApartmentPatch::default()
        };
        let result = store.update_by_id(apt.id, patch).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.find_by_id(apt.id).await?, Some(apt));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_insert_persists_nothing() -> TestResult {
        let store = MemoryApartmentStore::new();
        let mut bad = unit("Loft", "1", "Skyline");
        bad.area = -1.0;
        assert!(store.insert(bad).await.is_err());
        assert!(store.is_empty()?);
        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_removed_record_once() -> TestResult {
        let store = MemoryApartmentStore::new();
        let apt = store.insert(unit("Loft", "1", "Skyline")).await?;
        assert_eq!(store.delete_by_id(apt.id).await?, Some(apt.clone()));
        assert_eq!(store.delete_by_id(apt.id).await?, None);
        assert_eq!(store.update_by_id(apt.id, ApartmentPatch::default()).await?, None);
        Ok(())
    }
}
