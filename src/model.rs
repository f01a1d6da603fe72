//! Apartment record and its create/update inputs.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Store-assigned identifier. Serialized as a bare UUID string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ApartmentId(Uuid);

impl ApartmentId {
    pub fn new() -> Self {
        ApartmentId(Uuid::new_v4())
    }

    /// Returns None for anything that is not a structurally valid id.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(ApartmentId)
    }
}

impl Default for ApartmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    #[serde(rename = "_id")]
    pub id: ApartmentId,
    pub unit_name: String,
    pub unit_number: String,
    pub project: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[serde(serialize_with = "serialize_decimal")]
    pub area: f64,
    pub description: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new apartment; id and timestamps are assigned on insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewApartment {
    pub unit_name: String,
    pub unit_number: String,
    pub project: String,
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub description: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
}

/// Partial update. `None` leaves the stored value as is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApartmentPatch {
    pub unit_name: Option<String>,
    pub unit_number: Option<String>,
    pub project: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

impl NewApartment {
    /// Materialize into a record with a fresh id and `created_at == updated_at`.
    pub fn into_apartment(self, now: DateTime<Utc>) -> Apartment {
        Apartment {
            id: ApartmentId::new(),
            unit_name: self.unit_name,
            unit_number: self.unit_number,
            project: self.project,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            description: self.description,
            images: self.images,
            amenities: self.amenities,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ApartmentPatch {
    /// Merge into `target` and bump `updated_at`. Id and `created_at` are never touched.
    pub fn apply_to(self, target: &mut Apartment, now: DateTime<Utc>) {
        if let Some(v) = self.unit_name {
            target.unit_name = v;
        }
        if let Some(v) = self.unit_number {
            target.unit_number = v;
        }
        if let Some(v) = self.project {
            target.project = v;
        }
        if let Some(v) = self.price {
            target.price = v;
        }
        if let Some(v) = self.bedrooms {
            target.bedrooms = v;
        }
        if let Some(v) = self.bathrooms {
            target.bathrooms = v;
        }
        if let Some(v) = self.area {
            target.area = v;
        }
        if let Some(v) = self.description {
            target.description = v;
        }
        if let Some(v) = self.images {
            target.images = v;
        }
        if let Some(v) = self.amenities {
            target.amenities = v;
        }
        target.updated_at = next_timestamp(target.updated_at, now);
    }
}

/// Current time at the precision PostgreSQL stores (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// `now`, or one microsecond past `previous` when the clock has not moved past it.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Integral values go out as JSON integers so `250000.0` reads as `250000`.
fn serialize_decimal<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if v.fract() == 0.0 && v.abs() < MAX_EXACT {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}
