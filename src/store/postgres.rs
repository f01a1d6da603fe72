//! PostgreSQL store: `apartments` table DDL, full-text index, and CRUD queries.

use super::{ApartmentFilter, ApartmentStore};
use crate::error::AppError;
use crate::model::{self, Apartment, ApartmentId, ApartmentPatch, NewApartment};
use crate::service::RecordValidator;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const TABLE: &str = "apartments";

const COLUMNS: &str = "id, unit_name, unit_number, project, price, bedrooms, bathrooms, area, \
                       description, images, amenities, created_at, updated_at";

/// Must match the expression in the GIN index exactly or the index is not used.
const SEARCH_DOCUMENT: &str =
    "to_tsvector('simple', unit_name || ' ' || unit_number || ' ' || project)";

#[derive(Clone)]
pub struct PgApartmentStore {
    pool: PgPool,
}

impl PgApartmentStore {
    pub fn new(pool: PgPool) -> Self {
        PgApartmentStore { pool }
    }

    /// Create the table and the text index if they do not exist. The CHECK
    /// constraints repeat the validator's rules so no other writer can bypass them.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                unit_name TEXT NOT NULL CHECK (btrim(unit_name) <> ''),
                unit_number TEXT NOT NULL CHECK (btrim(unit_number) <> ''),
                project TEXT NOT NULL CHECK (btrim(project) <> ''),
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                bedrooms INTEGER NOT NULL CHECK (bedrooms >= 0),
                bathrooms INTEGER NOT NULL CHECK (bathrooms >= 0),
                area DOUBLE PRECISION NOT NULL CHECK (area >= 0),
                description TEXT NOT NULL CHECK (btrim(description) <> ''),
                images TEXT[] NOT NULL DEFAULT '{{}}',
                amenities TEXT[] NOT NULL DEFAULT '{{}}',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
            TABLE
        );
        sqlx::query(&ddl).execute(&self.pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {}_search_idx ON {} USING GIN ({})",
            TABLE, TABLE, SEARCH_DOCUMENT
        );
        sqlx::query(&index).execute(&self.pool).await?;

        let order_index = format!(
            "CREATE INDEX IF NOT EXISTS {}_created_at_idx ON {} (created_at, id)",
            TABLE, TABLE
        );
        sqlx::query(&order_index).execute(&self.pool).await?;
        tracing::info!(table = TABLE, "apartment schema ready");
        Ok(())
    }
}

#[async_trait]
impl ApartmentStore for PgApartmentStore {
    async fn find_all(&self, filter: &ApartmentFilter) -> Result<Vec<Apartment>, AppError> {
        match filter {
            ApartmentFilter::All => {
                let sql = format!("SELECT {} FROM {} ORDER BY created_at, id", COLUMNS, TABLE);
                tracing::debug!(sql = %sql, "query");
                Ok(sqlx::query_as::<_, Apartment>(&sql)
                    .fetch_all(&self.pool)
                    .await?)
            }
            ApartmentFilter::Text(term) => {
                // plainto_tsquery strips operators from user input; its terms are
                // then OR-ed so a record matching any of them is returned.
                let sql = format!(
                    "SELECT {cols} FROM {table}, \
                     (SELECT replace(plainto_tsquery('simple', $1)::text, '&', '|')::tsquery AS q) AS search \
                     WHERE {doc} @@ search.q \
                     ORDER BY ts_rank({doc}, search.q) DESC, created_at, id",
                    cols = COLUMNS,
                    table = TABLE,
                    doc = SEARCH_DOCUMENT
                );
                tracing::debug!(sql = %sql, term = %term, "query");
                Ok(sqlx::query_as::<_, Apartment>(&sql)
                    .bind(term)
                    .fetch_all(&self.pool)
                    .await?)
            }
        }
    }

    async fn find_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, TABLE);
        tracing::debug!(sql = %sql, id = %id, "query");
        Ok(sqlx::query_as::<_, Apartment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, apt: NewApartment) -> Result<Apartment, AppError> {
        RecordValidator::validate_new(&apt)?;
        let apt = apt.into_apartment(model::now());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING {}",
            TABLE, COLUMNS, COLUMNS
        );
        tracing::debug!(sql = %sql, id = %apt.id, "query");
        let row = sqlx::query_as::<_, Apartment>(&sql)
            .bind(apt.id)
            .bind(&apt.unit_name)
            .bind(&apt.unit_number)
            .bind(&apt.project)
            .bind(apt.price)
            .bind(apt.bedrooms)
            .bind(apt.bathrooms)
            .bind(apt.area)
            .bind(&apt.description)
            .bind(&apt.images)
            .bind(&apt.amenities)
            .bind(apt.created_at)
            .bind(apt.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_by_id(
        &self,
        id: ApartmentId,
        patch: ApartmentPatch,
    ) -> Result<Option<Apartment>, AppError> {
        let mut tx = self.pool.begin().await?;
        let select = format!("SELECT {} FROM {} WHERE id = $1 FOR UPDATE", COLUMNS, TABLE);
        tracing::debug!(sql = %select, id = %id, "query (tx)");
        let current: Option<Apartment> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut apt) = current else {
            return Ok(None);
        };

        patch.apply_to(&mut apt, model::now());
        // Dropping the transaction on error rolls back and releases the row lock.
        RecordValidator::validate_record(&apt)?;

        let update = format!(
            "UPDATE {} SET unit_name = $2, unit_number = $3, project = $4, price = $5, \
             bedrooms = $6, bathrooms = $7, area = $8, description = $9, images = $10, \
             amenities = $11, updated_at = $12 WHERE id = $1 RETURNING {}",
            TABLE, COLUMNS
        );
        tracing::debug!(sql = %update, id = %id, "query (tx)");
        let row: Apartment = sqlx::query_as(&update)
            .bind(apt.id)
            .bind(&apt.unit_name)
            .bind(&apt.unit_number)
            .bind(&apt.project)
            .bind(apt.price)
            .bind(apt.bedrooms)
            .bind(apt.bathrooms)
            .bind(apt.area)
            .bind(&apt.description)
            .bind(&apt.images)
            .bind(&apt.amenities)
            .bind(apt.updated_at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete_by_id(&self, id: ApartmentId) -> Result<Option<Apartment>, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", TABLE, COLUMNS);
        tracing::debug!(sql = %sql, id = %id, "query");
        Ok(sqlx::query_as::<_, Apartment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let options = PgConnectOptions::from_str(database_url)?;
    ensure_database(&options).await
}

/// Like [`ensure_database_exists`] for already parsed options. CREATE DATABASE runs
/// in a session on the `postgres` maintenance database.
pub async fn ensure_database(options: &PgConnectOptions) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_target(options) else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Admin session options and the database to create. None when the options
/// name no database or name the maintenance database itself.
fn admin_target(options: &PgConnectOptions) -> Option<(PgConnectOptions, String)> {
    let name = options.get_database()?.trim();
    if name.is_empty() || name == "postgres" {
        return None;
    }
    Some((options.clone().database("postgres"), name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn admin_session_keeps_credentials_and_switches_database() -> TestResult {
        let options =
            PgConnectOptions::from_str("postgres://user:pw@db:5432/apartments?sslmode=disable")?;
        let (admin, name) = admin_target(&options).ok_or("expected a database to create")?;
        assert_eq!(name, "apartments");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db");
        assert_eq!(admin.get_port(), 5432);
        assert_eq!(admin.get_username(), "user");
        Ok(())
    }

    #[test]
    fn url_without_database_path_needs_no_creation() -> TestResult {
        let options = PgConnectOptions::from_str("postgres://postgres@127.0.0.1:55432")?;
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 55432);
        if std::env::var_os("PGDATABASE").is_none() {
            assert!(admin_target(&options).is_none());
        }
        let maintenance = PgConnectOptions::from_str("postgres://postgres@127.0.0.1:55432/postgres")?;
        assert!(admin_target(&maintenance).is_none());
        Ok(())
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("apart\"ments"), "\"apart\"\"ments\"");
    }
}
