//! Postgres-backed repository.
//!
//! One table per resource, named after the resource path segment
//! (`products`, `suppliers`, ...). The record itself is stored as JSONB; a
//! `seq` column keeps insertion order for listing.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Domain(Conflict)` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / other | N/A | `Backend` |
//!
//! ## Atomicity
//!
//! `modify()` runs read-mutate-write inside a transaction holding a
//! `SELECT ... FOR UPDATE` row lock, so concurrent link requests against the
//! same record serialize instead of losing updates.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use catalog_core::{DomainError, Record};

use super::r#trait::{Mutation, Page, Repository, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct PostgresRepository<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> PostgresRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn table() -> &'static str {
        R::RESOURCE.as_str()
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                seq BIGSERIAL NOT NULL,
                id UUID PRIMARY KEY,
                body JSONB NOT NULL
            )",
            table = Self::table()
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Repository<R> for PostgresRepository<R> {
    #[instrument(skip(self, record), fields(table = Self::table(), id = %record.key()), err)]
    async fn insert(&self, record: R) -> StoreResult<R> {
        let sql = format!("INSERT INTO {} (id, body) VALUES ($1, $2)", Self::table());
        sqlx::query(&sql)
            .bind(record.key())
            .bind(Json(&record))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Domain(DomainError::conflict(format!(
                        "{} {} already exists",
                        R::RESOURCE,
                        record.key()
                    )))
                } else {
                    map_sqlx_error("insert", e)
                }
            })?;
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<R>> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", Self::table());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;
        row.map(|r| decode_body(&r)).transpose()
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<R>> {
        let sql = format!(
            "SELECT body FROM {} ORDER BY seq ASC OFFSET $1 LIMIT $2",
            Self::table()
        );
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(page.offset).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;
        rows.iter().map(decode_body).collect()
    }

    #[instrument(skip(self, mutation), fields(table = Self::table(), id = %id), err)]
    async fn modify(&self, id: Uuid, mutation: Mutation<R>) -> StoreResult<(R, R)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let select = format!("SELECT body FROM {} WHERE id = $1 FOR UPDATE", Self::table());
        let row = sqlx::query(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("select_for_update", e))?
            .ok_or(DomainError::NotFound)?;
        let before: R = decode_body(&row)?;

        let mut after = before.clone();
        if let Err(e) = mutation(&mut after) {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(e.into());
        }

        let update = format!("UPDATE {} SET body = $2 WHERE id = $1", Self::table());
        sqlx::query(&update)
            .bind(id)
            .bind(Json(&after))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok((before, after))
    }

    async fn remove(&self, id: Uuid) -> StoreResult<R> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING body", Self::table());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove", e))?
            .ok_or(DomainError::NotFound)?;
        decode_body(&row)
    }
}

fn decode_body<R: Record>(row: &sqlx::postgres::PgRow) -> StoreResult<R> {
    let Json(record) = row
        .try_get::<Json<R>, _>("body")
        .map_err(|e| StoreError::Backend(format!("failed to decode {} row: {e}", R::RESOURCE)))?;
    Ok(record)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}
