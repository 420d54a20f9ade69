// Planboard
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor};
use async_trait::async_trait;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePool};
use std::fmt::Display;
use time::OffsetDateTime;

/// Number of nanoseconds in a second.
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection pool against the database at `conn_str`.
///
/// Passing `:memory:` yields an in-memory database shared by all connections in the pool, which
/// lives for as long as the pool keeps at least one connection open.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let pool = SqlitePool::connect(conn_str).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A database executor for SQLite backed by a pooled connection.
pub type SqliteExecutor = PoolConnection<Sqlite>;

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// requests can use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.typed_ex().await?;
        Ok(Executor::Sqlite(conn))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
///
/// The `schema` can contain multiple statements separated by semicolons.
pub async fn run_schema(conn: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(&mut **conn).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Reconstructs a timestamp stored as separate seconds and nanoseconds columns.
///
/// SQLite only offers signed integers, so both quantities arrive as `i64`s.  Negative values are
/// rejected to keep comparisons on the seconds column meaningful.
pub fn build_timestamp(secs: i64, nsecs: i64) -> DbResult<OffsetDateTime> {
    let invalid = |reason: &dyn Display| {
        DbError::DataIntegrityError(format!(
            "Invalid timestamp sec={}, nsec={}: {}",
            secs, nsecs, reason
        ))
    };

    if secs < 0 || !(0..NANOS_PER_SEC).contains(&nsecs) {
        return Err(invalid(&"out of range"));
    }
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| invalid(&e))?
        .checked_add(time::Duration::nanoseconds(nsecs))
        .ok_or_else(|| invalid(&"overflow"))
}

/// Splits a timestamp into the seconds and nanoseconds columns used by the schemas.
///
/// Timestamps before the Unix epoch cannot be stored.
pub fn unpack_timestamp(ts: OffsetDateTime) -> (i64, i64) {
    let secs = ts.unix_timestamp();
    assert!(secs >= 0, "Cannot store a timestamp before the Unix epoch");
    (secs, i64::from(ts.nanosecond()))
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        connect(":memory:").await.unwrap()
    }
}
