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

//! Common utilities to interact with a PostgreSQL database.

use crate::db::{Db, DbError, DbResult, Executor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, Postgres};
use std::time::Duration;

/// Port to connect to when none is configured.
const DEFAULT_PORT: u16 = 5432;

/// Seconds to wait for a pooled connection to become available when none is configured.
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 2;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    let code = match &e {
        sqlx::Error::Database(db_error) => {
            Some(db_error.downcast_ref::<PgDatabaseError>().code().to_owned())
        }
        _ => None,
    };

    match (code.as_deref(), e) {
        (Some("23505"), _) => DbError::AlreadyExists,
        (Some("53300"), _) | (Some("57P03"), _) => DbError::Unavailable,
        (Some(code), e) => DbError::BackendError(format!("pgsql error {}: {}", code, e)),
        (None, sqlx::Error::ColumnDecode { source, .. }) => {
            DbError::DataIntegrityError(source.to_string())
        }
        (None, sqlx::Error::PoolTimedOut) => DbError::Unavailable,
        (None, sqlx::Error::RowNotFound) => DbError::NotFound,
        (None, e) => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection to a PostgreSQL database.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.  For hosted databases, this is the service key.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,

    /// Maximum time to wait for a pooled connection before reporting the database as unavailable.
    pub acquire_timeout: Duration,
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// `<prefix>_HOST`, `<prefix>_DATABASE`, `<prefix>_USERNAME` and `<prefix>_PASSWORD` are
    /// required.  `<prefix>_PORT`, `<prefix>_MIN_CONNECTIONS`, `<prefix>_MAX_CONNECTIONS`
    /// and `<prefix>_ACQUIRE_TIMEOUT_SECS` are optional.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        let acquire_timeout_secs = get_optional_var::<u64>(prefix, "ACQUIRE_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);
        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

/// A database executor for PostgreSQL backed by a pooled connection.
pub type PostgresExecutor = PoolConnection<Postgres>;

/// A database instance backed by a pool of PostgreSQL connections.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.  Cloning it is cheap and every request obtains its own
    /// connection from it.
    pool: PgPool,
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

impl PostgresDb {
    /// Creates a new connection pool based on a set of options.
    ///
    /// Note that this does *not* establish any connection: they are opened on first use.
    pub fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let mut pool_options = PgPoolOptions::new().acquire_timeout(opts.acquire_timeout);
        if let Some(min_connections) = opts.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }
        if let Some(max_connections) = opts.max_connections {
            pool_options = pool_options.max_connections(max_connections);
        }

        let connect_options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password);

        let pool = pool_options.connect_lazy_with(connect_options);
        Ok(Self { pool })
    }

    /// Returns an executor of the specific type used by this database.
    ///
    /// Failing to obtain a connection within the acquire timeout is reported right away.
    pub async fn typed_ex(&self) -> DbResult<PostgresExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        Ok(Executor::Postgres(self.typed_ex().await?))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Runs all statements in `schema`, which are separated by semicolons, against `conn`.
pub async fn run_schema(conn: &mut PostgresExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(&mut **conn).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Test utilities for the PostgreSQL connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Connects to the database configured in the `PGSQL_TEST_*` variables.
    ///
    /// The pool is limited to a single connection whose `search_path` points to `pg_temp`, which
    /// makes every table created by a test vanish once the connection is closed.  Any error
    /// panics.
    pub async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let opts = PostgresOptions {
            min_connections: Some(1),
            max_connections: Some(1),
            ..PostgresOptions::from_env("PGSQL_TEST").unwrap()
        };
        let db = PostgresDb::connect(opts).unwrap();

        let mut conn = db.typed_ex().await.unwrap();
        sqlx::query("SET search_path TO pg_temp").execute(&mut *conn).await.unwrap();
        db
    }
}
