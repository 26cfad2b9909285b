//! Database connection management using Diesel ORM.
//!
//! Connections come from a small r2d2 pool and are only handed out inside
//! [`with_connection`], so a connection always goes back to the pool when the
//! closure returns, fails, or panics. Statements run through [`execute`] and
//! [`fetch_rows`] take their values as bound parameters.

use std::time::Duration;

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, ManageConnection, Pool};
use diesel::sql_types::{BigInt, Bool, Double, Integer, Nullable, Text, Timestamptz};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::infrastructure::config::{Config, DatabaseUrl};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Upper bound on pooled connections; commands are sequential.
pub const POOL_MAX_SIZE: u32 = 4;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Type alias for a Postgres connection pool.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns [`Error::Connection`] if no connection can be established within
/// the connect timeout (unreachable host, bad credentials, unknown database).
pub fn create_pool(database_url: &DatabaseUrl) -> Result<DbPool> {
    debug!(database = %database_url, "Connecting to database");
    let manager = ConnectionManager::<PgConnection>::new(database_url.expose());
    Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .min_idle(Some(1))
        .connection_timeout(CONNECT_TIMEOUT)
        .build(manager)
        .map_err(|e| Error::Connection(format!("{database_url}: {e}")))
}

/// Pool for the configured database.
///
/// # Errors
/// See [`create_pool`].
pub fn get_connection(config: &Config) -> Result<DbPool> {
    create_pool(&config.database_url)
}

/// Run `f` with a pooled connection. The connection is returned to the pool
/// on every exit path, including a panic inside `f`.
///
/// # Errors
/// Returns [`Error::Connection`] if no connection is available, otherwise
/// whatever `f` returns.
pub fn with_connection<M, T, F>(pool: &Pool<M>, f: F) -> Result<T>
where
    M: ManageConnection,
    F: FnOnce(&mut M::Connection) -> Result<T>,
{
    let mut conn = pool.get()?;
    f(&mut *conn)
}

/// A value bound to a statement placeholder (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(Option<String>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    Double(Option<f64>),
    Bool(Option<bool>),
    Timestamp(Option<DateTime<Utc>>),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(Some(value.to_string()))
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(Some(value))
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(Some(value))
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::BigInt(Some(value))
    }
}

fn bind_all<'a>(statement: &'a str, params: &[SqlParam]) -> BoxedSqlQuery<'a, Pg, SqlQuery> {
    let mut query = diesel::sql_query(statement).into_boxed::<Pg>();
    for param in params {
        query = match param.clone() {
            SqlParam::Text(v) => query.bind::<Nullable<Text>, _>(v),
            SqlParam::Int(v) => query.bind::<Nullable<Integer>, _>(v),
            SqlParam::BigInt(v) => query.bind::<Nullable<BigInt>, _>(v),
            SqlParam::Double(v) => query.bind::<Nullable<Double>, _>(v),
            SqlParam::Bool(v) => query.bind::<Nullable<Bool>, _>(v),
            SqlParam::Timestamp(v) => query.bind::<Nullable<Timestamptz>, _>(v),
        };
    }
    query
}

/// Execute a statement with bound parameters and return the affected row count.
///
/// # Errors
/// Returns [`Error::Query`] carrying the database error.
pub fn execute(conn: &mut PgConnection, statement: &str, params: &[SqlParam]) -> Result<usize> {
    Ok(bind_all(statement, params).execute(conn)?)
}

/// Run a query with bound parameters and load typed rows.
///
/// # Errors
/// Returns [`Error::Query`] carrying the database error.
pub fn fetch_rows<T>(conn: &mut PgConnection, statement: &str, params: &[SqlParam]) -> Result<Vec<T>>
where
    T: QueryableByName<Pg> + 'static,
{
    Ok(bind_all(statement, params).load::<T>(conn)?)
}

/// Run all pending database migrations and return how many were applied.
///
/// # Errors
/// Returns [`Error::Connection`] if no connection is available, or
/// [`Error::Migration`] if a migration fails.
pub fn run_migrations(pool: &DbPool) -> Result<usize> {
    with_connection(pool, |conn| {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| Error::Migration(e.to_string()))?;
        for version in &applied {
            info!(version = %version, "Applied migration");
        }
        Ok(applied.len())
    })
}
