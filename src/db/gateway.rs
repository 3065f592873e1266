//! Pooled access to the relational store.
//!
//! Production talks to MySQL; SQLite backs local development and the test
//! suite. Both speak `?` placeholders, so callers pass the same SQL to either.

use crate::config::{DatabaseConfig, DatabaseTarget};
use crate::db::row::{mysql_row_to_json, sqlite_row_to_json, JsonRow, SqlParam};
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

/// Binds positional parameters onto a `sqlx::query` for any backend.
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Null => query.bind(None::<String>),
                SqlParam::Bool(v) => query.bind(*v),
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Float(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }};
}

/// A connection pool for one of the supported backends.
#[derive(Debug, Clone)]
pub enum Gateway {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl Gateway {
    /// Build the pool without opening a connection.
    ///
    /// Connections are established on first use, so the service starts even
    /// when the store is unreachable; see [`Gateway::probe`].
    ///
    /// # Errors
    /// Returns an error if `DATABASE_URL` cannot be parsed.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        match &config.target {
            DatabaseTarget::MySql {
                host,
                port,
                user,
                password,
                database,
            } => {
                let options = MySqlConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(database);
                Ok(Self::mysql_pool(config, options))
            }
            DatabaseTarget::Url(url) if url.starts_with("mysql:") => {
                let options = MySqlConnectOptions::from_str(url)?;
                Ok(Self::mysql_pool(config, options))
            }
            DatabaseTarget::Url(url) => {
                let options =
                    SqliteConnectOptions::from_str(url)?.busy_timeout(Duration::from_secs(5));
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.connection_limit)
                    .acquire_timeout(config.acquire_timeout)
                    .connect_lazy_with(options);
                Ok(Gateway::Sqlite(pool))
            }
        }
    }

    fn mysql_pool(config: &DatabaseConfig, options: MySqlConnectOptions) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.connection_limit)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);
        Gateway::MySql(pool)
    }

    /// Check out one connection and hand it straight back.
    ///
    /// # Errors
    /// Returns the connect or acquire error.
    pub async fn probe(&self) -> Result<(), sqlx::Error> {
        match self {
            Gateway::MySql(pool) => pool.acquire().await.map(drop),
            Gateway::Sqlite(pool) => pool.acquire().await.map(drop),
        }
    }

    /// Probe at startup and log the outcome; never fails.
    pub async fn log_connection_status(&self) {
        match self.probe().await {
            Ok(()) => info!(backend = self.backend(), "Connected to database"),
            Err(e) => error!(backend = self.backend(), error = %e, "Error connecting to database"),
        }
    }

    /// Run a query and return every row as a JSON object.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be acquired or the query fails.
    pub async fn fetch_all(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<JsonRow>, sqlx::Error> {
        match self {
            Gateway::MySql(pool) => {
                let rows = bind_params!(sqlx::query::<MySql>(sql), params)
                    .fetch_all(pool)
                    .await?;
                Ok(rows.iter().map(mysql_row_to_json).collect())
            }
            Gateway::Sqlite(pool) => {
                let rows = bind_params!(sqlx::query::<Sqlite>(sql), params)
                    .fetch_all(pool)
                    .await?;
                Ok(rows.iter().map(sqlite_row_to_json).collect())
            }
        }
    }

    /// Run a statement and return the number of affected rows.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be acquired or the statement fails.
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, sqlx::Error> {
        let rows_affected = match self {
            Gateway::MySql(pool) => bind_params!(sqlx::query::<MySql>(sql), params)
                .execute(pool)
                .await?
                .rows_affected(),
            Gateway::Sqlite(pool) => bind_params!(sqlx::query::<Sqlite>(sql), params)
                .execute(pool)
                .await?
                .rows_affected(),
        };
        Ok(rows_affected)
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        match self {
            Gateway::MySql(pool) => pool.close().await,
            Gateway::Sqlite(pool) => pool.close().await,
        }
        info!(backend = self.backend(), "Database pool closed");
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Gateway::MySql(_) => "mysql",
            Gateway::Sqlite(_) => "sqlite",
        }
    }
}
