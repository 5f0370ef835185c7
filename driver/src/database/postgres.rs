use std::ops::{Deref, DerefMut};

use error_stack::Report;
use sqlx::migrate::MigrateError;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

pub use self::book::*;

mod book;

const POSTGRES_URL: &str = "POSTGRES_URL";
const DB_HOST: &str = "DB_HOST";
const DB_PORT: &str = "DB_PORT";
const DB_USER: &str = "DB_USER";
const DB_PASS: &str = "DB_PASS";
const DB_NAME: &str = "DB_NAME";

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    /// Connects using `POSTGRES_URL`, or the `DB_*` variables when it is unset, and
    /// applies pending migrations.
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = match env(POSTGRES_URL)? {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                env_or(DB_USER, "ddd")?,
                env_or(DB_PASS, "ddd")?,
                env_or(DB_HOST, "localhost")?,
                env_or(DB_PORT, "5433")?,
                env_or(DB_NAME, "ddd_hands_on")?,
            ),
        };
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(&url)
            .await
            .convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .convert_error()?;
        tracing::debug!("connected to postgres and applied migrations");
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Connection = PostgresConnection;
    type Transaction = PostgresTransaction;

    async fn connect(&self) -> error_stack::Result<Self::Connection, KernelError> {
        let con = self.pool.acquire().await.convert_error()?;
        Ok(PostgresConnection(con))
    }

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let mut tx = self.pool.begin().await.convert_error()?;
        // language=postgresql
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .convert_error()?;
        Ok(PostgresTransaction(tx))
    }
}

pub struct PostgresConnection(PoolConnection<Postgres>);

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Serializable transaction. Dropping it without commit rolls back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0
            .commit()
            .await
            .map_err(|error| classify(error, KernelError::Transaction))
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0
            .rollback()
            .await
            .map_err(|error| classify(error, KernelError::Transaction))
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

fn classify(error: Error, fallback: KernelError) -> Report<KernelError> {
    let context = match &error {
        Error::PoolTimedOut => KernelError::Timeout,
        Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
            ) =>
        {
            KernelError::Concurrency
        }
        _ => fallback,
    };
    Report::new(error).change_context(context)
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| classify(error, KernelError::Persistence))
    }
}

impl<T> ConvertError for Result<T, MigrateError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Persistence))
    }
}
