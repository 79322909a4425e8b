//! Database Test Utilities
//!
//! Throwaway PostgreSQL containers for the claim store integration tests.
//! Each test gets its own container with the claims schema applied.
//! Container tests need Docker and are marked `#[ignore]` by callers.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "claims";
const POSTGRES_PASSWORD: &str = "claims_test_password";
const POSTGRES_DB: &str = "claims_test";

const SCHEMA: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");

pub type TestDatabaseError = Box<dyn std::error::Error + Send + Sync>;

/// A running PostgreSQL container holding the claims schema
///
/// The container stops when this is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Starts a fresh container, connects and loads the schema
pub async fn create_isolated_test_database() -> Result<TestDatabase, TestDatabaseError> {
    let container = Postgres::default()
        .with_user(POSTGRES_USER)
        .with_password(POSTGRES_PASSWORD)
        .with_db_name(POSTGRES_DB)
        .with_tag(POSTGRES_TAG)
        .start()
        .await?;

    let host = container.get_host().await?.to_string();
    let port = container.get_host_port_ipv4(5432).await?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&connection_url(&host, port))
        .await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    Ok(TestDatabase {
        _container: container,
        pool,
    })
}

fn connection_url(host: &str, port: u16) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}",
        POSTGRES_USER, POSTGRES_PASSWORD, host, port, POSTGRES_DB
    )
}
