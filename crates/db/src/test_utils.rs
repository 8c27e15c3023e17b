//! Throwaway `PostgreSQL` databases for integration tests.
//!
//! Connection settings come from `TEST_DB_*` environment variables. Every
//! database handed out has the murmur schema migrated.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use crate::migrations::Migrator;

/// Where the test server lives.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Role to connect as.
    pub username: String,
    /// Password for `username`.
    pub password: String,
    /// Database the tests run in.
    pub database: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: env_or("TEST_DB_USER", "murmur_test"),
            password: env_or("TEST_DB_PASSWORD", "murmur_test"),
            database: env_or("TEST_DB_NAME", "murmur_test"),
        }
    }
}

impl TestDbConfig {
    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    /// URL of the test database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the `postgres` maintenance database, used to create and drop
    /// per-test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }
}

async fn run_admin(config: &TestDbConfig, sql: String) -> Result<(), DbErr> {
    let admin = Database::connect(config.postgres_url()).await?;
    let result = admin
        .execute(Statement::from_string(DatabaseBackend::Postgres, sql))
        .await;
    admin.close().await?;
    result.map(|_| ())
}

/// A migrated test database.
pub struct TestDatabase {
    conn: Arc<DatabaseConnection>,
    /// Settings the database was opened with.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Open the shared test database named by `TEST_DB_NAME`.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Open and migrate the database described by `config`.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");
        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Create a fresh database with a random name, so tests can run in
    /// parallel. Remove it with [`TestDatabase::drop_database`].
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("murmur_test_{}", &suffix[..12]);

        run_admin(&config, format!("CREATE DATABASE \"{}\"", config.database)).await?;
        Self::with_config(config).await
    }

    /// Shared handle to the connection pool, in the form services take.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.conn.clone()
    }

    /// Empty every murmur table.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let truncate = "TRUNCATE TABLE comment_likes, post_likes, post_ratings, \
                        site_ratings, comments, posts CASCADE";
        self.conn
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                truncate.to_string(),
            ))
            .await?;

        info!(database = %self.config.database, "Cleaned up test database");
        Ok(())
    }

    /// Drop a database made by [`TestDatabase::create_unique`].
    ///
    /// Connections still held elsewhere are terminated server-side.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        let Self { conn, config } = self;
        match Arc::try_unwrap(conn) {
            Ok(conn) => conn.close().await?,
            Err(_) => warn!(database = %config.database, "Test connection still shared"),
        }

        let terminate = format!(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
             WHERE datname = '{}' AND pid <> pg_backend_pid()",
            config.database
        );
        if let Err(e) = run_admin(&config, terminate).await {
            warn!(error = %e, "Failed to terminate test connections");
        }
        run_admin(
            &config,
            format!("DROP DATABASE IF EXISTS \"{}\"", config.database),
        )
        .await?;

        info!(database = %config.database, "Dropped test database");
        Ok(())
    }
}
