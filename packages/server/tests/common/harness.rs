//! Test harness with testcontainers for integration testing.
//!
//! Uses a shared Postgres container across all tests. The container starts
//! and migrations run once on the first test; every test then gets a fresh
//! pool against the same database. Fixtures use unique slugs and emails so
//! tests stay independent.

use anyhow::{Context, Result};
use axum::Router;
use server_core::common::{JwtService, UserId};
use server_core::server::build_app;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_JWT_ISSUER: &str = "dealstack-admin-test";

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     // ... test code using ctx.db_pool
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }

    /// Build the full HTTP application against the test database.
    pub fn app(&self) -> Router {
        build_app(
            self.db_pool.clone(),
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER.to_string(),
            Vec::new(),
        )
    }

    /// Mint a bearer token for the given user, valid for the test app.
    pub fn token_for(&self, user_id: UserId, email: &str) -> String {
        let jwt = JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string());
        jwt.create_token(user_id.into_uuid(), email.to_string())
            .expect("Failed to mint test token")
    }
}
