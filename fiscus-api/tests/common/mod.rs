/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and migrations
/// - Test user creation with working password hashes
/// - JWT token generation
/// - Cleanup helpers

use fiscus_api::app::{build_router, AppState};
use fiscus_api::config::Config;
use fiscus_shared::auth::jwt::{create_token, Claims};
use fiscus_shared::auth::password::hash_password;
use fiscus_shared::models::budget::{Budget, CreateBudget};
use fiscus_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Password every test user is created with
pub const TEST_PASSWORD: &str = "password123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a migrated database and one user
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test user with a real hash so login works against it
        let user = User::create(
            &db,
            CreateUser {
                name: "Test User".to_string(),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
            },
        )
        .await?;

        // Generate JWT token
        let claims = Claims::new(user.id, user.email.clone());
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Creates a second user with their own token, for cross-user tests
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                name: "Other User".to_string(),
                email: format!("other-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
            },
        )
        .await?;

        let claims = Claims::new(user.id, user.email.clone());
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Removes one user and everything they own
    ///
    /// There are no foreign keys in the schema, so items and budgets have
    /// to be removed explicitly before the user row.
    pub async fn cleanup_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        for table in ["incomes", "expenses", "savings"] {
            sqlx::query(&format!(
                "DELETE FROM {table} \
                 WHERE budget_id IN (SELECT id FROM budgets WHERE user_id = $1)"
            ))
            .bind(user_id)
            .execute(&self.db)
            .await?;
        }

        sqlx::query("DELETE FROM budgets WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Cleans up test data created by this context's user
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        self.cleanup_user(self.user.id).await
    }
}

/// Helper to create a budget owned by the context user
pub async fn create_test_budget(ctx: &TestContext) -> anyhow::Result<Budget> {
    let budget = Budget::create(
        &ctx.db,
        CreateBudget {
            user_id: ctx.user.id,
            month: 6,
            year: 2025,
        },
    )
    .await?;

    Ok(budget)
}
