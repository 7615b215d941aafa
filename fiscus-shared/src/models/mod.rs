/// Database models for Fiscus
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `budget`: Monthly budgets owned by a user
/// - `income`: Income entries belonging to a budget
/// - `expense`: Expense entries belonging to a budget
/// - `saving`: Saving goals belonging to a budget
///
/// # Example
///
/// ```no_run
/// use fiscus_shared::models::user::{CreateUser, User};
/// use fiscus_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod budget;
pub mod expense;
pub mod income;
pub mod saving;
pub mod user;
