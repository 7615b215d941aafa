/// Budget model and database operations
///
/// A budget is the ownership anchor of the system: every income, expense and
/// saving entry belongs to exactly one budget, and a budget belongs to exactly
/// one user. Authorization decisions for child records always resolve through
/// the budget's `user_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE budgets (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
///     year INT NOT NULL CHECK (year >= 2000),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Budget model representing one month of planned finances
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Budget {
    /// Unique budget ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Calendar month, 1 through 12
    pub month: i16,

    /// Calendar year, 2000 or later
    pub year: i32,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBudget {
    pub user_id: Uuid,
    pub month: i16,
    pub year: i32,
}

/// Input for updating an existing budget
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBudget {
    pub month: Option<i16>,
    pub year: Option<i32>,
}

impl Budget {
    /// Creates a new budget in the database
    pub async fn create(pool: &PgPool, data: CreateBudget) -> Result<Self, sqlx::Error> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, month, year)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, month, year, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.month)
        .bind(data.year)
        .fetch_one(pool)
        .await?;

        Ok(budget)
    }

    /// Finds a budget by ID
    ///
    /// Returns the budget if found, None otherwise.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, month, year, created_at
            FROM budgets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(budget)
    }

    /// Lists all budgets owned by a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, month, year, created_at
            FROM budgets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(budgets)
    }

    /// Returns just the IDs of every budget owned by a user
    ///
    /// Used to pre-filter child record listings to the caller's own budgets.
    pub async fn ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM budgets WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Updates an existing budget
    ///
    /// Only non-None fields in `data` will be updated. An empty update is a
    /// no-op that returns the current record.
    ///
    /// # Returns
    ///
    /// The updated budget if found, None if the budget doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBudget,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.month.is_some() {
            bind_count += 1;
            sets.push(format!("month = ${}", bind_count));
        }
        if data.year.is_some() {
            bind_count += 1;
            sets.push(format!("year = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE budgets SET ");
        query.push_str(&sets.join(", "));
        query.push_str(" WHERE id = $1 RETURNING id, user_id, month, year, created_at");

        let mut q = sqlx::query_as::<_, Budget>(&query).bind(id);

        if let Some(month) = data.month {
            q = q.bind(month);
        }
        if let Some(year) = data.year {
            q = q.bind(year);
        }

        let budget = q.fetch_optional(pool).await?;

        Ok(budget)
    }

    /// Deletes a budget by ID
    ///
    /// Child records are left in place; handlers are expected to treat child
    /// rows whose budget is gone as not found. Returns true if the budget was
    /// deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_budget_default() {
        let update = UpdateBudget::default();
        assert!(update.month.is_none());
        assert!(update.year.is_none());
    }

    #[test]
    fn test_budget_serializes_wire_fields() {
        let budget = Budget {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            month: 6,
            year: 2025,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["month"], 6);
        assert_eq!(json["year"], 2025);
        assert!(json.get("user_id").is_some());
    }
}
