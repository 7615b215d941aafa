/// Expense model and database operations
///
/// Expense entries track planned versus actual spending within a budget,
/// with an optional priority and paid/recurring flags.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE priority_level AS ENUM ('High', 'Medium', 'Low');
///
/// CREATE TABLE expenses (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     budget_id UUID NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     budgeted_amount DOUBLE PRECISION NOT NULL,
///     actual_amount DOUBLE PRECISION,
///     priority_level priority_level,
///     expected_date TIMESTAMPTZ,
///     paid BOOLEAN NOT NULL DEFAULT FALSE,
///     paid_date TIMESTAMPTZ,
///     recurring BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// How urgent an expense is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "priority_level", rename_all = "PascalCase")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// Converts the priority to its wire/database label
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        }
    }
}

/// Expense entry belonging to a budget
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    /// Unique expense ID (UUID v4)
    pub id: Uuid,

    /// Budget this entry belongs to
    pub budget_id: Uuid,

    /// What the expense is, e.g. "Rent"
    pub name: String,

    /// Amount planned for this expense
    pub budgeted_amount: f64,

    /// Amount actually spent, once known
    pub actual_amount: Option<f64>,

    /// Optional priority ranking
    pub priority_level: Option<PriorityLevel>,

    /// When the expense is expected to be due
    pub expected_date: Option<DateTime<Utc>>,

    /// Whether the expense has been paid
    pub paid: bool,

    /// When it was paid
    pub paid_date: Option<DateTime<Utc>>,

    /// Whether the expense repeats every month
    pub recurring: bool,
}

/// Input for creating a new expense entry
///
/// `paid` and `recurring` default to false when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpense {
    pub budget_id: Uuid,
    pub name: String,
    pub budgeted_amount: f64,
    pub actual_amount: Option<f64>,
    pub priority_level: Option<PriorityLevel>,
    pub expected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring: bool,
}

/// Input for updating an existing expense entry
///
/// All fields are optional. Only non-None fields will be updated. For the
/// nullable columns, use Some(None) to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpense {
    pub name: Option<String>,
    pub budgeted_amount: Option<f64>,
    pub actual_amount: Option<Option<f64>>,
    pub priority_level: Option<Option<PriorityLevel>>,
    pub expected_date: Option<Option<DateTime<Utc>>>,
    pub paid: Option<bool>,
    pub paid_date: Option<Option<DateTime<Utc>>>,
    pub recurring: Option<bool>,
}

impl Expense {
    /// Creates a new expense entry in the database
    pub async fn create(pool: &PgPool, data: CreateExpense) -> Result<Self, sqlx::Error> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (budget_id, name, budgeted_amount, actual_amount,
                                  priority_level, expected_date, paid, paid_date, recurring)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, budget_id, name, budgeted_amount, actual_amount,
                      priority_level, expected_date, paid, paid_date, recurring
            "#,
        )
        .bind(data.budget_id)
        .bind(data.name)
        .bind(data.budgeted_amount)
        .bind(data.actual_amount)
        .bind(data.priority_level)
        .bind(data.expected_date)
        .bind(data.paid)
        .bind(data.paid_date)
        .bind(data.recurring)
        .fetch_one(pool)
        .await?;

        Ok(expense)
    }

    /// Finds an expense entry by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, budget_id, name, budgeted_amount, actual_amount,
                   priority_level, expected_date, paid, paid_date, recurring
            FROM expenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(expense)
    }

    /// Lists expense entries for a single budget
    pub async fn list_by_budget(pool: &PgPool, budget_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, budget_id, name, budgeted_amount, actual_amount,
                   priority_level, expected_date, paid, paid_date, recurring
            FROM expenses
            WHERE budget_id = $1
            ORDER BY id
            "#,
        )
        .bind(budget_id)
        .fetch_all(pool)
        .await?;

        Ok(expenses)
    }

    /// Lists expense entries across a set of budgets
    pub async fn list_by_budgets(
        pool: &PgPool,
        budget_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, budget_id, name, budgeted_amount, actual_amount,
                   priority_level, expected_date, paid, paid_date, recurring
            FROM expenses
            WHERE budget_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(budget_ids)
        .fetch_all(pool)
        .await?;

        Ok(expenses)
    }

    /// Updates an existing expense entry
    ///
    /// Only non-None fields in `data` will be updated. An empty update is a
    /// no-op that returns the current record.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateExpense,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            sets.push(format!("name = ${}", bind_count));
        }
        if data.budgeted_amount.is_some() {
            bind_count += 1;
            sets.push(format!("budgeted_amount = ${}", bind_count));
        }
        if data.actual_amount.is_some() {
            bind_count += 1;
            sets.push(format!("actual_amount = ${}", bind_count));
        }
        if data.priority_level.is_some() {
            bind_count += 1;
            sets.push(format!("priority_level = ${}", bind_count));
        }
        if data.expected_date.is_some() {
            bind_count += 1;
            sets.push(format!("expected_date = ${}", bind_count));
        }
        if data.paid.is_some() {
            bind_count += 1;
            sets.push(format!("paid = ${}", bind_count));
        }
        if data.paid_date.is_some() {
            bind_count += 1;
            sets.push(format!("paid_date = ${}", bind_count));
        }
        if data.recurring.is_some() {
            bind_count += 1;
            sets.push(format!("recurring = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE expenses SET ");
        query.push_str(&sets.join(", "));
        query.push_str(
            " WHERE id = $1 RETURNING id, budget_id, name, budgeted_amount, actual_amount, \
             priority_level, expected_date, paid, paid_date, recurring",
        );

        let mut q = sqlx::query_as::<_, Expense>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(budgeted_amount) = data.budgeted_amount {
            q = q.bind(budgeted_amount);
        }
        if let Some(actual_amount) = data.actual_amount {
            q = q.bind(actual_amount);
        }
        if let Some(priority_level) = data.priority_level {
            q = q.bind(priority_level);
        }
        if let Some(expected_date) = data.expected_date {
            q = q.bind(expected_date);
        }
        if let Some(paid) = data.paid {
            q = q.bind(paid);
        }
        if let Some(paid_date) = data.paid_date {
            q = q.bind(paid_date);
        }
        if let Some(recurring) = data.recurring {
            q = q.bind(recurring);
        }

        let expense = q.fetch_optional(pool).await?;

        Ok(expense)
    }

    /// Deletes an expense entry by ID
    ///
    /// Returns true if the entry was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
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
    fn test_priority_level_as_str() {
        assert_eq!(PriorityLevel::High.as_str(), "High");
        assert_eq!(PriorityLevel::Medium.as_str(), "Medium");
        assert_eq!(PriorityLevel::Low.as_str(), "Low");
    }

    #[test]
    fn test_priority_level_serde_round_trip() {
        let json = serde_json::to_string(&PriorityLevel::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");

        let parsed: PriorityLevel = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(parsed, PriorityLevel::Low);
    }

    #[test]
    fn test_create_expense_defaults_flags() {
        let json = r#"{
            "budget_id": "7f8d1a4e-9f63-4f8e-8f33-0d9e2b1a5c77",
            "name": "Rent",
            "budgeted_amount": 1200.0
        }"#;

        let create: CreateExpense = serde_json::from_str(json).unwrap();
        assert!(!create.paid);
        assert!(!create.recurring);
        assert!(create.actual_amount.is_none());
        assert!(create.priority_level.is_none());
    }
}
