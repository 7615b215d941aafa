/// Income model and database operations
///
/// Income entries record money expected or received within a budget month,
/// for example a salary or a freelance payment. The `kind` column is exposed
/// on the wire as `type` to match the public API shape.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Income entry belonging to a budget
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Income {
    /// Unique income ID (UUID v4)
    pub id: Uuid,

    /// Budget this entry belongs to
    pub budget_id: Uuid,

    /// Free-form income category, e.g. "Salary"
    #[serde(rename = "type")]
    pub kind: String,

    /// Amount of money
    pub amount: f64,

    /// Where the money comes from
    pub source: String,

    /// When the money is expected
    pub expected_date: Option<DateTime<Utc>>,

    /// When the money actually arrived
    pub received_date: Option<DateTime<Utc>>,
}

/// Input for creating a new income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIncome {
    pub budget_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub source: String,
    pub expected_date: Option<DateTime<Utc>>,
    pub received_date: Option<DateTime<Utc>>,
}

/// Input for updating an existing income entry
///
/// All fields are optional. Only non-None fields will be updated. For the
/// nullable date columns, use Some(None) to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIncome {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub expected_date: Option<Option<DateTime<Utc>>>,
    pub received_date: Option<Option<DateTime<Utc>>>,
}

impl Income {
    /// Creates a new income entry in the database
    pub async fn create(pool: &PgPool, data: CreateIncome) -> Result<Self, sqlx::Error> {
        let income = sqlx::query_as::<_, Income>(
            r#"
            INSERT INTO incomes (budget_id, kind, amount, source, expected_date, received_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, budget_id, kind, amount, source, expected_date, received_date
            "#,
        )
        .bind(data.budget_id)
        .bind(data.kind)
        .bind(data.amount)
        .bind(data.source)
        .bind(data.expected_date)
        .bind(data.received_date)
        .fetch_one(pool)
        .await?;

        Ok(income)
    }

    /// Finds an income entry by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let income = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, budget_id, kind, amount, source, expected_date, received_date
            FROM incomes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(income)
    }

    /// Lists income entries for a single budget
    pub async fn list_by_budget(pool: &PgPool, budget_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let incomes = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, budget_id, kind, amount, source, expected_date, received_date
            FROM incomes
            WHERE budget_id = $1
            ORDER BY id
            "#,
        )
        .bind(budget_id)
        .fetch_all(pool)
        .await?;

        Ok(incomes)
    }

    /// Lists income entries across a set of budgets
    ///
    /// Used for "all my incomes" listings, where the set is the caller's
    /// budget IDs. An empty set yields an empty result.
    pub async fn list_by_budgets(
        pool: &PgPool,
        budget_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let incomes = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, budget_id, kind, amount, source, expected_date, received_date
            FROM incomes
            WHERE budget_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(budget_ids)
        .fetch_all(pool)
        .await?;

        Ok(incomes)
    }

    /// Updates an existing income entry
    ///
    /// Only non-None fields in `data` will be updated. An empty update is a
    /// no-op that returns the current record.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateIncome,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.kind.is_some() {
            bind_count += 1;
            sets.push(format!("kind = ${}", bind_count));
        }
        if data.amount.is_some() {
            bind_count += 1;
            sets.push(format!("amount = ${}", bind_count));
        }
        if data.source.is_some() {
            bind_count += 1;
            sets.push(format!("source = ${}", bind_count));
        }
        if data.expected_date.is_some() {
            bind_count += 1;
            sets.push(format!("expected_date = ${}", bind_count));
        }
        if data.received_date.is_some() {
            bind_count += 1;
            sets.push(format!("received_date = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE incomes SET ");
        query.push_str(&sets.join(", "));
        query.push_str(
            " WHERE id = $1 RETURNING id, budget_id, kind, amount, source, expected_date, received_date",
        );

        let mut q = sqlx::query_as::<_, Income>(&query).bind(id);

        if let Some(kind) = data.kind {
            q = q.bind(kind);
        }
        if let Some(amount) = data.amount {
            q = q.bind(amount);
        }
        if let Some(source) = data.source {
            q = q.bind(source);
        }
        if let Some(expected_date) = data.expected_date {
            q = q.bind(expected_date);
        }
        if let Some(received_date) = data.received_date {
            q = q.bind(received_date);
        }

        let income = q.fetch_optional(pool).await?;

        Ok(income)
    }

    /// Deletes an income entry by ID
    ///
    /// Returns true if the entry was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1")
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
    fn test_income_kind_serializes_as_type() {
        let income = Income {
            id: Uuid::new_v4(),
            budget_id: Uuid::new_v4(),
            kind: "Salary".to_string(),
            amount: 4200.0,
            source: "Acme Corp".to_string(),
            expected_date: None,
            received_date: None,
        };

        let json = serde_json::to_value(&income).unwrap();
        assert_eq!(json["type"], "Salary");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_update_income_default() {
        let update = UpdateIncome::default();
        assert!(update.kind.is_none());
        assert!(update.amount.is_none());
        assert!(update.source.is_none());
        assert!(update.expected_date.is_none());
        assert!(update.received_date.is_none());
    }
}
