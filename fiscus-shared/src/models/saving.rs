/// Saving model and database operations
///
/// Saving entries track money set aside within a budget month toward a
/// target, along with how it is being saved ("Automatic transfer", "Cash",
/// and so on).
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Saving entry belonging to a budget
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Saving {
    /// Unique saving ID (UUID v4)
    pub id: Uuid,

    /// Budget this entry belongs to
    pub budget_id: Uuid,

    /// Amount the user wants to put aside
    pub target_amount: f64,

    /// How the money is being saved
    pub saving_method: String,

    /// Amount actually saved so far
    pub actual_saved_amount: Option<f64>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Input for creating a new saving entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaving {
    pub budget_id: Uuid,
    pub target_amount: f64,
    pub saving_method: String,
    pub actual_saved_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Input for updating an existing saving entry
///
/// All fields are optional. Only non-None fields will be updated. For the
/// nullable columns, use Some(None) to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSaving {
    pub target_amount: Option<f64>,
    pub saving_method: Option<String>,
    pub actual_saved_amount: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}

impl Saving {
    /// Creates a new saving entry in the database
    pub async fn create(pool: &PgPool, data: CreateSaving) -> Result<Self, sqlx::Error> {
        let saving = sqlx::query_as::<_, Saving>(
            r#"
            INSERT INTO savings (budget_id, target_amount, saving_method,
                                 actual_saved_amount, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, budget_id, target_amount, saving_method, actual_saved_amount, notes
            "#,
        )
        .bind(data.budget_id)
        .bind(data.target_amount)
        .bind(data.saving_method)
        .bind(data.actual_saved_amount)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(saving)
    }

    /// Finds a saving entry by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let saving = sqlx::query_as::<_, Saving>(
            r#"
            SELECT id, budget_id, target_amount, saving_method, actual_saved_amount, notes
            FROM savings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(saving)
    }

    /// Lists saving entries for a single budget
    pub async fn list_by_budget(pool: &PgPool, budget_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let savings = sqlx::query_as::<_, Saving>(
            r#"
            SELECT id, budget_id, target_amount, saving_method, actual_saved_amount, notes
            FROM savings
            WHERE budget_id = $1
            ORDER BY id
            "#,
        )
        .bind(budget_id)
        .fetch_all(pool)
        .await?;

        Ok(savings)
    }

    /// Lists saving entries across a set of budgets
    pub async fn list_by_budgets(
        pool: &PgPool,
        budget_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let savings = sqlx::query_as::<_, Saving>(
            r#"
            SELECT id, budget_id, target_amount, saving_method, actual_saved_amount, notes
            FROM savings
            WHERE budget_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(budget_ids)
        .fetch_all(pool)
        .await?;

        Ok(savings)
    }

    /// Updates an existing saving entry
    ///
    /// Only non-None fields in `data` will be updated. An empty update is a
    /// no-op that returns the current record.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateSaving,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.target_amount.is_some() {
            bind_count += 1;
            sets.push(format!("target_amount = ${}", bind_count));
        }
        if data.saving_method.is_some() {
            bind_count += 1;
            sets.push(format!("saving_method = ${}", bind_count));
        }
        if data.actual_saved_amount.is_some() {
            bind_count += 1;
            sets.push(format!("actual_saved_amount = ${}", bind_count));
        }
        if data.notes.is_some() {
            bind_count += 1;
            sets.push(format!("notes = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE savings SET ");
        query.push_str(&sets.join(", "));
        query.push_str(
            " WHERE id = $1 RETURNING id, budget_id, target_amount, saving_method, \
             actual_saved_amount, notes",
        );

        let mut q = sqlx::query_as::<_, Saving>(&query).bind(id);

        if let Some(target_amount) = data.target_amount {
            q = q.bind(target_amount);
        }
        if let Some(saving_method) = data.saving_method {
            q = q.bind(saving_method);
        }
        if let Some(actual_saved_amount) = data.actual_saved_amount {
            q = q.bind(actual_saved_amount);
        }
        if let Some(notes) = data.notes {
            q = q.bind(notes);
        }

        let saving = q.fetch_optional(pool).await?;

        Ok(saving)
    }

    /// Deletes a saving entry by ID
    ///
    /// Returns true if the entry was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM savings WHERE id = $1")
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
    fn test_update_saving_default() {
        let update = UpdateSaving::default();
        assert!(update.target_amount.is_none());
        assert!(update.saving_method.is_none());
        assert!(update.actual_saved_amount.is_none());
        assert!(update.notes.is_none());
    }

    #[test]
    fn test_saving_serializes_nullable_fields() {
        let saving = Saving {
            id: Uuid::new_v4(),
            budget_id: Uuid::new_v4(),
            target_amount: 500.0,
            saving_method: "Automatic transfer".to_string(),
            actual_saved_amount: None,
            notes: Some("Vacation fund".to_string()),
        };

        let json = serde_json::to_value(&saving).unwrap();
        assert_eq!(json["target_amount"], 500.0);
        assert!(json["actual_saved_amount"].is_null());
        assert_eq!(json["notes"], "Vacation fund");
    }
}
