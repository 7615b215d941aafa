/// Expense endpoints
///
/// Expense entries belong to a budget; every operation resolves the parent
/// budget and checks that the caller owns it before touching the record.
///
/// # Endpoints
///
/// - `GET /api/expenses` - List expenses across the caller's budgets
/// - `POST /api/expenses` - Create an expense entry
/// - `GET /api/expenses/:id` - Get an expense entry
/// - `PATCH /api/expenses/:id` - Update an expense entry
/// - `DELETE /api/expenses/:id` - Delete an expense entry
/// - `GET /api/expenses/budget/:budget_id` - List expenses for one budget

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
    validation,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use fiscus_shared::{
    auth::{extract::AuthContext, ownership},
    models::expense::{CreateExpense, Expense, PriorityLevel, UpdateExpense},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request
///
/// `paid` and `recurring` default to false when omitted; the parent field
/// is accepted as either `budget_id` or `budget`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Parent budget; caller must own it
    #[serde(alias = "budget")]
    pub budget_id: Uuid,

    /// What the expense is, e.g. "Rent"
    #[validate(custom(function = crate::validation::not_blank, message = "Name is required"))]
    pub name: String,

    /// Amount planned for this expense
    #[validate(range(min = 0.0, message = "Budgeted amount must be a positive number"))]
    pub budgeted_amount: f64,

    /// Amount actually spent, once known
    #[validate(range(min = 0.0, message = "Actual amount must be a positive number"))]
    pub actual_amount: Option<f64>,

    /// Optional priority ranking
    pub priority_level: Option<PriorityLevel>,

    /// When the expense is expected to be due
    pub expected_date: Option<DateTime<Utc>>,

    /// Whether the expense has been paid
    #[serde(default)]
    pub paid: bool,

    /// When it was paid
    pub paid_date: Option<DateTime<Utc>>,

    /// Whether the expense repeats every month
    #[serde(default)]
    pub recurring: bool,
}

/// Update request; absent fields stay unchanged, explicit `null` clears a
/// nullable field
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    #[validate(custom(function = crate::validation::not_blank, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Budgeted amount must be a positive number"))]
    pub budgeted_amount: Option<f64>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub actual_amount: Option<Option<f64>>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub priority_level: Option<Option<PriorityLevel>>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub expected_date: Option<Option<DateTime<Utc>>>,

    pub paid: Option<bool>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub paid_date: Option<Option<DateTime<Utc>>>,

    pub recurring: Option<bool>,
}

/// Lists expense entries across all budgets owned by the caller
pub async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Expense>>> {
    let budget_ids = ownership::owned_budget_ids(&state.db, &auth).await?;
    let expenses = Expense::list_by_budgets(&state.db, &budget_ids).await?;

    Ok(Json(expenses))
}

/// Creates an expense entry under a budget owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Parent budget belongs to someone else
/// - `404 Not Found`: Parent budget does not exist
pub async fn create_expense(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    validation::validate(&req)?;

    ownership::require_budget_owner(&state.db, &auth, req.budget_id).await?;

    let expense = Expense::create(
        &state.db,
        CreateExpense {
            budget_id: req.budget_id,
            name: req.name,
            budgeted_amount: req.budgeted_amount,
            actual_amount: req.actual_amount,
            priority_level: req.priority_level,
            expected_date: req.expected_date,
            paid: req.paid,
            paid_date: req.paid_date,
            recurring: req.recurring,
        },
    )
    .await?;

    tracing::info!(expense_id = %expense.id, budget_id = %expense.budget_id, "expense created");

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Gets a single expense entry by ID
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn get_expense(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Expense>> {
    let expense = Expense::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, expense.budget_id).await?;

    Ok(Json(expense))
}

/// Partially updates an expense entry
///
/// Absent fields stay unchanged. Explicit `null` clears `actual_amount`,
/// `priority_level`, `expected_date` or `paid_date`; explicit `false`
/// still applies to `paid` and `recurring`.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn update_expense(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateExpenseRequest>,
) -> ApiResult<Json<Expense>> {
    validation::validate(&req)?;

    let expense = Expense::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, expense.budget_id).await?;

    let updated = Expense::update(
        &state.db,
        id,
        UpdateExpense {
            name: req.name,
            budgeted_amount: req.budgeted_amount,
            actual_amount: req.actual_amount,
            priority_level: req.priority_level,
            expected_date: req.expected_date,
            paid: req.paid,
            paid_date: req.paid_date,
            recurring: req.recurring,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes an expense entry
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let expense = Expense::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, expense.budget_id).await?;

    let deleted = Expense::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Expense not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}

/// Lists expense entries for one budget
///
/// # Errors
///
/// - `403 Forbidden`: Budget belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn list_expenses_by_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Expense>>> {
    ownership::require_budget_owner(&state.db, &auth, budget_id).await?;

    let expenses = Expense::list_by_budget(&state.db, budget_id).await?;

    Ok(Json(expenses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_flags() {
        let req: CreateExpenseRequest = serde_json::from_str(
            r#"{
                "budget": "8f8c61f0-0a0b-4c59-9c7e-2f3a54a1b2c3",
                "name": "Rent",
                "budgeted_amount": 1000.0
            }"#,
        )
        .unwrap();

        assert!(!req.paid);
        assert!(!req.recurring);
        assert!(req.priority_level.is_none());
    }

    #[test]
    fn test_update_null_clears_priority() {
        let req: UpdateExpenseRequest =
            serde_json::from_str(r#"{"priority_level": null}"#).unwrap();

        assert_eq!(req.priority_level, Some(None));
        assert_eq!(req.actual_amount, None);
    }

    #[test]
    fn test_update_accepts_priority_value() {
        let req: UpdateExpenseRequest =
            serde_json::from_str(r#"{"priority_level": "High"}"#).unwrap();

        assert_eq!(req.priority_level, Some(Some(PriorityLevel::High)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = UpdateExpenseRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(validation::validate(&req).is_err());
    }
}
