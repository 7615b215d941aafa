/// Budget endpoints
///
/// A budget is the ownership anchor for income, expense and saving entries.
/// All operations require a bearer token and only ever touch budgets owned
/// by the caller.
///
/// # Endpoints
///
/// - `GET /api/budgets` - List the caller's budgets
/// - `POST /api/budgets` - Create a budget
/// - `GET /api/budgets/:id` - Get a budget
/// - `PATCH /api/budgets/:id` - Update a budget
/// - `DELETE /api/budgets/:id` - Delete a budget
/// - `GET /api/budgets/user/:user_id` - List budgets for a user (self only)

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
use fiscus_shared::{
    auth::{extract::AuthContext, ownership},
    models::budget::{Budget, CreateBudget, UpdateBudget},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request
///
/// The owner field is accepted as either `user_id` or `user` to match
/// older clients.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBudgetRequest {
    /// Owning user; must be the caller
    #[serde(alias = "user")]
    pub user_id: Uuid,

    /// Calendar month
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i16,

    /// Calendar year
    #[validate(range(min = 2000, message = "Year must be 2000 or later"))]
    pub year: i32,
}

/// Update request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBudgetRequest {
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<i16>,

    #[validate(range(min = 2000, message = "Year must be 2000 or later"))]
    pub year: Option<i32>,
}

/// Lists the caller's budgets, newest first
pub async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = Budget::list_by_user(&state.db, auth.user_id).await?;

    Ok(Json(budgets))
}

/// Creates a budget owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: `user_id` in the payload is not the caller
pub async fn create_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateBudgetRequest>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    validation::validate(&req)?;

    // A budget can only be created for oneself
    ownership::require_self(&auth, req.user_id)?;

    let budget = Budget::create(
        &state.db,
        CreateBudget {
            user_id: req.user_id,
            month: req.month,
            year: req.year,
        },
    )
    .await?;

    tracing::info!(budget_id = %budget.id, user_id = %auth.user_id, "budget created");

    Ok((StatusCode::CREATED, Json(budget)))
}

/// Gets a single budget by ID
///
/// # Errors
///
/// - `403 Forbidden`: Budget exists but belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn get_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Budget>> {
    let budget = ownership::require_budget_owner(&state.db, &auth, id).await?;

    Ok(Json(budget))
}

/// Partially updates a budget
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Budget exists but belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn update_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBudgetRequest>,
) -> ApiResult<Json<Budget>> {
    validation::validate(&req)?;

    ownership::require_budget_owner(&state.db, &auth, id).await?;

    // A concurrent delete between the ownership check and here surfaces as
    // a plain not-found
    let updated = Budget::update(
        &state.db,
        id,
        UpdateBudget {
            month: req.month,
            year: req.year,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Budget not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a budget
///
/// Child income, expense and saving entries are not cascade-deleted;
/// orphaned children resolve as not-found through the ownership check.
///
/// # Errors
///
/// - `403 Forbidden`: Budget exists but belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    ownership::require_budget_owner(&state.db, &auth, id).await?;

    let deleted = Budget::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Budget not found".to_string()));
    }

    tracing::info!(budget_id = %id, user_id = %auth.user_id, "budget deleted");

    Ok(Json(MessageResponse {
        message: "Budget deleted".to_string(),
    }))
}

/// Lists budgets belonging to a user
///
/// Only the caller's own user ID is accepted; asking for anyone else's
/// budgets is rejected.
///
/// # Errors
///
/// - `403 Forbidden`: `user_id` is not the caller
pub async fn list_budgets_by_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Budget>>> {
    ownership::require_self(&auth, user_id)?;

    let budgets = Budget::list_by_user(&state.db, user_id).await?;

    Ok(Json(budgets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_user_alias() {
        let req: CreateBudgetRequest = serde_json::from_str(
            r#"{"user": "8f8c61f0-0a0b-4c59-9c7e-2f3a54a1b2c3", "month": 5, "year": 2024}"#,
        )
        .unwrap();

        assert_eq!(req.month, 5);
        assert_eq!(req.year, 2024);
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        let req = CreateBudgetRequest {
            user_id: Uuid::new_v4(),
            month: 13,
            year: 2024,
        };

        assert!(validation::validate(&req).is_err());
    }

    #[test]
    fn test_year_before_2000_rejected() {
        let req = UpdateBudgetRequest {
            month: None,
            year: Some(1999),
        };

        assert!(validation::validate(&req).is_err());
    }
}
