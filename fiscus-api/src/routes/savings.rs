/// Saving endpoints
///
/// Saving entries belong to a budget; every operation resolves the parent
/// budget and checks that the caller owns it before touching the record.
///
/// # Endpoints
///
/// - `GET /api/savings` - List savings across the caller's budgets
/// - `POST /api/savings` - Create a saving entry
/// - `GET /api/savings/:id` - Get a saving entry
/// - `PATCH /api/savings/:id` - Update a saving entry
/// - `DELETE /api/savings/:id` - Delete a saving entry
/// - `GET /api/savings/budget/:budget_id` - List savings for one budget

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
    models::saving::{CreateSaving, Saving, UpdateSaving},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request
///
/// The parent field is accepted as either `budget_id` or `budget`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSavingRequest {
    /// Parent budget; caller must own it
    #[serde(alias = "budget")]
    pub budget_id: Uuid,

    /// Amount the user wants to put aside
    #[validate(range(min = 0.0, message = "Target amount must be a positive number"))]
    pub target_amount: f64,

    /// How the money is being saved
    #[validate(custom(function = crate::validation::not_blank, message = "Saving method is required"))]
    pub saving_method: String,

    /// Amount actually saved so far
    #[validate(range(min = 0.0, message = "Actual saved amount must be a positive number"))]
    pub actual_saved_amount: Option<f64>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Update request; absent fields stay unchanged, explicit `null` clears a
/// nullable field
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSavingRequest {
    #[validate(range(min = 0.0, message = "Target amount must be a positive number"))]
    pub target_amount: Option<f64>,

    #[validate(custom(function = crate::validation::not_blank, message = "Saving method cannot be empty"))]
    pub saving_method: Option<String>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub actual_saved_amount: Option<Option<f64>>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub notes: Option<Option<String>>,
}

/// Lists saving entries across all budgets owned by the caller
pub async fn list_savings(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Saving>>> {
    let budget_ids = ownership::owned_budget_ids(&state.db, &auth).await?;
    let savings = Saving::list_by_budgets(&state.db, &budget_ids).await?;

    Ok(Json(savings))
}

/// Creates a saving entry under a budget owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Parent budget belongs to someone else
/// - `404 Not Found`: Parent budget does not exist
pub async fn create_saving(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateSavingRequest>,
) -> ApiResult<(StatusCode, Json<Saving>)> {
    validation::validate(&req)?;

    ownership::require_budget_owner(&state.db, &auth, req.budget_id).await?;

    let saving = Saving::create(
        &state.db,
        CreateSaving {
            budget_id: req.budget_id,
            target_amount: req.target_amount,
            saving_method: req.saving_method,
            actual_saved_amount: req.actual_saved_amount,
            notes: req.notes,
        },
    )
    .await?;

    tracing::info!(saving_id = %saving.id, budget_id = %saving.budget_id, "saving created");

    Ok((StatusCode::CREATED, Json(saving)))
}

/// Gets a single saving entry by ID
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn get_saving(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Saving>> {
    let saving = Saving::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Saving not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, saving.budget_id).await?;

    Ok(Json(saving))
}

/// Partially updates a saving entry
///
/// Absent fields stay unchanged; explicit `null` clears
/// `actual_saved_amount` or `notes`.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn update_saving(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSavingRequest>,
) -> ApiResult<Json<Saving>> {
    validation::validate(&req)?;

    let saving = Saving::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Saving not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, saving.budget_id).await?;

    let updated = Saving::update(
        &state.db,
        id,
        UpdateSaving {
            target_amount: req.target_amount,
            saving_method: req.saving_method,
            actual_saved_amount: req.actual_saved_amount,
            notes: req.notes,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Saving not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a saving entry
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn delete_saving(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let saving = Saving::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Saving not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, saving.budget_id).await?;

    let deleted = Saving::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Saving not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Saving deleted".to_string(),
    }))
}

/// Lists saving entries for one budget
///
/// # Errors
///
/// - `403 Forbidden`: Budget belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn list_savings_by_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Saving>>> {
    ownership::require_budget_owner(&state.db, &auth, budget_id).await?;

    let savings = Saving::list_by_budget(&state.db, budget_id).await?;

    Ok(Json(savings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_budget_alias() {
        let req: CreateSavingRequest = serde_json::from_str(
            r#"{
                "budget": "8f8c61f0-0a0b-4c59-9c7e-2f3a54a1b2c3",
                "target_amount": 400.0,
                "saving_method": "Automatic transfer"
            }"#,
        )
        .unwrap();

        assert_eq!(req.target_amount, 400.0);
        assert!(req.notes.is_none());
    }

    #[test]
    fn test_update_null_clears_notes() {
        let req: UpdateSavingRequest = serde_json::from_str(r#"{"notes": null}"#).unwrap();

        assert_eq!(req.notes, Some(None));
        assert_eq!(req.actual_saved_amount, None);
    }

    #[test]
    fn test_negative_target_rejected() {
        let req = UpdateSavingRequest {
            target_amount: Some(-1.0),
            ..Default::default()
        };

        assert!(validation::validate(&req).is_err());
    }
}
