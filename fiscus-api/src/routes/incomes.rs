/// Income endpoints
///
/// Income entries belong to a budget; every operation resolves the parent
/// budget and checks that the caller owns it before touching the record.
///
/// # Endpoints
///
/// - `GET /api/incomes` - List incomes across the caller's budgets
/// - `POST /api/incomes` - Create an income entry
/// - `GET /api/incomes/:id` - Get an income entry
/// - `PATCH /api/incomes/:id` - Update an income entry
/// - `DELETE /api/incomes/:id` - Delete an income entry
/// - `GET /api/incomes/budget/:budget_id` - List incomes for one budget

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
    models::income::{CreateIncome, Income, UpdateIncome},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Create request
///
/// The parent field is accepted as either `budget_id` or `budget`; the
/// category field is `type` on the wire.
#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    /// Parent budget; caller must own it
    #[serde(alias = "budget")]
    pub budget_id: Uuid,

    /// Income category, e.g. "Salary"
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

/// Update request; absent fields stay unchanged, explicit `null` clears a
/// nullable date
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncomeRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub amount: Option<f64>,

    pub source: Option<String>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub expected_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub received_date: Option<Option<DateTime<Utc>>>,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

// Validate is written by hand for both income requests so violations
// report the wire name `type`; the derive would report the Rust field name.
impl Validate for CreateIncomeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.kind.trim().is_empty() {
            errors.add("type", field_error("not_blank", "Type is required"));
        }
        if self.source.trim().is_empty() {
            errors.add("source", field_error("not_blank", "Source is required"));
        }
        if self.amount < 0.0 {
            errors.add("amount", field_error("range", "Amount must be a positive number"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for UpdateIncomeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.kind.as_deref().is_some_and(|kind| kind.trim().is_empty()) {
            errors.add("type", field_error("not_blank", "Type cannot be empty"));
        }
        if self
            .source
            .as_deref()
            .is_some_and(|source| source.trim().is_empty())
        {
            errors.add("source", field_error("not_blank", "Source cannot be empty"));
        }
        if self.amount.is_some_and(|amount| amount < 0.0) {
            errors.add("amount", field_error("range", "Amount must be a positive number"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Lists income entries across all budgets owned by the caller
pub async fn list_incomes(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Income>>> {
    let budget_ids = ownership::owned_budget_ids(&state.db, &auth).await?;
    let incomes = Income::list_by_budgets(&state.db, &budget_ids).await?;

    Ok(Json(incomes))
}

/// Creates an income entry under a budget owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Parent budget belongs to someone else
/// - `404 Not Found`: Parent budget does not exist
pub async fn create_income(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateIncomeRequest>,
) -> ApiResult<(StatusCode, Json<Income>)> {
    validation::validate(&req)?;

    ownership::require_budget_owner(&state.db, &auth, req.budget_id).await?;

    let income = Income::create(
        &state.db,
        CreateIncome {
            budget_id: req.budget_id,
            kind: req.kind,
            amount: req.amount,
            source: req.source,
            expected_date: req.expected_date,
            received_date: req.received_date,
        },
    )
    .await?;

    tracing::info!(income_id = %income.id, budget_id = %income.budget_id, "income created");

    Ok((StatusCode::CREATED, Json(income)))
}

/// Gets a single income entry by ID
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn get_income(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Income>> {
    let income = Income::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, income.budget_id).await?;

    Ok(Json(income))
}

/// Partially updates an income entry
///
/// Absent fields stay unchanged; explicit `null` clears `expected_date`
/// or `received_date`.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn update_income(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIncomeRequest>,
) -> ApiResult<Json<Income>> {
    validation::validate(&req)?;

    let income = Income::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, income.budget_id).await?;

    let updated = Income::update(
        &state.db,
        id,
        UpdateIncome {
            kind: req.kind,
            amount: req.amount,
            source: req.source,
            expected_date: req.expected_date,
            received_date: req.received_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes an income entry
///
/// # Errors
///
/// - `403 Forbidden`: Entry exists under someone else's budget
/// - `404 Not Found`: No such entry, or its parent budget is gone
pub async fn delete_income(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let income = Income::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".to_string()))?;

    ownership::require_budget_owner(&state.db, &auth, income.budget_id).await?;

    let deleted = Income::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Income not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Income deleted".to_string(),
    }))
}

/// Lists income entries for one budget
///
/// # Errors
///
/// - `403 Forbidden`: Budget belongs to someone else
/// - `404 Not Found`: No such budget
pub async fn list_incomes_by_budget(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Income>>> {
    ownership::require_budget_owner(&state.db, &auth, budget_id).await?;

    let incomes = Income::list_by_budget(&state.db, budget_id).await?;

    Ok(Json(incomes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_shape() {
        let req: CreateIncomeRequest = serde_json::from_str(
            r#"{
                "budget": "8f8c61f0-0a0b-4c59-9c7e-2f3a54a1b2c3",
                "type": "Salary",
                "amount": 2500.0,
                "source": "Acme Corp"
            }"#,
        )
        .unwrap();

        assert_eq!(req.kind, "Salary");
        assert_eq!(req.source, "Acme Corp");
        assert!(req.expected_date.is_none());
    }

    #[test]
    fn test_blank_type_reported_under_wire_name() {
        let req = UpdateIncomeRequest {
            kind: Some("   ".to_string()),
            ..Default::default()
        };

        let err = validation::validate(&req).unwrap_err();
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "type");
                assert_eq!(details[0].message, "Type cannot be empty");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_update_null_clears_dates() {
        let req: UpdateIncomeRequest =
            serde_json::from_str(r#"{"expected_date": null}"#).unwrap();

        assert_eq!(req.expected_date, Some(None));
        assert_eq!(req.received_date, None);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let req = UpdateIncomeRequest {
            amount: Some(-5.0),
            ..Default::default()
        };

        assert!(validation::validate(&req).is_err());
    }
}
