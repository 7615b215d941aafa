/// Ownership checks for user-scoped and budget-scoped resources
///
/// Every record in Fiscus is reachable from exactly one user: users own
/// budgets directly, and incomes, expenses and savings belong to a budget.
/// This module is the single place where "does this caller own that record"
/// is answered. Handlers call it before every read or write of user data.
///
/// Two checks cover the whole tree:
///
/// - [`require_self`]: the target is a user ID, the caller must be that user
/// - [`require_budget_owner`]: the target is a budget ID, the caller must own
///   the budget; child records are checked through their `budget_id`
///
/// A missing budget and a foreign budget are deliberately distinct outcomes:
/// a missing budget is "not found" while an existing budget owned by someone
/// else is "not authorized", whether reached directly or through a child.
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::extract::AuthContext;
use crate::models::budget::Budget;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// The budget being checked does not exist
    #[error("Budget not found")]
    BudgetMissing,

    /// The record exists but belongs to another user
    #[error("Not authorized")]
    NotOwner,

    /// The ownership lookup itself failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Requires that the caller is the user identified by `user_id`
///
/// Used for user-record operations and for budget creation, where the
/// payload's `user_id` must match the caller.
///
/// # Errors
///
/// Returns `OwnershipError::NotOwner` if the IDs differ
pub fn require_self(ctx: &AuthContext, user_id: Uuid) -> Result<(), OwnershipError> {
    if ctx.user_id == user_id {
        Ok(())
    } else {
        warn!(
            caller = %ctx.user_id,
            target = %user_id,
            "Rejected access to another user's records"
        );
        Err(OwnershipError::NotOwner)
    }
}

/// Requires that the caller owns the budget identified by `budget_id`
///
/// Resolves the budget and compares its `user_id` to the caller. Returns the
/// budget on success so handlers don't have to load it twice.
///
/// # Errors
///
/// - `OwnershipError::BudgetMissing` if no such budget exists
/// - `OwnershipError::NotOwner` if the budget belongs to another user
pub async fn require_budget_owner(
    pool: &PgPool,
    ctx: &AuthContext,
    budget_id: Uuid,
) -> Result<Budget, OwnershipError> {
    let budget = Budget::find_by_id(pool, budget_id).await?;

    let Some(budget) = budget else {
        debug!(budget_id = %budget_id, "Ownership check against missing budget");
        return Err(OwnershipError::BudgetMissing);
    };

    if budget.user_id != ctx.user_id {
        warn!(
            caller = %ctx.user_id,
            owner = %budget.user_id,
            budget_id = %budget_id,
            "Rejected access to another user's budget"
        );
        return Err(OwnershipError::NotOwner);
    }

    Ok(budget)
}

/// Returns the IDs of every budget the caller owns
///
/// Used to pre-filter "all my entries" listings so that foreign records are
/// never fetched in the first place. An empty result is normal for a fresh
/// account.
pub async fn owned_budget_ids(
    pool: &PgPool,
    ctx: &AuthContext,
) -> Result<Vec<Uuid>, OwnershipError> {
    let ids = Budget::ids_for_user(pool, ctx.user_id).await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: Uuid) -> AuthContext {
        AuthContext {
            user_id,
            email: "test@example.com".to_string(),
        }
    }

    #[test]
    fn test_require_self_accepts_own_id() {
        let user_id = Uuid::new_v4();
        assert!(require_self(&ctx(user_id), user_id).is_ok());
    }

    #[test]
    fn test_require_self_rejects_other_id() {
        let result = require_self(&ctx(Uuid::new_v4()), Uuid::new_v4());
        assert!(matches!(result, Err(OwnershipError::NotOwner)));
    }

    // require_budget_owner and owned_budget_ids hit the database; they are
    // covered by the API integration tests.
}
