/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login and profile management
/// - `budgets`: Monthly budget containers
/// - `incomes`: Income entries within a budget
/// - `expenses`: Expense entries within a budget
/// - `savings`: Saving entries within a budget

use serde::{Deserialize, Serialize};

pub mod budgets;
pub mod expenses;
pub mod health;
pub mod incomes;
pub mod savings;
pub mod users;

/// Acknowledgment body returned by delete operations
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}
