//! Expense API endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use api_types::expense::{Expense, ExpenseNew, Split};
use engine::{ExpenseDraft, PercentShare, SplitPolicy};

use crate::{ServerError, server::ServerState};

fn expense_view(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        description: expense.description,
        amount: expense.amount,
        paid_by: expense.paid_by,
        split_type: expense.policy.as_str().to_string(),
        splits: expense
            .splits
            .into_iter()
            .map(|s| Split {
                user_id: s.user_id,
                share: s.share,
            })
            .collect(),
    }
}

/// Handle requests for adding an expense to a group
///
/// For `percentage` expenses every split `share` is read as a percentage.
pub async fn create(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<Expense>, ServerError> {
    let policy = SplitPolicy::try_from(payload.split_type.as_str())?;
    let draft = ExpenseDraft {
        description: payload.description,
        amount: payload.amount,
        paid_by: payload.paid_by,
        policy,
        splits: payload.splits.map(|splits| {
            splits
                .into_iter()
                .map(|s| PercentShare {
                    user_id: s.user_id,
                    percentage: s.share,
                })
                .collect()
        }),
    };

    let expense = state.engine.add_expense(group_id, draft).await?;
    tracing::info!(group_id, expense_id = expense.id, "expense added");
    Ok(Json(expense_view(expense)))
}

/// Handle requests for listing group expenses, newest first
pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let expenses = state.engine.list_expenses(group_id).await?;
    Ok(Json(expenses.into_iter().map(expense_view).collect()))
}
