//! Balance API endpoints
//!
//! Positive balances are owed to the user, negative ones are owed by them.

use axum::{
    Json,
    extract::{Path, State},
};

use engine::{Balances, BalancesByGroup};

use crate::{ServerError, server::ServerState};

/// Balances of the current members of a group, keyed by user id
pub async fn group(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
) -> Result<Json<Balances>, ServerError> {
    Ok(Json(state.engine.group_balances(group_id).await?))
}

/// Balances of a user, keyed by group id
pub async fn user(
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<BalancesByGroup>, ServerError> {
    Ok(Json(state.engine.user_balances(user_id).await?))
}
