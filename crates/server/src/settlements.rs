//! Settlement API endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::settlement::{Settlement, SettlementNew};

use crate::{ServerError, server::ServerState};

fn settlement_view(settlement: engine::Settlement) -> Settlement {
    Settlement {
        id: settlement.id,
        from_user: settlement.from_user,
        to_user: settlement.to_user,
        amount: settlement.amount,
        paid_at: settlement.paid_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
    Json(payload): Json<SettlementNew>,
) -> Result<(StatusCode, Json<Settlement>), ServerError> {
    let settlement = state
        .engine
        .create_settlement(group_id, payload.from_user, payload.to_user, payload.amount)
        .await?;
    tracing::info!(group_id, settlement_id = settlement.id, "settlement recorded");
    Ok((StatusCode::CREATED, Json(settlement_view(settlement))))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
) -> Result<Json<Vec<Settlement>>, ServerError> {
    let settlements = state.engine.list_settlements(group_id).await?;
    Ok(Json(settlements.into_iter().map(settlement_view).collect()))
}
