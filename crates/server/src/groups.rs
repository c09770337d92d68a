//! Group API endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::group::{Group, GroupNew, GroupUpdate};

use crate::{ServerError, server::ServerState};

fn group_view(group: engine::Group) -> Group {
    Group {
        id: group.id,
        name: group.name,
        user_ids: group.user_ids,
        total_expenses: group.total_expenses,
    }
}

/// Handle requests for creating a new group
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<Json<Group>, ServerError> {
    let group = state
        .engine
        .create_group(&payload.name, &payload.user_ids)
        .await?;
    tracing::info!(group_id = group.id, "group created");
    Ok(Json(group_view(group)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Group>>, ServerError> {
    let groups = state.engine.list_groups().await?;
    Ok(Json(groups.into_iter().map(group_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
) -> Result<Json<Group>, ServerError> {
    let group = state.engine.group(group_id).await?;
    Ok(Json(group_view(group)))
}

/// Rename a group and/or replace its members
pub async fn update(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<Group>, ServerError> {
    let group = state
        .engine
        .update_group(
            group_id,
            engine::GroupUpdate {
                name: payload.name,
                user_ids: payload.user_ids,
            },
        )
        .await?;
    Ok(Json(group_view(group)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(group_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_group(group_id).await?;
    tracing::info!(group_id, "group deleted");
    Ok(StatusCode::NO_CONTENT)
}
