//! User API endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use api_types::user::{User, UserNew};

use crate::{ServerError, server::ServerState};

fn user_view(user: engine::User) -> User {
    User {
        id: user.id,
        name: user.name,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<Json<User>, ServerError> {
    let user = state.engine.create_user(&payload.name).await?;
    Ok(Json(user_view(user)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<User>, ServerError> {
    let user = state.engine.user(user_id).await?;
    Ok(Json(user_view(user)))
}
