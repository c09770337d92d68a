use axum::{Json, extract::State};

use api_types::chat::{ChatRequest, ChatResponse};

use crate::{ServerError, server::ServerState};

pub async fn ask(
    State(state): State<ServerState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    if payload.query.trim().is_empty() {
        return Err(ServerError::Generic("query must not be empty".to_string()));
    }
    let answer = state.engine.chat(&payload.query, payload.user_id).await?;
    Ok(Json(ChatResponse { answer }))
}
