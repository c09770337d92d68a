use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, app, run_with_listener};

mod balances;
mod chat;
mod expenses;
mod groups;
mod server;
mod settlements;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{User, UserNew};
    }

    pub mod group {
        pub use api_types::group::{Group, GroupNew, GroupUpdate};
    }

    pub mod expense {
        pub use api_types::expense::{Expense, ExpenseNew, Split, SplitNew};
    }

    pub mod settlement {
        pub use api_types::settlement::{Settlement, SettlementNew};
    }

    pub mod chat {
        pub use api_types::chat::{ChatRequest, ChatResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_) | EngineError::SplitMembers { .. } => StatusCode::BAD_REQUEST,
        EngineError::InvalidPolicy(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
