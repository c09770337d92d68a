use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use std::{sync::Arc, time::Instant};

use crate::{balances, chat, expenses, groups, settlements, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Logs method, path, status and latency of every request.
async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%method, %path, %status, elapsed_ms, "request failed");
    } else {
        tracing::debug!(%method, %path, %status, elapsed_ms, "request served");
    }
    response
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", post(groups::create).get(groups::list))
        .route(
            "/groups/{group_id}",
            get(groups::get).patch(groups::update).delete(groups::delete),
        )
        .route(
            "/groups/{group_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route(
            "/groups/{group_id}/settlements",
            post(settlements::create).get(settlements::list),
        )
        .route("/groups/{group_id}/balances", get(balances::group))
        .route("/users", post(users::create))
        .route("/users/{user_id}", get(users::get))
        .route("/users/{user_id}/balances", get(balances::user))
        .route("/chat", post(chat::ask))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Builds the application router around `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
