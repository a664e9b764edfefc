use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))
        .route("/embed", post(handlers::embed))
        .route("/similarity", post(handlers::similarity))
}
