pub mod apps;
pub mod auth;
pub mod categories;
pub mod experts;
pub mod extract;
pub mod health;

use crate::db::Repository;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/ccs/app/get-all-apps", get(apps::get_all_apps))
        .route(
            "/api/ccs/category/get-all-categories",
            get(categories::get_all_categories),
        )
        .route("/api/ccs/expert/get-all-experts", get(experts::get_all_experts))
        .route("/api/ccs/expert/create", post(experts::create_expert))
        .route("/api/ccs/auth/sign-in", post(auth::sign_in))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
