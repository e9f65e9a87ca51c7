//! Person CRUD demo service
//!
//! An axum router over a `PersonRepository`, served over one-way or mutual
//! TLS by `RunningServer`.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};

pub mod config;
pub mod handlers;
pub mod model;
pub mod repository;
pub mod server;
pub mod tls;

pub use config::{DEFAULT_BASE_PATH, ServiceConfig};
pub use model::{Person, WebResponse};
pub use repository::{InMemoryPersonRepository, PersonRepository};
pub use server::RunningServer;
pub use tls::{load_server_tls, server_tls_config};

/// State shared by the person handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PersonRepository>,
}

/// Person routes mounted under `base_path`
pub fn router(base_path: &str, repository: Arc<dyn PersonRepository>) -> Router {
    let routes = Router::new()
        .route("/save", post(handlers::save_person))
        .route("/update", put(handlers::update_person))
        .route(
            "/:id",
            get(handlers::get_person).delete(handlers::delete_person),
        );

    let base = base_path.trim_end_matches('/');
    let app = if base.is_empty() {
        routes
    } else if base.starts_with('/') {
        Router::new().nest(base, routes)
    } else {
        Router::new().nest(&format!("/{base}"), routes)
    };

    app.with_state(AppState { repository })
}
