//! Person endpoint handlers

use axum::extract::{Path, State};
use axum::{Form, Json};
use http::StatusCode;

use super::AppState;
use super::model::{Person, WebResponse};
use crate::error::ServiceError;

type PersonResponse = WebResponse<Person>;

pub async fn get_person(State(state): State<AppState>, Path(id): Path<String>) -> PersonResponse {
    tracing::info!("Looking up person {}", id);
    respond(state.repository.get(&id), || format!("person {id} not found"))
}

pub async fn save_person(State(state): State<AppState>, Json(person): Json<Person>) -> PersonResponse {
    tracing::info!("Saving person");
    respond(state.repository.save(person).map(Some), String::new)
}

pub async fn delete_person(State(state): State<AppState>, Path(id): Path<String>) -> PersonResponse {
    tracing::info!("Deleting person {}", id);
    respond(state.repository.delete(&id), || format!("person {id} not found"))
}

pub async fn update_person(State(state): State<AppState>, Form(person): Form<Person>) -> PersonResponse {
    tracing::info!("Updating person {}", person.id);
    let id = person.id.clone();
    respond(state.repository.update(person), || format!("person {id} not found"))
}

fn respond(
    outcome: Result<Option<Person>, ServiceError>,
    missing: impl FnOnce() -> String,
) -> PersonResponse {
    match outcome {
        Ok(result) => WebResponse::found_or(result, missing),
        Err(e) => {
            tracing::error!("Person request failed: {}", e);
            WebResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
