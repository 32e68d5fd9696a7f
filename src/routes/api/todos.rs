use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::{dao::TodoChanges, entities::todo},
    error::AppError,
    services::{ServiceContext, todo_service::TodoService},
    state::AppState,
};

/// Body shared by create, update and upsert. Every field is optional and
/// `null` is treated like an absent field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoRequest {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: Option<i64>,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: Option<String>,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: Option<bool>,
}

impl TodoRequest {
    pub fn into_parts(self) -> (Option<i64>, TodoChanges) {
        let changes = TodoChanges {
            title: self.title,
            description: self.description,
            status: self.status,
        };
        (self.id, changes)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TodoResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: bool,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            created: model.created,
            modified: model.modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

type PathId = Result<Path<i64>, PathRejection>;
type Body = Result<Json<TodoRequest>, JsonRejection>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todo", post(create_todo))
        .route("/todos", get(list_todos))
        .route(
            "/todos/{id}",
            get(get_todo)
                .put(upsert_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = todo_service(&state).list().await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    id: PathId,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(id)?;
    let todo = todo_service(&state).get(id).await?;
    Ok(Json(todo.into()))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let (id, changes) = parse_body(body)?.into_parts();
    let id = todo_service(&state).create(id, changes).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn upsert_todo(
    State(state): State<Arc<AppState>>,
    id: PathId,
    body: Body,
) -> Result<Json<IdResponse>, AppError> {
    let id = parse_id(id)?;
    // the path id wins over a body ID
    let (_, changes) = parse_body(body)?.into_parts();
    let id = todo_service(&state).upsert(id, changes).await?;
    Ok(Json(IdResponse { id }))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    id: PathId,
    body: Body,
) -> Result<Json<UpdatedResponse>, AppError> {
    let id = parse_id(id)?;
    let (_, changes) = parse_body(body)?.into_parts();
    let updated = todo_service(&state).update(id, changes).await?;
    Ok(Json(UpdatedResponse { updated }))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: PathId,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id(id)?;
    let deleted = todo_service(&state).delete(id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

fn todo_service(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}

fn parse_id(id: PathId) -> Result<i64, AppError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "invalid todo id");
            Err(AppError::bad_request("Invalid todo id"))
        }
    }
}

fn parse_body(body: Body) -> Result<TodoRequest, AppError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(error = %message, "invalid todo body");
            Err(AppError::bad_request(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TodoRequest;

    #[test]
    fn absent_and_null_fields_are_not_supplied() {
        let request: TodoRequest =
            serde_json::from_str(r#"{"Title": "buy milk", "Status": null}"#).expect("valid body");
        let (id, changes) = request.into_parts();

        assert_eq!(id, None);
        assert_eq!(changes.title.as_deref(), Some("buy milk"));
        assert_eq!(changes.description, None);
        assert_eq!(changes.status, None);
    }

    #[test]
    fn empty_values_are_supplied() {
        let request: TodoRequest =
            serde_json::from_str(r#"{"ID": 7, "Description": "", "Status": false}"#)
                .expect("valid body");
        let (id, changes) = request.into_parts();

        assert_eq!(id, Some(7));
        assert_eq!(changes.description.as_deref(), Some(""));
        assert_eq!(changes.status, Some(false));
        assert!(!changes.is_empty());
    }

    #[test]
    fn lowercase_field_names_are_accepted() {
        let request: TodoRequest =
            serde_json::from_str(r#"{"title": "call mom", "status": true}"#).expect("valid body");
        let (_, changes) = request.into_parts();

        assert_eq!(changes.title.as_deref(), Some("call mom"));
        assert_eq!(changes.status, Some(true));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<TodoRequest>(r#"{"Priority": 1}"#);
        assert!(result.is_err());
    }
}
