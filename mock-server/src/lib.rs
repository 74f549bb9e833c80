use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub body: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub body: String,
    #[serde(default)]
    pub completed: bool,
}

/// Insertion-ordered store.
pub type Db = Arc<RwLock<Vec<Todo>>>;

type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/todos", get(list_todos))
        .route("/api/todos/create", post(create_todo))
        .route("/api/todos/update/{id}", patch(complete_todo))
        .route("/api/todos/delete/{id}", delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

fn parse_id(raw: &str) -> Result<Uuid, (StatusCode, Json<Value>)> {
    Uuid::parse_str(raw).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid ID"))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    Json(db.read().await.clone())
}

async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::warn!(%rejection, "unparseable create payload");
        error(StatusCode::BAD_REQUEST, "Failed to parse body")
    })?;
    if input.body.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Todo body is required"));
    }

    let mut todos = db.write().await;
    if todos.iter().any(|t| t.body == input.body) {
        return Err(error(
            StatusCode::CONFLICT,
            "Todo with the same body already exists",
        ));
    }
    let todo = Todo {
        id: Uuid::new_v4(),
        body: input.body,
        completed: input.completed,
    };
    todos.push(todo.clone());
    tracing::info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn complete_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Todo> {
    let id = parse_id(&id)?;
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Todo not found"))?;
    todo.completed = true;
    Ok((StatusCode::OK, Json(todo.clone())))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let mut todos = db.write().await;
    let idx = todos
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Todo not found"))?;
    todos.remove(idx);
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
