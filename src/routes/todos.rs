use crate::{
    auth::CurrentAccount,
    error::AppError,
    models::{TodoInput, TodoStatus},
    todos::TodoService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists the caller's todos, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of todos.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[get("")]
pub async fn list_todos(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
) -> Result<impl Responder, AppError> {
    let list = todos.list(&account).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a new `pending` todo owned by the caller.
///
/// ## Request Body:
/// `{ "title": "..." }`, 1 to 200 characters.
///
/// ## Responses:
/// - `201 Created`: The created todo.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `422 Unprocessable Entity`: Title empty or too long.
#[post("")]
pub async fn create_todo(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
    payload: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = todos.add(&account, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(todo))
}

/// Fetches one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: The todo.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `404 Not Found`: No such todo, or it belongs to another account.
#[get("/{id}")]
pub async fn get_todo(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = todos.get(&account, todo_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Renames one of the caller's todos.
#[put("/{id}")]
pub async fn update_todo(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
    todo_id: web::Path<Uuid>,
    payload: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = todos
        .rename(&account, todo_id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Moves one of the caller's todos to `pending` or `completed`.
#[put("/{id}/status/{status}")]
pub async fn update_status(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
    path: web::Path<(Uuid, TodoStatus)>,
) -> Result<impl Responder, AppError> {
    let (id, status) = path.into_inner();
    let todo = todos.set_status(&account, id, status).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes one of the caller's todos.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `404 Not Found`: No such todo, or it belongs to another account.
#[delete("/{id}")]
pub async fn delete_todo(
    todos: web::Data<TodoService>,
    CurrentAccount(account): CurrentAccount,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    todos.delete(&account, todo_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
