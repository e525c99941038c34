use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    error::AppError,
    model::{CurrentUser, LoginResponse, Todo, UserProfile},
    schema::{CreateTodoSchema, CredentialsSchema, UpdateTodoSchema, Validate},
    token::SessionToken,
    AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Multi-user todo API with Rust, SQLX, SQLite, and Axum";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

// Handler for getting all Todo items of the current user
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let todos = data.store.list_todos(user.id).await?;
    tracing::debug!(user_id = user.id, count = todos.len(), "listed todos");
    Ok(Json(todos))
}

// Handler for creating a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = CreateTodoSchema::from_json(&body)?;
    let todo = data.store.create_todo(&body.text, user.id).await?;
    tracing::info!(user_id = user.id, todo_id = todo.id, "created todo");
    Ok((StatusCode::OK, Json(todo)))
}

// Handler for getting a specific Todo by ID
pub async fn get_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let todo = find_owned_todo(&data, user, id).await?;
    Ok(Json(todo))
}

// Handler for updating the text of a Todo by ID
pub async fn update_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = UpdateTodoSchema::from_json(&body)?;
    let mut todo = find_owned_todo(&data, user, id).await?;

    todo.text = body.text;
    let rows_affected = data.store.save_todo(&todo).await?;
    expect_one_row("update", todo.id, rows_affected)?;

    tracing::info!(user_id = user.id, todo_id = todo.id, "updated todo");
    Ok(Json(todo))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let todo = find_owned_todo(&data, user, id).await?;

    let rows_affected = data.store.delete_todo(&todo).await?;
    expect_one_row("delete", todo.id, rows_affected)?;

    tracing::info!(user_id = user.id, todo_id = todo.id, "deleted todo");
    Ok((StatusCode::OK, format!("Successfully deleted id {}", todo.id)))
}

/// Every single-todo lookup goes through here so that ownership is always part
/// of the query. A path that is not a number cannot name a todo either.
async fn find_owned_todo(
    data: &AppState,
    user: CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Todo, AppError> {
    let Path(id) = id.map_err(|_| AppError::NotFound)?;
    data.store
        .find_todo(id, user.id)
        .await?
        .ok_or(AppError::NotFound)
}

/// The todo was found a moment ago; a write that does not land on exactly
/// that row means it changed underneath the request.
fn expect_one_row(op: &str, todo_id: i64, rows_affected: u64) -> Result<(), AppError> {
    if rows_affected != 1 {
        return Err(AppError::Internal(format!(
            "{op} of todo {todo_id} touched {rows_affected} rows"
        )));
    }
    Ok(())
}

// Handler for signing up a new user
pub async fn create_user(
    State(data): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = CredentialsSchema::from_json(&body)?;
    let user = data.store.create_user(&body.uname, &body.pass).await?;
    tracing::info!(user_id = user.id, "created user");
    Ok((StatusCode::OK, Json(UserProfile::new(user, Vec::new()))))
}

// Handler for getting a user, and their todos, by ID
pub async fn get_user(
    State(data): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id.map_err(|_| AppError::NotFound)?;
    let user = data.store.find_user(id).await?.ok_or(AppError::NotFound)?;
    let todos = data.store.list_todos(user.id).await?;
    Ok(Json(UserProfile::new(user, todos)))
}

// Handler for getting a user, and their todos, by uname and pass
pub async fn get_user_by_credentials(
    State(data): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = CredentialsSchema::from_json(&body)?;
    let user = data
        .store
        .find_user_by_credentials(&body.uname, &body.pass)
        .await?
        .ok_or(AppError::NotFound)?;
    let todos = data.store.list_todos(user.id).await?;
    Ok(Json(UserProfile::new(user, todos)))
}

pub async fn login(
    State(data): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = CredentialsSchema::from_json(&body)?;
    let user = data
        .store
        .find_user_by_credentials(&body.uname, &body.pass)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let token = SessionToken::generate(&data.rng)?;
    data.store.create_session(&token, user.id).await?;
    tracing::info!(user_id = user.id, "user logged in");

    let todos = data.store.list_todos(user.id).await?;
    Ok(Json(LoginResponse {
        token: token.to_string(),
        user: UserProfile::new(user, todos),
    }))
}

pub async fn logout(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Extension(token): Extension<SessionToken>,
) -> Result<impl IntoResponse, AppError> {
    data.store.delete_session(&token).await?;
    tracing::info!(user_id = user.id, "user logged out");
    Ok((StatusCode::OK, "Successfully logged out"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, error::ERR_INTERNAL};

    async fn state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_url = format!("sqlite://{}", dir.path().join("todo.db").display());
        let pool = db::connect(&db_url, 4).await.unwrap();
        (Arc::new(AppState::new(pool)), dir)
    }

    #[test]
    fn row_count_other_than_one_is_internal() {
        assert!(expect_one_row("delete", 4, 1).is_ok());

        for rows in [0, 2] {
            let err = expect_one_row("delete", 4, rows).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.public_message(), ERR_INTERNAL);
        }
    }

    #[tokio::test]
    async fn stale_todo_write_is_internal_error() {
        let (data, _dir) = state().await;
        let user = data.store.create_user("adnan", "badshah").await.unwrap();
        let todo = data.store.create_todo("Hello World", user.id).await.unwrap();

        // removed between the lookup and the write of another request
        data.store.delete_todo(&todo).await.unwrap();
        let rows = data.store.delete_todo(&todo).await.unwrap();
        let err = expect_one_row("delete", todo.id, rows).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn body_without_content_type_is_accepted() {
        let (data, _dir) = state().await;
        let user = data.store.create_user("adnan", "badshah").await.unwrap();

        let res = create_todo(
            State(data.clone()),
            Extension(CurrentUser { id: user.id }),
            Bytes::from_static(br#"{"text":"Hello World"}"#),
        )
        .await
        .into_response();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(data.store.list_todos(user.id).await.unwrap().len(), 1);
    }
}
