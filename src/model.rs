use serde::Serialize;

// Data model representing a Todo item
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
}

// Data model representing a registered user, as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub uname: String,
    pub pass: String,
}

/// What the API returns for a user: never the password, always the owned todos.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub uname: String,
    pub todos: Vec<Todo>,
}

impl UserProfile {
    pub fn new(user: User, todos: Vec<Todo>) -> Self {
        Self {
            id: user.id,
            uname: user.uname,
            todos,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// The identity a todo request acts as, inserted by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}
