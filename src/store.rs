use sqlx::{query, query_as, query_scalar, Pool, Sqlite};

use crate::{
    model::{Todo, User},
    token::SessionToken,
};

type Result<T> = std::result::Result<T, sqlx::Error>;

/// Every query the service runs. Lookups return `None` for a missing row.
#[derive(Debug, Clone)]
pub struct Store {
    db: Pool<Sqlite>,
}

impl Store {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, uname: &str, pass: &str) -> Result<User> {
        // The insert only commits once the statement has run to completion.
        query_as::<_, User>(
            "INSERT INTO users (uname, pass) VALUES (?, ?) RETURNING id, uname, pass",
        )
        .bind(uname)
        .bind(pass)
        .fetch_all(&self.db)
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_user(&self, id: i64) -> Result<Option<User>> {
        query_as::<_, User>("SELECT id, uname, pass FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn find_user_by_credentials(&self, uname: &str, pass: &str) -> Result<Option<User>> {
        query_as::<_, User>(
            "SELECT id, uname, pass FROM users WHERE uname = ? AND pass = ? ORDER BY id LIMIT 1",
        )
        .bind(uname)
        .bind(pass)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn list_todos(&self, user_id: i64) -> Result<Vec<Todo>> {
        query_as::<_, Todo>("SELECT id, text, user_id FROM todos WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(&self.db)
            .await
    }

    pub async fn create_todo(&self, text: &str, user_id: i64) -> Result<Todo> {
        query_as::<_, Todo>(
            "INSERT INTO todos (text, user_id) VALUES (?, ?) RETURNING id, text, user_id",
        )
        .bind(text)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_todo(&self, id: i64, user_id: i64) -> Result<Option<Todo>> {
        query_as::<_, Todo>("SELECT id, text, user_id FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    /// Writes back the text of a todo previously loaded with [`Store::find_todo`].
    pub async fn save_todo(&self, todo: &Todo) -> Result<u64> {
        let rows_affected = query("UPDATE todos SET text = ? WHERE id = ? AND user_id = ?")
            .bind(&todo.text)
            .bind(todo.id)
            .bind(todo.user_id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(rows_affected)
    }

    pub async fn delete_todo(&self, todo: &Todo) -> Result<u64> {
        let rows_affected = query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(todo.id)
            .bind(todo.user_id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(rows_affected)
    }

    pub async fn create_session(&self, token: &SessionToken, user_id: i64) -> Result<()> {
        query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
            .bind(token.as_str())
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn session_user(&self, token: &SessionToken) -> Result<Option<i64>> {
        query_scalar::<_, i64>("SELECT user_id FROM sessions WHERE token = ?")
            .bind(token.as_str())
            .fetch_optional(&self.db)
            .await
    }

    pub async fn delete_session(&self, token: &SessionToken) -> Result<u64> {
        let rows_affected = query("DELETE FROM sessions WHERE token = ?")
            .bind(token.as_str())
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_url = format!("sqlite://{}", dir.path().join("todo.db").display());
        let pool = db::connect(&db_url, 4).await.unwrap();
        (Store::new(pool), dir)
    }

    #[tokio::test]
    async fn created_rows_are_visible_to_other_connections() {
        let (store, _dir) = store().await;
        for i in 0..50 {
            let uname = format!("user{i}");
            let user = store.create_user(&uname, "pass").await.unwrap();
            let found = store.find_user_by_credentials(&uname, "pass").await.unwrap();
            assert_eq!(found.map(|u| u.id), Some(user.id));

            let todo = store.create_todo("Hello World", user.id).await.unwrap();
            assert_eq!(store.find_todo(todo.id, user.id).await.unwrap(), Some(todo));
        }
    }

    #[tokio::test]
    async fn writes_to_a_vanished_todo_touch_no_rows() {
        let (store, _dir) = store().await;
        let user = store.create_user("adnan", "badshah").await.unwrap();
        let mut todo = store.create_todo("Hello World", user.id).await.unwrap();

        assert_eq!(store.delete_todo(&todo).await.unwrap(), 1);

        todo.text = "yo adnan".to_string();
        assert_eq!(store.save_todo(&todo).await.unwrap(), 0);
        assert_eq!(store.delete_todo(&todo).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn lookups_are_scoped_to_the_owner() {
        let (store, _dir) = store().await;
        let adnan = store.create_user("adnan", "badshah").await.unwrap();
        let other = store.create_user("test", "test").await.unwrap();
        let todo = store.create_todo("Hello World", adnan.id).await.unwrap();

        assert_eq!(store.find_todo(todo.id, other.id).await.unwrap(), None);
        assert!(store.list_todos(other.id).await.unwrap().is_empty());
    }
}
