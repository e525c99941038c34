use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};

/// Opens the SQLite database at `db_url`, creating the file and the tables on
/// first use.
pub async fn connect(db_url: &str, max_connections: u32) -> Result<Pool<Sqlite>, sqlx::Error> {
    // Check if the database exists, if not, create it
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", db_url);
        Sqlite::create_database(db_url).await?;
    } else {
        tracing::debug!("Database {} already exists", db_url);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await?;
    tracing::info!("Connection to the database is successful");

    create_tables(&pool).await?;
    Ok(pool)
}

async fn create_tables(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uname TEXT NOT NULL,
        pass TEXT NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        user_id INTEGER NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS todos_user_id ON todos (user_id);")
        .execute(pool)
        .await?;

    tracing::debug!("Created users, todos and sessions tables");
    Ok(())
}
