//! The client half of the `todo` binary: one HTTP request per command, with
//! the response printed to stdout.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use reqwest::{header::CONTENT_TYPE, Method, StatusCode};
use serde::Deserialize;

use crate::cli::{ClientOptions, Commands};

/// The one local slot holding the token of whoever logged in last.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> anyhow::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    pub fn write(&self, token: &str) -> anyhow::Result<()> {
        std::fs::write(&self.path, token)
            .with_context(|| format!("writing {}", self.path.display()))
    }

    pub fn remove(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

#[derive(Deserialize)]
struct LoginReply {
    token: String,
}

pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionFile,
}

impl TodoClient {
    pub fn new(options: &ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: options.server.trim_end_matches('/').to_string(),
            session: SessionFile::new(options.session_file()),
        }
    }

    /// Sends one request and returns the status and raw body. The stored
    /// session token, if any, goes along as a bearer credential.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        data: Option<&str>,
    ) -> anyhow::Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.session.read()? {
            request = request.bearer_auth(token);
        }
        if let Some(data) = data {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(data.to_string());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("could not reach {url}"))?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} answered {}", url, status);
        Ok((status, body))
    }

    async fn print(&self, method: Method, path: &str, data: Option<&str>) -> anyhow::Result<()> {
        let (_, body) = self.send(method, path, data).await?;
        println!("{}", render_body(&body));
        Ok(())
    }

    pub async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Serve(_) => bail!("serve is not a client command"),
            Commands::Signup { data } => self.print(Method::POST, "/users", Some(&data)).await,
            Commands::Login { data } => self.login(&data).await,
            Commands::Logout => self.logout().await,
            Commands::Create { data } => self.print(Method::POST, "/todos", Some(&data)).await,
            Commands::Get { id, all } => {
                let path = match (id, all) {
                    (Some(id), _) => format!("/todos/{id}"),
                    (None, Some(_)) => "/todos".to_string(),
                    (None, None) => bail!("missing argument or flag"),
                };
                self.print(Method::GET, &path, None).await
            }
            Commands::Update { id, data } => {
                self.print(Method::PUT, &format!("/todos/{id}"), Some(&data))
                    .await
            }
            Commands::Delete { id } => {
                self.print(Method::DELETE, &format!("/todos/{id}"), None)
                    .await
            }
        }
    }

    async fn login(&self, data: &str) -> anyhow::Result<()> {
        let (status, body) = self.send(Method::POST, "/sessions", Some(data)).await?;
        if status != StatusCode::OK {
            println!("{}", render_body(&body));
            return Ok(());
        }

        let reply: LoginReply =
            serde_json::from_str(&body).context("server sent an unreadable login reply")?;
        self.session.write(&reply.token)?;
        tracing::debug!("stored session in {}", self.session.path().display());
        println!("Successfully logged in");
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        if self.session.read()?.is_none() {
            println!("Not logged in");
            return Ok(());
        }

        let result = self.send(Method::DELETE, "/sessions/current", None).await;
        self.session.remove()?;
        let (_, body) = result?;
        println!("{}", render_body(&body));
        Ok(())
    }
}

/// Arrays print one element per line, other JSON prints pretty, anything that
/// is not JSON prints as it came.
pub fn render_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_arrays_line_by_line() {
        let body = r#"[{"id":1,"text":"a","user_id":1},{"id":2,"text":"b","user_id":1}]"#;
        let rendered = render_body(body);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""text":"a""#));
    }

    #[test]
    fn renders_plain_text_raw() {
        assert_eq!(render_body("invalid id"), "invalid id");
        assert_eq!(
            render_body("Successfully deleted id 4"),
            "Successfully deleted id 4"
        );
    }

    #[test]
    fn session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionFile::new(dir.path().join("session"));

        assert_eq!(session.read().unwrap(), None);
        session.write("abc\n").unwrap();
        assert_eq!(session.read().unwrap().as_deref(), Some("abc"));
        session.remove().unwrap();
        assert_eq!(session.read().unwrap(), None);
        session.remove().unwrap();
    }
}
