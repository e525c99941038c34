use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ServerConfig;

/// Todo list app for the 90's: an HTTP server and the client that talks to it.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientOptions,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct ClientOptions {
    /// Base url of the todo server
    #[arg(
        global = true,
        long,
        env = "TODO_SERVER",
        default_value = "http://localhost:8080"
    )]
    pub server: String,

    /// File holding the session token of the logged in user
    #[arg(global = true, long, env = "TODO_SESSION_FILE")]
    pub session_file: Option<PathBuf>,
}

impl ClientOptions {
    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("todo-cli-session"))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the backend server
    Serve(ServerConfig),

    /// Sign up a new user
    Signup {
        /// JSON with the uname and pass of the new user
        #[arg(long)]
        data: String,
    },

    /// Log in as an existing user
    Login {
        /// JSON with the uname and pass of an existing user
        #[arg(long)]
        data: String,
    },

    /// Log out the current user
    Logout,

    /// Create a todo
    Create {
        /// JSON with the text of the todo
        #[arg(long)]
        data: String,
    },

    /// Get one todo by id, or `all` of them
    Get {
        /// Id of the todo to get
        #[arg(long)]
        id: Option<i64>,

        /// Pass `all` to list every todo of the current user
        #[arg(value_parser = ["all"])]
        all: Option<String>,
    },

    /// Update a todo with id and data
    Update {
        /// Id of the todo to update
        #[arg(long)]
        id: i64,

        /// JSON with the new text of the todo
        #[arg(long)]
        data: String,
    },

    /// Delete a todo
    Delete {
        /// Id of the todo to delete
        #[arg(long)]
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_todo_commands() {
        let cli = Cli::parse_from(["todo", "update", "--id", "3", "--data", r#"{"text":"yo"}"#]);
        match cli.command {
            Commands::Update { id, data } => {
                assert_eq!(id, 3);
                assert_eq!(data, r#"{"text":"yo"}"#);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["todo", "get", "all"]);
        assert!(matches!(cli.command, Commands::Get { id: None, all: Some(_) }));
    }

    #[test]
    fn rejects_unknown_get_argument() {
        assert!(Cli::try_parse_from(["todo", "get", "everything"]).is_err());
    }

    #[test]
    fn serve_takes_server_flags() {
        let cli = Cli::parse_from(["todo", "serve", "--port", "9000"]);
        match cli.command {
            Commands::Serve(config) => assert_eq!(config.port, 9000),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
