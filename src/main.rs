use clap::Parser;
use todo_cli::{
    cli::{Cli, Commands},
    client::TodoClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("todo_cli=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("todo_cli=info,tower_http=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(config) => todo_cli::serve(config).await,
        command => TodoClient::new(&cli.client).run(command).await,
    }
}
