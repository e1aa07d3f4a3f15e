mod config;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use quill_api::auth::{AppState, AppStateInner};
use quill_db::Database;

use crate::config::Config;

const DEFAULT_LOG_FILTER: &str = "quill_server=debug,quill_api=debug,quill_db=info,tower_http=debug";

#[derive(Debug, Parser)]
#[command(name = "quill", about = "Multi-user blogging backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Drop and recreate every table. Destroys all data.
    Initdb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Initdb => initdb(),
    }
}

fn initdb() -> anyhow::Result<()> {
    let db = Database::open(&Config::db_path_from_env())?;
    db.init_db()?;
    println!("Initialized the blog database.");
    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let addr = config.addr()?;

    let db = Database::open(&config.db_path)?;
    let state: AppState = Arc::new(AppStateInner {
        db,
        session_secret: config.session_secret,
    });

    let app = quill_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Quill server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_names_this_crate() {
        let target = env!("CARGO_CRATE_NAME");
        assert!(
            DEFAULT_LOG_FILTER
                .split(',')
                .any(|directive| directive.starts_with(&format!("{target}="))),
            "{DEFAULT_LOG_FILTER} has no directive for {target}"
        );
    }
}
