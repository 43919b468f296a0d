use clap::Parser;
use tracing::info;

mod app;
mod cli;
mod config;
mod db;
mod discovery;
mod error;
mod models;
mod services;
mod summary;
mod text;
mod trending;

use app::App;
use cli::Cli;
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ai_news_agent=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let app = App::new(config).await?;

    let work = async {
        if cli.view {
            app.view_recent().await
        } else {
            app.run_discovery().await
        }
    };

    tokio::select! {
        result = work => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping");
            Ok(())
        }
    }
}
