use clap::Parser;
use tracing_subscriber::EnvFilter;
use wschat::app::{self, AppError};
use wschat::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // Logs go to stderr so they never interleave with the chat log on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    app::run(config).await
}
