use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match dotenv {
        Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
        Err(_) => log::debug!(".env file not found, will rely on environment variables"),
    }

    cli::run(Cli::parse()).await
}
