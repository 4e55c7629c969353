use anyhow::Context;
use bookstore_api::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
};
use clap::Parser;

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var(
            "RUST_LOG",
            "server=info,bookstore_api=debug,tower_http=info,sqlx=warn",
        );
    }

    init_tracing()?;

    let cli_args = CliArgs::parse();

    tracing::info!(config_file = %cli_args.config_file, "Starting ...");

    let mut server_config = ServerConfig::from_config_file(&cli_args.config_file).await?;

    if let Some(api_key) = cli_args.api_key {
        tracing::info!("Using API key from the command line");

        server_config.api_key = api_key;
    }

    tracing::debug!(?server_config, "Loaded configuration");

    let server = Server::new(server_config);

    server.run().await?;

    Ok(())
}
