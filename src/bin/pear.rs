use clap::Parser;
use pearmonie_client::cli::utils::output_error;
use pearmonie_client::cli::{Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let default_filter = if pearmonie_client::is_development!() { "pearmonie_client=info,warn" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = pearmonie_client::cli::run(cli).await {
        match (std::env::var("CLI_VERBOSE").as_deref(), output_format) {
            (Ok("true") | Ok("1"), OutputFormat::Text) => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
