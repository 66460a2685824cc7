use clap::Parser;
use filmes_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    filmes_api::telemetry::init(&std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()));

    let cli = Cli::parse();

    if let Err(e) = filmes_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
