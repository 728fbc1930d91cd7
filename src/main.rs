use donation_proxy::server::run_server;
use donation_proxy::utils::display::DisplayFormatter;
use donation_proxy::{Config, TransactionService};
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: donation_proxy [serve|list|balance]
  serve    - Run the HTTP proxy (default)
  list     - Print the contract's transactions
  balance  - Print the contract's ETH balance";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let command = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());

    match command.as_str() {
        "serve" => {
            info!("Starting donation proxy");
            run_server(config).await?;
        }
        "list" => {
            debug!("Fetching transactions for {}", config.contract_address);
            let service = TransactionService::from_config(&config)?;
            let served = service.get().await?;
            let display = DisplayFormatter::new();
            println!(
                "{}",
                display.format_transaction_list(
                    service.address(),
                    &served.records,
                    served.provenance
                )
            );
        }
        "balance" => {
            debug!("Fetching balance for {}", config.contract_address);
            let service = TransactionService::from_config(&config)?;
            let balance = service.contract_balance().await?;
            println!(
                "{}",
                DisplayFormatter::new().format_balance(service.address(), &balance)
            );
        }
        "help" | "-h" | "--help" => println!("{USAGE}"),
        other => {
            eprintln!("Unknown command: {other}\n{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    }

    info!("Shutting down");
    Ok(ExitCode::SUCCESS)
}
