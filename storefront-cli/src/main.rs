//! Storefront CLI
//!
//! Command-line interface for the storefront pricing API.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use storefront_client::StorefrontClient;
use storefront_types::{CartLineItem, normalize_code};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront pricing API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the storefront API
    #[arg(
        long,
        env = "STOREFRONT_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange rate operations
    Rates {
        #[command(subcommand)]
        action: RatesCommands,
    },
    /// Convert a price into another currency
    Convert {
        /// Price in the base currency
        price: f64,
        /// Target currency code
        #[arg(long)]
        to: String,
        /// Base currency code (server default when omitted)
        #[arg(long)]
        from: Option<String>,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum RatesCommands {
    /// Show the rate set for a base currency
    Get {
        /// Base currency code (server default when omitted)
        #[arg(long)]
        base: Option<String>,
    },
    /// List every stored rate set
    List,
    /// Replace the rate set for a base currency
    Update {
        /// Base currency code (server default when omitted)
        #[arg(long)]
        base: Option<String>,
        /// Rate as CODE=FACTOR; repeat for each currency
        #[arg(long = "rate", value_parser = parse_rate, required = true)]
        rates: Vec<(String, f64)>,
    },
}

#[derive(Subcommand)]
enum CartCommands {
    /// Price a cart read from a JSON file of line items
    Quote {
        /// Path to a JSON array of line items
        #[arg(long)]
        file: PathBuf,
        /// Display currency for converted totals
        #[arg(long)]
        currency: Option<String>,
    },
}

/// Parses `CODE=FACTOR`, e.g. `USD=0.012`.
fn parse_rate(s: &str) -> Result<(String, f64), String> {
    let (code, factor) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=FACTOR, got {:?}", s))?;
    let code = normalize_code(code).map_err(|e| e.to_string())?;
    let factor: f64 = factor
        .trim()
        .parse()
        .map_err(|_| format!("invalid factor for {}: {:?}", code, factor))?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(format!("factor for {} must be positive", code));
    }
    Ok((code, factor))
}

fn read_items(path: &Path) -> Result<Vec<CartLineItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid cart file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = StorefrontClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Rates { action } => match action {
            RatesCommands::Get { base } => {
                let rates = client.get_rates(base.as_deref()).await?;
                println!("{}", serde_json::to_string_pretty(&rates)?);
            }
            RatesCommands::List => {
                let sets = client.list_rates().await?;
                println!("{}", serde_json::to_string_pretty(&sets)?);
            }
            RatesCommands::Update { base, rates } => {
                let rates: BTreeMap<String, f64> = rates.into_iter().collect();
                let updated = client.update_rates(rates, base).await?;
                println!("{}", serde_json::to_string_pretty(&updated)?);
            }
        },

        Commands::Convert { price, to, from } => {
            let converted = client.convert_price(price, &to, from).await?;
            println!("{}", serde_json::to_string_pretty(&converted)?);
        }

        Commands::Cart { action } => match action {
            CartCommands::Quote { file, currency } => {
                let items = read_items(&file)?;
                let quote = client.cart_totals(items, currency).await?;
                println!("{}", serde_json::to_string_pretty(&quote)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("usd=0.012").unwrap(), ("USD".to_string(), 0.012));
        assert_eq!(parse_rate(" EUR = 0.011").unwrap(), ("EUR".to_string(), 0.011));
    }

    #[test]
    fn test_parse_rate_rejects_bad_input() {
        assert!(parse_rate("USD").is_err());
        assert!(parse_rate("USD=abc").is_err());
        assert!(parse_rate("USD=0").is_err());
        assert!(parse_rate("=0.5").is_err());
    }

    #[test]
    fn test_rates_update_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "storefront",
            "rates",
            "update",
            "--rate",
            "USD=0.013",
            "--rate",
            "EUR=0.012",
        ])
        .unwrap();

        match cli.command {
            Commands::Rates {
                action: RatesCommands::Update { base, rates },
            } => {
                assert!(base.is_none());
                assert_eq!(rates.len(), 2);
            }
            _ => panic!("expected rates update"),
        }
    }
}
