//! RocketShoes cart CLI - inspect and change a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! export CART_API_URL=http://localhost:3333
//!
//! rs-cart show
//! rs-cart show --json
//! rs-cart add 1
//! rs-cart set 1 3
//! rs-cart remove 1
//! ```
//!
//! # Commands
//!
//! - `show` - Print the stored cart
//! - `add` - Add one unit of a product (checked against stock)
//! - `set` - Set a product's amount (checked against stock)
//! - `remove` - Remove a product

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored cart
    Show {
        /// Print the raw JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Set {
        /// Product ID
        product_id: ProductId,

        /// New amount (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    // Defaults to info level for the cart crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rs_cart=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CommandError> {
    match cli.command {
        Commands::Show { json } => commands::cart::show(json)?,
        Commands::Add { product_id } => commands::cart::add(product_id).await?,
        Commands::Remove { product_id } => commands::cart::remove(product_id).await?,
        Commands::Set { product_id, amount } => {
            commands::cart::set(product_id, amount).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_negative_amount() {
        let cli = Cli::try_parse_from(["rs-cart", "set", "7", "-1"]).unwrap();
        match cli.command {
            Commands::Set { product_id, amount } => {
                assert_eq!(product_id, ProductId::new(7));
                assert_eq!(amount, -1);
            }
            _ => panic!("expected set command"),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["rs-cart", "add", "shoe"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
