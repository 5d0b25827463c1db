//! Receipt Desk CLI - order pages and receipts from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Second page of orders, 20 per page
//! rd-cli orders --page 2 --page-size 20
//!
//! # Same, but walk the GraphQL connection instead of REST
//! rd-cli --protocol graphql orders --page 2
//!
//! # Receipt for one order
//! rd-cli receipt 5123456789
//! ```
//!
//! # Commands
//!
//! - `orders` - Print one page of orders as JSON
//! - `receipt` - Print one order's receipt as JSON
//!
//! Configuration comes from the same environment variables as the service.
//! Logs go to stderr so stdout stays valid JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use receipt_desk_admin::config::Protocol;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "rd-cli")]
#[command(author, version, about = "Receipt Desk CLI tools")]
struct Cli {
    /// Override `SHOPIFY_PROTOCOL` (`rest` or `graphql`)
    #[arg(long, global = true)]
    protocol: Option<Protocol>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of orders
    Orders {
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Override `ORDERS_PAGE_SIZE`
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=250))]
        page_size: Option<u32>,
    },
    /// Print the receipt for one order
    Receipt {
        /// Order id (numeric or GID)
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "receipt_desk_admin=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = commands::load_config()?;
    if let Some(protocol) = cli.protocol {
        config.shopify.protocol = protocol;
    }

    match cli.command {
        Commands::Orders { page, page_size } => {
            if let Some(size) = page_size {
                commands::override_page_size(
                    &mut config.listing,
                    size,
                    commands::batch_size_pinned(),
                );
            }
            commands::orders::print_page(&config, page).await
        }
        Commands::Receipt { id } => commands::receipt::print_receipt(&config, &id).await,
    }
}
