//! Go Marketplace CLI - inspect and edit the locally persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli show
//!
//! # Add one unit of a product
//! gm-cli add --id p1 --title "Shirt" --image-url https://cdn.example.com/shirt.png --price 10
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//! ```
//!
//! # Commands
//!
//! - `show` - List cart items and the total quantity
//! - `add` - Add a product (or one more unit of it)
//! - `increment` / `decrement` - Change an item's quantity by one
//!
//! Storage is configured through `CART_STORAGE_*` environment variables; see
//! [`go_marketplace_cart::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use go_marketplace_cart::CartConfig;
use go_marketplace_core::Price;

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "Go Marketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the items in the cart
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product display name
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(short = 'u', long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(short, long)]
        price: Price,
    },
    /// Increase an item's quantity by one
    Increment {
        /// Product ID
        id: String,
    },
    /// Decrease an item's quantity by one, removing it at zero
    Decrement {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,gm_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let store = config.open_store().await?;

    match cli.command {
        Commands::Show => commands::cart::show(&store),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&store, id, title, image_url, price).await?,
        Commands::Increment { id } => commands::cart::increment(&store, &id).await?,
        Commands::Decrement { id } => commands::cart::decrement(&store, &id).await?,
    }
    Ok(())
}
