//! storecart CLI - a terminal storefront over a persistent cart.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! storecart catalog
//!
//! # Add product 1 twice, then set product 1 to five units
//! storecart add 1
//! storecart add 1
//! storecart set 1 5
//!
//! # Show the cart (or as JSON)
//! storecart show
//! storecart show --json
//! ```
//!
//! The cart lives under `STORECART_DATA_DIR` (see `storecart_infra::config`)
//! and survives between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use storecart_core::ProductId;
use storecart_events::UiSignal;
use storecart_infra::{CartChange, CartConfig, CartStore};
use storecart_observability::LogFormat;
use storecart_products::{Catalog, Category};

mod view;

#[derive(Parser)]
#[command(name = "storecart")]
#[command(author, version, about = "Storefront shopping cart")]
struct Cli {
    /// Directory holding the persisted cart (overrides STORECART_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage key of the cart (overrides STORECART_STORAGE_KEY)
    #[arg(long, global = true)]
    key: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Compact)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products available to add
    Catalog {
        /// Only show one department
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product from the cart
    Remove { id: ProductId },
    /// Set a product's quantity (zero or less removes it)
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show the cart
    Show {
        /// Print the persisted JSON shape instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Empty the cart
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Json,
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Electronics,
    Fashion,
    Food,
    Handicraft,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Electronics => Category::Electronics,
            CategoryArg::Fashion => Category::Fashion,
            CategoryArg::Food => Category::Food,
            CategoryArg::Handicraft => Category::Handicraft,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    storecart_observability::init_with(cli.log_format.into());

    let mut config = CartConfig::from_env().context("invalid storecart configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), key = %config.storage_key, "configured");

    let catalog = Catalog::storefront();

    if let Commands::Catalog { category } = cli.command {
        match category {
            Some(category) => print!("{}", view::catalog(catalog.by_category(category.into()))),
            None => print!("{}", view::catalog(catalog.iter())),
        }
        return Ok(());
    }

    let mut store = config.open_store();
    attach_renderer(&mut store);

    match cli.command {
        Commands::Catalog { .. } => {}
        Commands::Add { id } => {
            let product = catalog.get(id)?;
            store.add_product(product);
        }
        Commands::Remove { id } => {
            store.remove_item(id);
        }
        Commands::Set { id, quantity } => {
            if store.update_quantity(id, quantity).is_empty() {
                println!("Product {id} is not in the cart.");
            }
        }
        Commands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.items())?);
            } else {
                print!("{}", view::cart(store.items(), store.total()));
                println!("{}", view::badge(store.badge()));
            }
        }
        Commands::Clear => {
            store.clear();
        }
    }

    Ok(())
}

/// Print notifications and redraw the cart whenever the store asks for it.
fn attach_renderer<K>(store: &mut CartStore<K>) {
    store.subscribe(|change: &CartChange| {
        for signal in &change.signals {
            match signal {
                UiSignal::Notify(notification) => println!("{}", view::notification(notification)),
                UiSignal::RefreshView => {
                    println!("{}", view::badge(change.badge));
                    println!("total {:.2}", change.total);
                }
            }
        }
    });
}
