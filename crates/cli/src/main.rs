//! Uhsin CLI - operator tooling over the local store cache.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (mock login; creates the account on first use)
//! uhsin login -e admin@uhsinstore.com -n "Store Admin" --admin
//!
//! # Browse the catalog
//! uhsin catalog list --category audio --sort price-asc
//!
//! # Pull products and orders from the remote API once, or keep pulling
//! uhsin sync pull
//! uhsin sync watch
//!
//! # Admin views
//! uhsin orders --status processing
//! uhsin logs --limit 20
//! uhsin stats
//! uhsin describe -n "VoltDock 8-in-1" -c connectivity
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Manage the cached session
//! - `catalog` - List or reset the product catalog
//! - `sync` - Pull remote state into the cache
//! - `orders`, `logs`, `stats`, `describe` - Admin console views

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uhsin_core::{Category, OrderStatus};
use uhsin_store::SortOrder;

mod commands;

#[derive(Parser)]
#[command(name = "uhsin")]
#[command(author, version, about = "Uhsin storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, creating the account if it is not in the roster
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Display name (defaults to the email's local part)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Create the account with the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Sign out and clear the session token
    Logout,
    /// Browse or reset the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Pull remote state into the cache
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
    /// List orders (admin)
    Orders {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show the admin audit log (admin)
    Logs {
        /// Number of entries to show, newest first
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Show dashboard numbers (admin)
    Stats,
    /// Generate a product description (admin)
    Describe {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product category
        #[arg(short, long)]
        category: Category,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        #[arg(short, long)]
        category: Option<Category>,

        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// featured, price-asc, price-desc or rating
        #[arg(long, default_value = "featured")]
        sort: SortOrder,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// Hide products with no stock
        #[arg(long)]
        in_stock: bool,
    },
    /// Discard the cached catalog and reseed the starter products
    Reset,
}

#[derive(Subcommand)]
enum SyncAction {
    /// Pull products and orders once
    Pull,
    /// Keep pulling at the configured interval until interrupted
    Watch,
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let context = match commands::Context::load() {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = context.init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "uhsin_cli=info,uhsin_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, context).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, context: commands::Context) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, name, admin } => {
            commands::session::login(&context, &email, &name, admin)?;
        }
        Commands::Logout => commands::session::logout(&context)?,
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
                min_price,
                max_price,
                in_stock,
            } => {
                let query = uhsin_store::ProductQuery {
                    category,
                    search,
                    min_price: min_price.map(uhsin_core::Price::new),
                    max_price: max_price.map(uhsin_core::Price::new),
                    in_stock_only: in_stock,
                    sort,
                };
                commands::catalog::list(&context, &query)?;
            }
            CatalogAction::Reset => commands::catalog::reset(&context)?,
        },
        Commands::Sync { action } => match action {
            SyncAction::Pull => commands::sync::pull(&context).await?,
            SyncAction::Watch => commands::sync::watch(&context).await?,
        },
        Commands::Orders { status } => commands::admin::orders(&context, status)?,
        Commands::Logs { limit } => commands::admin::logs(&context, limit)?,
        Commands::Stats => commands::admin::stats(&context)?,
        Commands::Describe { name, category } => {
            commands::admin::describe(&context, &name, category).await?;
        }
    }
    Ok(())
}
