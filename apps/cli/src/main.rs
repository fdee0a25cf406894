//! # comfy: Command-Line Storefront
//!
//! ## Usage
//!
//! ```bash
//! # Browse
//! comfy featured
//! comfy products --category Tables --order low --page 2
//! comfy product 3
//!
//! # Cart
//! comfy cart add 3 --color "#FF5733" --amount 2
//! comfy cart edit "3#FF5733" 1
//! comfy cart
//!
//! # Account and orders
//! comfy login test@test.com secret
//! comfy checkout --name "Anna" --address "1 Main St"
//! comfy orders --page 2
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()             RUST_LOG or "warn,comfy=info,sqlx=warn"  │
//! │  2. Cli::parse()                                                        │
//! │  3. database_path()            COMFY_DB_PATH or platform data dir       │
//! │  4. Database::new()            open + migrate                           │
//! │  5. HttpStoreApi::new()        ClientConfig::from_env()                 │
//! │  6. Storefront::restore()      cart, user, theme                        │
//! │  7. dispatch()                 the command, then Database::close()      │
//! │  8. on StoreError              log, login hint if needed, exit 1        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use comfy_client::{ClientConfig, HttpStoreApi, StoreError, StoreResult, Storefront};
use comfy_core::{Money, SortOrder, Theme};
use comfy_db::{Database, DbConfig};

mod commands;
mod console;

use console::ConsoleNotifier;

/// The storefront as the binary wires it.
pub type Shop = Storefront<HttpStoreApi, Database, ConsoleNotifier>;

#[derive(Debug, Parser)]
#[command(name = "comfy")]
#[command(author, version, about = "Comfy Store from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List featured products
    Featured,

    /// Browse the product catalogue
    Products {
        /// Title contains
        #[arg(long)]
        search: Option<String>,

        /// Category name ("all" for any)
        #[arg(long)]
        category: Option<String>,

        /// Company name ("all" for any)
        #[arg(long)]
        company: Option<String>,

        /// Sort order (a-z, z-a, high, low)
        #[arg(long)]
        order: Option<SortOrder>,

        /// Maximum price in cents
        #[arg(long)]
        price: Option<i64>,

        /// Free shipping only
        #[arg(long)]
        shipping: bool,

        /// Page to show (1-based)
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show one product
    Product {
        /// Product id
        id: u64,
    },

    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },

    /// Log in
    Login {
        /// Username or e-mail
        identifier: String,
        password: String,
    },

    /// Log out (also empties the cart)
    Logout,

    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,
    },

    /// List past orders
    Orders {
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show or set the theme (dark, light, system)
    Theme { value: Option<Theme> },

    /// Show navigation links
    Links,
}

#[derive(Debug, Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,

    /// Add a product
    Add {
        /// Product id
        product_id: u64,

        /// Colour (defaults to the product's first)
        #[arg(long)]
        color: Option<String>,

        #[arg(long, default_value_t = 1)]
        amount: u32,
    },

    /// Remove a line
    Remove {
        /// Line id (product id + colour)
        cart_id: String,
    },

    /// Set a line's amount
    Edit { cart_id: String, amount: u32 },

    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(code = %e.code(), "{}", e);
        if let Some(hint) = login_hint(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

/// Points the user at `comfy login` when the error needs a session.
fn login_hint(error: &StoreError) -> Option<&'static str> {
    error
        .requires_login()
        .then_some("Run `comfy login <identifier> <password>` first.")
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=comfy=trace` - Show trace for comfy crates only
/// - Default: warnings, plus info from the comfy crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,comfy=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.comfy.store/comfy.db`
/// - **Windows**: `%APPDATA%\comfy\store\data\comfy.db`
/// - **Linux**: `~/.local/share/store/comfy.db`
///
/// Set `COMFY_DB_PATH` to use a custom path (`:memory:` for a throwaway run).
fn database_path() -> StoreResult<PathBuf> {
    if let Ok(path) = std::env::var("COMFY_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "comfy", "store")
        .ok_or_else(|| StoreError::Config("could not determine app data directory".to_string()))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| StoreError::Storage(format!("cannot create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("comfy.db"))
}

async fn open_shop() -> StoreResult<Shop> {
    let db_path = database_path()?;
    debug!(path = %db_path.display(), "Database path determined");
    let db = Database::new(DbConfig::new(db_path)).await?;

    let api = HttpStoreApi::new(&ClientConfig::from_env())?;
    info!(api = %api.base_url(), "Store API configured");

    Storefront::restore(api, db, ConsoleNotifier).await
}

async fn run(cli: Cli) -> StoreResult<()> {
    let mut shop = open_shop().await?;
    let result = dispatch(&mut shop, cli.command).await;
    shop.store().close().await;
    result
}

async fn dispatch(shop: &mut Shop, command: Commands) -> StoreResult<()> {
    match command {
        Commands::Featured => commands::catalog::featured(shop).await,
        Commands::Products {
            search,
            category,
            company,
            order,
            price,
            shipping,
            page,
        } => {
            let query = comfy_core::ProductQuery {
                search,
                category,
                company,
                order,
                price: price.map(Money::from_cents),
                shipping,
                page,
            };
            commands::catalog::products(shop, &query).await
        }
        Commands::Product { id } => commands::catalog::product(shop, id).await,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(shop),
            CartAction::Add {
                product_id,
                color,
                amount,
            } => commands::cart::add(shop, product_id, color.as_deref(), amount).await,
            CartAction::Remove { cart_id } => commands::cart::remove(shop, &cart_id).await,
            CartAction::Edit { cart_id, amount } => {
                commands::cart::edit(shop, &cart_id, amount).await
            }
            CartAction::Clear => commands::cart::clear(shop).await,
        },
        Commands::Login {
            identifier,
            password,
        } => commands::account::login(shop, &identifier, &password).await,
        Commands::Logout => commands::account::logout(shop).await,
        Commands::Register {
            username,
            email,
            password,
        } => commands::account::register(shop, &username, &email, &password).await,
        Commands::Checkout { name, address } => {
            commands::orders::checkout(shop, &name, &address).await
        }
        Commands::Orders { page } => commands::orders::list(shop, page).await,
        Commands::Theme { value } => commands::account::theme(shop, value).await,
        Commands::Links => {
            commands::account::links(shop);
            Ok(())
        }
    }
}
