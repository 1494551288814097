//! Clementine CLI - Storefront client front end.
//!
//! # Usage
//!
//! ```bash
//! # Session lifecycle
//! clementine login -e shopper@example.com -p secret
//! clementine logout
//! clementine whoami
//!
//! # Cart
//! clementine cart show
//! clementine cart add 6543f2b1 --size M --color blue
//! clementine cart update 6543f2b1 --quantity 3 --size M --color blue
//! clementine cart remove 6543f2b1 --size M --color blue
//! clementine cart clear
//!
//! # Favorites
//! clementine favorites list
//! clementine favorites add 6543f2b1
//! clementine favorites remove 6543f2b1
//!
//! # Catalog
//! clementine search "linen shirt"
//! clementine product show 6543f2b1
//! clementine product list --limit 20
//! ```
//!
//! # Environment Variables
//!
//! - `CLEMENTINE_API_BASE_URL` - Backend origin (required)
//! - `CLEMENTINE_STORAGE_PATH` - Durable storage file (sessions survive
//!   restarts only when this is set)
//! - `SENTRY_DSN` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clementine_client::{AppState, ClientConfig};

mod commands;

#[derive(Parser)]
#[command(name = "clementine")]
#[command(author, version, about = "Clementine storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Destroy the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Favorites operations
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
    /// Typeahead product search
    Search {
        /// Search query
        query: String,
    },
    /// Catalog operations
    Product {
        #[command(subcommand)]
        action: commands::catalog::ProductAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let _sentry_guard = init_sentry(&config);

    let state = AppState::new(config)?;
    state.bootstrap().await?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&state, &email, &password).await?;
        }
        Commands::Register {
            email,
            password,
            name,
        } => {
            commands::auth::register(&state, &email, &password, name.as_deref()).await?;
        }
        Commands::Logout => commands::auth::logout(&state).await?,
        Commands::Whoami => commands::auth::whoami(&state),
        Commands::Cart { action } => commands::cart::run(&state, action).await?,
        Commands::Favorites { action } => commands::favorites::run(&state, action).await?,
        Commands::Search { query } => commands::catalog::search(&state, &query).await?,
        Commands::Product { action } => commands::catalog::run(&state, action).await?,
    }
    Ok(())
}
