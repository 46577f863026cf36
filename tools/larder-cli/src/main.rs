//! Larder CLI - storefront cart and checkout from the terminal.
//!
//! Commands:
//! - `larder price` - List catalog prices
//! - `larder cart` - Show and edit the active cart
//! - `larder login` / `larder logout` - Switch the cart owner
//! - `larder checkout` - Assemble and submit an order
//! - `larder orders` - List submitted orders
//! - `larder config` - Manage configuration

mod commands;
mod config;
mod context;
mod gateway;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartArgs, CheckoutArgs, ConfigArgs, LoginArgs, OrdersArgs, PriceArgs};

/// Larder CLI - Browse prices, fill a cart and check out
#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products with their derived prices
    Price(PriceArgs),

    /// Show or edit the active cart
    Cart(CartArgs),

    /// Log in, merging the guest cart into the user's cart
    Login(LoginArgs),

    /// Log out and return to the guest cart
    Logout,

    /// Assemble the cart into an order and submit it
    Checkout(CheckoutArgs),

    /// List submitted orders
    Orders(OrdersArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Price(args) => commands::price::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Login(args) => commands::session::login(args, &ctx),
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Orders(args) => commands::orders::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
