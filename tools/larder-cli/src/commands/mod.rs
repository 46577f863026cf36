//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod price;
pub mod session;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    /// Only show this product.
    pub product: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the active cart.
    Show,
    /// Add a product, or grow its line.
    Add {
        /// Product ID.
        product: String,
        /// Units, or grams/ml for weight products.
        quantity: Option<String>,
    },
    /// Set a line's quantity.
    Set {
        /// Product ID or line ID.
        line: String,
        /// New quantity.
        quantity: String,
    },
    /// Step a line up.
    Inc {
        /// Product ID or line ID.
        line: String,
    },
    /// Step a line down.
    Dec {
        /// Product ID or line ID.
        line: String,
    },
    /// Remove a line.
    Remove {
        /// Product ID or line ID.
        line: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// User ID to log in as.
    pub user: String,
}

/// Payment methods accepted for delivery.
#[derive(Clone, Copy, ValueEnum)]
pub enum DeliveryPayment {
    Cash,
    Transfer,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Deliver instead of picking up in store.
    #[arg(long)]
    pub delivery: bool,

    /// Contact phone (delivery).
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Street (delivery).
    #[arg(long, default_value = "")]
    pub street: String,

    /// Street number (delivery).
    #[arg(long, default_value = "")]
    pub number: String,

    /// Cross streets (delivery).
    #[arg(long, default_value = "")]
    pub between: String,

    /// Payment method (delivery).
    #[arg(long, value_enum, default_value = "cash")]
    pub payment: DeliveryPayment,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Assemble and print the order without submitting.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
