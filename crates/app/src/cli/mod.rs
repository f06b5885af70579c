use clap::{Parser, Subcommand};
use modedz_app::{config::AppConfig, context::AppContext};
use serde::de::DeserializeOwned;

mod cart;
mod orders;
mod products;

#[derive(Debug, Parser)]
#[command(name = "modedz", about = "Mode DZ storefront client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Products(products::ProductsCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Products(command) => products::run(&context, command).await,
            Commands::Orders(command) => orders::run(&context, command).await,
        }
    }
}

/// Parse a snake_case wire value such as `home_delivery` into its enum.
fn parse_wire<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_ignored| format!("unknown value {value:?}"))
}

fn variant_label(color: Option<&str>, size: Option<&str>) -> String {
    match (color, size) {
        (Some(color), Some(size)) => format!(" ({color}, {size})"),
        (Some(value), None) | (None, Some(value)) => format!(" ({value})"),
        (None, None) => String::new(),
    }
}
