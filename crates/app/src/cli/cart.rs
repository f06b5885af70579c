use clap::{Args, Subcommand};
use modedz::{
    cart::{CartLineItem, VariantRequirements},
    pricing::{PricingState, StockStatus},
};
use modedz_app::{context::AppContext, money::format_dzd};

use super::variant_label;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with up-to-date totals
    Show,
    /// Add a product to the cart
    Add(AddArgs),
    /// Replace the quantity of a line item; zero removes it
    Update(UpdateArgs),
    /// Remove a line item
    Remove(VariantArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct VariantArgs {
    /// Product identifier
    product_id: String,

    /// Selected color
    #[arg(long)]
    color: Option<String>,

    /// Selected size
    #[arg(long)]
    size: Option<String>,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    variant: VariantArgs,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Add without checking the product's required color and size
    #[arg(long)]
    skip_check: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    variant: VariantArgs,

    /// New quantity
    #[arg(short, long, allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show(context).await,
        CartSubcommand::Add(args) => add(context, args).await,
        CartSubcommand::Update(args) => {
            let variant = args.variant;

            context
                .cart
                .update_quantity(
                    &variant.product_id,
                    args.quantity,
                    variant.color.as_deref(),
                    variant.size.as_deref(),
                )
                .map_err(|error| format!("failed to update cart: {error}"))?;

            print_count(context);

            Ok(())
        }
        CartSubcommand::Remove(variant) => {
            context
                .cart
                .remove_item(
                    &variant.product_id,
                    variant.color.as_deref(),
                    variant.size.as_deref(),
                )
                .map_err(|error| format!("failed to update cart: {error}"))?;

            print_count(context);

            Ok(())
        }
        CartSubcommand::Clear => {
            context
                .cart
                .clear_cart()
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cart cleared");

            Ok(())
        }
    }
}

async fn add(context: &AppContext, args: AddArgs) -> Result<(), String> {
    let AddArgs {
        variant,
        quantity,
        skip_check,
    } = args;

    let requirements = if skip_check {
        VariantRequirements::default()
    } else {
        context
            .catalog
            .get_product(&variant.product_id)
            .await
            .map_err(|error| format!("failed to look up product {}: {error}", variant.product_id))?
            .variant_requirements()
    };

    let mut item = CartLineItem::new(variant.product_id, quantity);
    item.color = variant.color;
    item.size = variant.size;

    context
        .cart
        .add_item_checked(item, requirements)
        .map_err(|error| format!("failed to add to cart: {error}"))?;

    print_count(context);

    Ok(())
}

async fn show(context: &AppContext) -> Result<(), String> {
    let snapshot = context.cart.snapshot();

    if snapshot.is_empty() {
        println!("your cart is empty");
        return Ok(());
    }

    let state = context.cart.refresh_pricing().await;
    let pricing = state.pricing();

    for item in snapshot.items() {
        let variant = variant_label(item.color.as_deref(), item.size.as_deref());

        match pricing.and_then(|pricing| pricing.find(&item.key())) {
            Some(priced) => {
                let stock = match priced.stock_status() {
                    StockStatus::InStock => String::new(),
                    StockStatus::Limited { available } => format!(" [only {available} left]"),
                    StockStatus::OutOfStock => " [out of stock]".to_string(),
                };

                println!(
                    "{} x {}{variant}  {}{stock}",
                    item.quantity,
                    priced.product_name,
                    format_dzd(priced.total_price)
                );
            }
            None => println!("{} x {}{variant}", item.quantity, item.product_id),
        }
    }

    println!();
    println!("items: {}", snapshot.item_count());

    match &state {
        PricingState::Fresh(pricing) => {
            println!("subtotal: {}", format_dzd(pricing.subtotal));

            if pricing.has_free_shipping() {
                println!("shipping: free");
            } else {
                println!("shipping: {}", format_dzd(pricing.shipping_cost));
            }

            println!("tax: {}", format_dzd(pricing.tax));
            println!("total: {}", format_dzd(pricing.total_amount));

            if let Err(blocker) = context.cart.checkout_eligibility() {
                println!("checkout unavailable: {blocker}");
            }
        }
        PricingState::Error(error) => println!("pricing unavailable: {error}"),
        PricingState::Empty | PricingState::Stale | PricingState::Aggregating => {
            println!("pricing {}", state.label());
        }
    }

    Ok(())
}

fn print_count(context: &AppContext) {
    println!("items in cart: {}", context.cart.item_count());
}
