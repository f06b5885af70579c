use std::error::Error as StdError;

use clap::{Args, Subcommand};
use modedz::orders::{
    CheckoutDetails, DeliveryMethod, Order, OrderStatus, PaymentMethod, ShippingAddress,
};
use modedz_app::{context::AppContext, money::format_dzd};

use super::{parse_wire, variant_label};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Place an order for the current cart
    Checkout(CheckoutArgs),
    /// List your orders
    List(ListArgs),
    /// Show a single order
    Show(OrderIdArgs),
    /// Cancel an order that has not shipped
    Cancel(OrderIdArgs),
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    /// Wilaya
    #[arg(long)]
    state: String,

    #[arg(long)]
    postal_code: String,

    #[arg(long, default_value = "Algeria")]
    country: String,

    /// Extra address details
    #[arg(long)]
    additional_info: Option<String>,

    /// home_delivery, pickup_point or boutique_pickup
    #[arg(long, value_parser = parse_wire::<DeliveryMethod>, default_value = "home_delivery")]
    delivery: DeliveryMethod,

    /// cash_on_delivery, cib, edahabia or bank_transfer
    #[arg(long, value_parser = parse_wire::<PaymentMethod>, default_value = "cash_on_delivery")]
    payment: PaymentMethod,

    /// Notes for the courier
    #[arg(long)]
    delivery_notes: Option<String>,

    /// Notes for the boutique
    #[arg(long)]
    instructions: Option<String>,

    #[arg(long)]
    gift_message: Option<String>,
}

impl From<CheckoutArgs> for CheckoutDetails {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            shipping_address: ShippingAddress {
                first_name: args.first_name,
                last_name: args.last_name,
                phone: args.phone,
                email: args.email,
                street: args.street,
                city: args.city,
                state: args.state,
                postal_code: args.postal_code,
                country: args.country,
                additional_info: args.additional_info,
            },
            delivery_method: args.delivery,
            payment_method: args.payment,
            delivery_notes: args.delivery_notes,
            special_instructions: args.instructions,
            gift_message: args.gift_message,
        }
    }
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 10)]
    size: u32,

    /// Only orders in this status
    #[arg(long, value_parser = parse_wire::<OrderStatus>)]
    status: Option<OrderStatus>,
}

#[derive(Debug, Args)]
struct OrderIdArgs {
    order_id: String,
}

pub(crate) async fn run(context: &AppContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::Checkout(args) => {
            // Totals must be fresh before the cart can be submitted.
            context.cart.refresh_pricing().await;

            let order = context
                .checkout()
                .place_order(&context.cart, args.into())
                .await
                .map_err(|error| format!("failed to place order: {}", chain(&error)))?;

            println!("order {} placed", order.order_number);
            print_order(&order);

            Ok(())
        }
        OrdersSubcommand::List(args) => {
            let list = context
                .orders
                .list_orders(args.page.max(1), args.size, args.status)
                .await
                .map_err(|error| format!("failed to list orders: {}", chain(&error)))?;

            if list.orders.is_empty() {
                println!("no orders");
            }

            for order in &list.orders {
                println!(
                    "{}  {}  {}  {}",
                    order.order_number,
                    order.status,
                    format_dzd(order.total_amount),
                    order.created_at
                );
            }

            println!();
            println!(
                "page {} of {} ({} orders)",
                list.page,
                list.total_pages.max(1),
                list.total
            );

            Ok(())
        }
        OrdersSubcommand::Show(args) => {
            let order = context
                .orders
                .get_order(args.order_id)
                .await
                .map_err(|error| format!("failed to load order: {}", chain(&error)))?;

            print_order(&order);

            Ok(())
        }
        OrdersSubcommand::Cancel(args) => {
            context
                .orders
                .cancel_order(args.order_id.clone())
                .await
                .map_err(|error| format!("failed to cancel order: {}", chain(&error)))?;

            println!("order {} cancelled", args.order_id);

            Ok(())
        }
    }
}

fn print_order(order: &Order) {
    println!("{} ({})", order.order_number, order.status);

    for item in &order.items {
        println!(
            "  {} x {}{}  {}",
            item.quantity,
            item.product_name,
            variant_label(item.color.as_deref(), item.size.as_deref()),
            format_dzd(item.total_price)
        );
    }

    println!("subtotal: {}", format_dzd(order.subtotal));
    println!("shipping: {}", format_dzd(order.shipping_cost));
    println!("tax: {}", format_dzd(order.tax));

    if !order.discount.is_zero() {
        println!("discount: -{}", format_dzd(order.discount));
    }

    println!("total: {}", format_dzd(order.total_amount));
}

/// Render an error with its sources, outermost first.
fn chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
