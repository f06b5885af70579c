//! Checkout
//!
//! Turns an eligible cart into an order. The ordered quantities only leave the cart once the
//! order service has accepted the order; any failure before that leaves it untouched.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::KeyValueStorage,
    controller::CartController,
    orders::{
        models::{DeliveryMethod, NewOrder, Order, PaymentInfo, PaymentMethod, ShippingAddress},
        service::{OrderError, OrderService},
    },
    pricing::CheckoutBlocker,
};

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is not ready for checkout.
    #[error("checkout blocked: {0}")]
    Blocked(#[from] CheckoutBlocker),

    /// The order service did not accept the order.
    #[error("order could not be placed")]
    Order(#[from] OrderError),
}

/// Delivery and payment choices made at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Delivery method.
    pub delivery_method: DeliveryMethod,

    /// Payment method.
    pub payment_method: PaymentMethod,

    /// Notes for the courier.
    pub delivery_notes: Option<String>,

    /// Notes for the boutique.
    pub special_instructions: Option<String>,

    /// Gift card message.
    pub gift_message: Option<String>,
}

/// Places orders for the cart.
pub struct Checkout {
    orders: Arc<dyn OrderService>,
}

impl Checkout {
    /// Place orders through `orders`.
    pub fn new(orders: Arc<dyn OrderService>) -> Self {
        Self { orders }
    }

    /// Submit the cart as an order, then take the ordered items out of it.
    ///
    /// Items added while the order was being placed are kept.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Blocked`]: the cart is empty, its pricing is not fresh, or some of
    ///   its products cannot be bought.
    /// - [`CheckoutError::Order`]: the order service failed; the cart is kept.
    pub async fn place_order<S: KeyValueStorage>(
        &self,
        cart: &CartController<S>,
        details: CheckoutDetails,
    ) -> Result<Order, CheckoutError> {
        let (snapshot, pricing) = cart.checkout_items()?;

        info!(
            line_items = snapshot.len(),
            total = %pricing.total_amount,
            "placing order"
        );

        let items = snapshot.into_items();

        let order = self
            .orders
            .create_order(NewOrder {
                items: items.clone(),
                shipping_address: details.shipping_address,
                delivery_method: details.delivery_method,
                delivery_notes: details.delivery_notes,
                payment_info: PaymentInfo {
                    method: details.payment_method,
                    transaction_id: None,
                },
                special_instructions: details.special_instructions,
                gift_message: details.gift_message,
            })
            .await?;

        info!(order_number = %order.order_number, "order placed");

        if let Err(error) = cart.remove_ordered(&items) {
            warn!(
                order_number = %order.order_number,
                "order placed but the cart could not be cleared: {error}"
            );
        }

        Ok(order)
    }
}

impl Debug for Checkout {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}
