//! Order Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;

/// Where an order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient first name.
    pub first_name: String,

    /// Recipient last name.
    pub last_name: String,

    /// Contact phone number.
    pub phone: String,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Street and number.
    pub street: String,

    /// City.
    pub city: String,

    /// Wilaya.
    pub state: String,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,

    /// Delivery hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Courier to the shipping address.
    #[default]
    HomeDelivery,

    /// Collected at a relay point.
    PickupPoint,

    /// Collected at the boutique.
    BoutiquePickup,
}

/// Payment method, passed to the order service as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in cash to the courier.
    #[default]
    CashOnDelivery,

    /// CIB interbank card.
    Cib,

    /// Algérie Poste Edahabia card.
    Edahabia,

    /// Bank transfer.
    BankTransfer,
}

/// Payment details attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Chosen method.
    pub method: PaymentMethod,

    /// Reference of an already completed payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    Pending,

    /// Confirmed by the boutique.
    Confirmed,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,

    /// Refunded after delivery.
    Refunded,
}

impl OrderStatus {
    /// Wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// An order ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Line items, as held in the cart.
    pub items: Vec<CartLineItem>,

    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Delivery method.
    pub delivery_method: DeliveryMethod,

    /// Notes for the courier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,

    /// Payment details.
    pub payment_info: PaymentInfo,

    /// Notes for the boutique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,

    /// Message printed on a gift card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_message: Option<String>,
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product identifier.
    pub product_id: String,

    /// Product name at order time.
    pub product_name: String,

    /// Product image at order time.
    #[serde(default)]
    pub product_image: String,

    /// Selling boutique.
    #[serde(default)]
    pub boutique_id: String,

    /// Selling boutique name.
    #[serde(default)]
    pub boutique_name: String,

    /// Ordered color.
    #[serde(default)]
    pub color: Option<String>,

    /// Ordered size.
    #[serde(default)]
    pub size: Option<String>,

    /// Price of one unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Ordered units.
    pub quantity: u32,

    /// `unit_price * quantity`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: String,

    /// Human-facing order number.
    pub order_number: String,

    /// Ordered lines.
    pub items: Vec<OrderItem>,

    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Shipping cost.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,

    /// Tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Discount applied.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Delivery method.
    pub delivery_method: DeliveryMethod,

    /// Current status.
    pub status: OrderStatus,

    /// Creation time, as reported by the service.
    #[serde(default)]
    pub created_at: String,
}

/// One page of the customer's orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderList {
    /// Orders on this page.
    pub orders: Vec<Order>,

    /// Orders across all pages.
    pub total: u64,

    /// This page, starting at 1.
    pub page: u32,

    /// Page size.
    pub size: u32,

    /// Number of pages.
    pub total_pages: u32,
}
