//! Orders

pub mod checkout;
pub mod models;
pub mod service;

pub use checkout::{Checkout, CheckoutDetails, CheckoutError};
pub use models::{
    DeliveryMethod, NewOrder, Order, OrderItem, OrderList, OrderStatus, PaymentInfo,
    PaymentMethod, ShippingAddress,
};
pub use service::*;
