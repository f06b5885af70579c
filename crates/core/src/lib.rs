//! Mode DZ
//!
//! Storefront core for the Mode DZ fashion marketplace: a durable cart kept in sync with
//! server-side pricing, and a product listing query model that round-trips through URLs.

pub mod cart;
pub mod catalog;
pub mod controller;
pub mod generation;
pub mod orders;
pub mod pricing;

pub use controller::{CartController, CartView, spawn_pricing_sync};
