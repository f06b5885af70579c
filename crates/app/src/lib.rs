//! Mode DZ storefront client: HTTP adapters for the storefront API, on-disk cart storage and
//! the wiring the command-line client runs on.

pub mod api;
pub mod catalog;
pub mod config;
pub mod context;
pub mod links;
pub mod money;
pub mod observability;
pub mod orders;
pub mod pricing;
pub mod storage;
