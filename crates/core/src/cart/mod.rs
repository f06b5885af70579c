//! Cart

pub mod errors;
pub mod items;
pub mod storage;
pub mod store;

pub use errors::{CartError, VariantAttribute, VariantRequirements};
pub use items::{CartLineItem, CartSnapshot, LineItemKey};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore};
