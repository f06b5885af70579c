//! Persistent cart store

use tracing::warn;

use crate::cart::{
    errors::CartError,
    items::{CartLineItem, LineItemKey},
    storage::{KeyValueStorage, StorageError},
};

/// Storage key holding the JSON-encoded line items.
pub const CART_STORAGE_KEY: &str = "mode_dz_cart";

/// Durable cart line items kept under a single storage entry.
///
/// Every mutation is a read-modify-write of the whole collection followed by exactly one
/// storage write, so the entry is always either the previous or the next valid collection.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Store the cart under [`CART_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Store the cart under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current line items.
    ///
    /// Never fails: missing, corrupt or unreadable data reads as an empty cart.
    pub fn read(&self) -> Vec<CartLineItem> {
        self.load().unwrap_or_else(|error| {
            warn!("cart storage unreadable, treating as empty: {error}");

            Vec::new()
        })
    }

    /// Current line items, distinguishing an unreadable medium from corrupt content.
    ///
    /// Corrupt content is discarded and reads as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage medium itself cannot be read.
    pub fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
            Ok(items) => Ok(normalize(items)),
            Err(error) => {
                warn!("discarding corrupt cart data: {error}");

                Ok(Vec::new())
            }
        }
    }

    /// Replace the whole collection with a single storage write.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or writing fails.
    pub fn write(&self, items: &[CartLineItem]) -> Result<(), CartError> {
        let raw = serde_json::to_string(items).map_err(CartError::Encode)?;

        self.storage.set(&self.key, &raw)?;

        Ok(())
    }

    /// Add `item`, summing quantities when its identity is already present.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: the item carries a zero quantity.
    /// - [`CartError::Storage`]: the cart could not be read or written.
    pub fn upsert(&self, item: CartLineItem) -> Result<Vec<CartLineItem>, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.load()?;

        let existing = items
            .iter()
            .position(|existing| existing.matches(&item.key()));

        match existing.and_then(|index| items.get_mut(index)) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => items.push(item),
        }

        self.write(&items)?;

        Ok(items)
    }

    /// Delete the line item with the given identity; a no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be read or written.
    pub fn remove(
        &self,
        product_id: &str,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<Vec<CartLineItem>, CartError> {
        let key = LineItemKey::new(product_id, color, size);
        let mut items = self.load()?;
        let before = items.len();

        items.retain(|item| !item.matches(&key));

        if items.len() != before {
            self.write(&items)?;
        }

        Ok(items)
    }

    /// Replace the quantity of the line item with the given identity.
    ///
    /// A quantity of zero or less removes the line item. Unknown identities are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be read or written.
    pub fn set_quantity(
        &self,
        product_id: &str,
        quantity: i64,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<Vec<CartLineItem>, CartError> {
        if quantity <= 0 {
            return self.remove(product_id, color, size);
        }

        let key = LineItemKey::new(product_id, color, size);
        let mut items = self.load()?;

        let Some(item) = items.iter_mut().find(|item| item.matches(&key)) else {
            return Ok(items);
        };

        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.write(&items)?;

        Ok(items)
    }

    /// Take `ordered` quantities out of the cart, leaving whatever was added since.
    ///
    /// Each matching line loses the ordered quantity and is dropped once nothing is left.
    /// Lines that were not ordered are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be read or written.
    pub fn subtract(&self, ordered: &[CartLineItem]) -> Result<Vec<CartLineItem>, CartError> {
        let mut items = self.load()?;

        for item in &mut items {
            if let Some(done) = ordered.iter().find(|done| item.matches(&done.key())) {
                item.quantity = item.quantity.saturating_sub(done.quantity);
            }
        }

        items.retain(|item| item.quantity > 0);

        if items.is_empty() {
            self.clear()?;
        } else {
            self.write(&items)?;
        }

        Ok(items)
    }

    /// Delete every line item.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage entry could not be removed.
    pub fn clear(&self) -> Result<(), CartError> {
        self.storage.remove(&self.key)?;

        Ok(())
    }
}

/// Drop empty entries and fold repeated identities into their first occurrence.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());

    for item in items.into_iter().filter(|item| item.quantity > 0) {
        match merged.iter_mut().find(|existing| existing.matches(&item.key())) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }

    merged
}
