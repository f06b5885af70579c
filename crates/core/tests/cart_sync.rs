//! Integration tests for the cart controller against an in-process pricing service.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use testresult::TestResult;

use modedz::{
    CartController,
    cart::{CART_STORAGE_KEY, CartLineItem, KeyValueStorage, MemoryStorage},
    pricing::{CartPricer, CartPricing, CheckoutBlocker, PricedItem, PricingError, PricingState},
};

/// Prices carts the way the marketplace does: unknown products are skipped, shipping is free
/// from 5000 DZD and tax is 19% of the subtotal.
struct Marketplace {
    prices: FxHashMap<&'static str, (Decimal, i64)>,
}

impl Marketplace {
    fn new() -> Self {
        let mut prices = FxHashMap::default();

        prices.insert("p1", (Decimal::from(1800), 12));
        prices.insert("p2", (Decimal::from(4500), 0));

        Self { prices }
    }
}

#[async_trait]
impl CartPricer for Marketplace {
    async fn compute_totals(&self, items: &[CartLineItem]) -> Result<CartPricing, PricingError> {
        let priced: Vec<PricedItem> = items
            .iter()
            .filter_map(|item| {
                let (unit_price, stock) = self.prices.get(item.product_id.as_str())?;

                Some(PricedItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_id.clone(),
                    product_image: None,
                    boutique_name: Some("Dar El Fen".to_string()),
                    color: item.color.clone(),
                    size: item.size.clone(),
                    unit_price: *unit_price,
                    quantity: item.quantity,
                    total_price: *unit_price * Decimal::from(item.quantity),
                    is_in_stock: *stock > 0,
                    available_stock: *stock,
                })
            })
            .collect();

        let subtotal: Decimal = priced.iter().map(|item| item.total_price).sum();
        let shipping_cost = if subtotal >= Decimal::from(5000) {
            Decimal::ZERO
        } else {
            Decimal::from(500)
        };
        let tax = subtotal * Decimal::new(19, 2);

        Ok(CartPricing {
            total_items: priced.iter().map(|item| u64::from(item.quantity)).sum(),
            items: priced,
            subtotal,
            shipping_cost,
            tax,
            total_amount: subtotal + shipping_cost + tax,
        })
    }
}

fn controller(storage: &Arc<MemoryStorage>) -> CartController<Arc<MemoryStorage>> {
    CartController::new(Arc::clone(storage), Arc::new(Marketplace::new()))
}

#[tokio::test]
async fn add_update_remove_round_trip_through_storage() -> TestResult {
    let storage = Arc::new(MemoryStorage::new());
    let cart = controller(&storage);

    cart.add_item(CartLineItem::new("p1", 2).with_color("noir").with_size("M"))?;
    assert_eq!(cart.item_count(), 2);

    cart.update_quantity("p1", 5, Some("noir"), Some("M"))?;
    assert_eq!(cart.item_count(), 5);

    cart.remove_item("p1", Some("noir"), Some("M"))?;
    assert_eq!(cart.item_count(), 0);

    let reopened = controller(&storage);

    assert!(reopened.snapshot().is_empty());
    assert!(reopened.store().read().is_empty());

    Ok(())
}

#[tokio::test]
async fn totals_follow_marketplace_rules() -> TestResult {
    let storage = Arc::new(MemoryStorage::new());
    let cart = controller(&storage);

    cart.add_item(CartLineItem::new("p1", 2).with_size("M"))?;

    let state = cart.refresh_pricing().await;
    let pricing = state.pricing().ok_or("pricing should be fresh")?;

    assert_eq!(pricing.subtotal, Decimal::from(3600));
    assert_eq!(pricing.shipping_cost, Decimal::from(500));
    assert_eq!(pricing.total_amount, Decimal::from(4784));

    cart.add_item(CartLineItem::new("p1", 1).with_size("M"))?;

    assert!(matches!(cart.pricing_state(), PricingState::Stale));

    let state = cart.refresh_pricing().await;

    assert!(
        state.pricing().is_some_and(|pricing| pricing.has_free_shipping()),
        "5400 DZD should ship for free"
    );

    Ok(())
}

#[tokio::test]
async fn corrupt_storage_reads_as_empty_cart() -> TestResult {
    let storage = Arc::new(MemoryStorage::new());

    storage.set(CART_STORAGE_KEY, "{not json")?;

    let cart = controller(&storage);

    assert!(cart.store().read().is_empty());
    assert_eq!(cart.item_count(), 0);
    assert!(matches!(cart.pricing_state(), PricingState::Empty));

    cart.add_item(CartLineItem::new("p1", 1))?;

    assert_eq!(cart.store().read().len(), 1, "a fresh cart replaces the garbage");

    Ok(())
}

#[tokio::test]
async fn checkout_reports_out_of_stock_and_unknown_products() -> TestResult {
    let storage = Arc::new(MemoryStorage::new());
    let cart = controller(&storage);

    cart.add_item(CartLineItem::new("p1", 1))?;
    cart.add_item(CartLineItem::new("p2", 1).with_color("ivoire"))?;
    cart.refresh_pricing().await;

    assert_eq!(
        cart.checkout_eligibility().err(),
        Some(CheckoutBlocker::OutOfStock(vec!["p2".to_string()]))
    );

    cart.remove_item("p2", Some("ivoire"), None)?;
    cart.add_item(CartLineItem::new("retired", 1))?;
    cart.refresh_pricing().await;

    assert_eq!(
        cart.checkout_eligibility().err(),
        Some(CheckoutBlocker::Unavailable(vec!["retired".to_string()]))
    );
    assert_eq!(cart.item_count(), 2, "unknown products stay in the cart");

    Ok(())
}
