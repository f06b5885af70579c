//! Cart state controller
//!
//! [`CartController`] is the single owner and writer of cart state. Mutations go to durable
//! storage first, then to the in-memory snapshot, then out to subscribers; pricing is
//! re-aggregated behind them and stamped with a [`Generation`] so that only the response to
//! the latest request is ever applied.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    cart::{
        CartError, CartLineItem, CartSnapshot, CartStore, KeyValueStorage, VariantRequirements,
    },
    generation::Generation,
    pricing::{CartPricer, CartPricing, CheckoutBlocker, PricingState},
};

/// Cart state as published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    /// Line items in storage order.
    pub snapshot: CartSnapshot,

    /// Pricing state for those line items.
    pub pricing: PricingState,

    /// Incremented on every change to the line items.
    pub revision: u64,
}

impl CartView {
    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.snapshot.item_count()
    }
}

#[derive(Debug)]
struct CartState {
    snapshot: CartSnapshot,
    pricing: PricingState,
    generation: Generation,
    revision: u64,
}

impl CartState {
    fn view(&self) -> CartView {
        CartView {
            snapshot: self.snapshot.clone(),
            pricing: self.pricing.clone(),
            revision: self.revision,
        }
    }
}

/// Owns the cart: durable line items, their pricing, and the subscribers watching both.
pub struct CartController<S> {
    store: CartStore<S>,
    pricer: Arc<dyn CartPricer>,
    state: Mutex<CartState>,
    views: watch::Sender<CartView>,
}

impl<S: KeyValueStorage> CartController<S> {
    /// Build a controller over `storage`, restoring the cart persisted there.
    pub fn new(storage: S, pricer: Arc<dyn CartPricer>) -> Self {
        Self::with_store(CartStore::new(storage), pricer)
    }

    /// Build a controller over an existing store.
    pub fn with_store(store: CartStore<S>, pricer: Arc<dyn CartPricer>) -> Self {
        let snapshot = CartSnapshot::new(store.read());

        let pricing = if snapshot.is_empty() {
            PricingState::Empty
        } else {
            PricingState::Stale
        };

        let state = CartState {
            snapshot,
            pricing,
            generation: Generation::default(),
            revision: 0,
        };

        let (views, _) = watch::channel(state.view());

        Self {
            store,
            pricer,
            state: Mutex::new(state),
            views,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Underlying store.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Receive a [`CartView`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.views.subscribe()
    }

    /// Current cart state.
    pub fn view(&self) -> CartView {
        self.lock().view()
    }

    /// Current line items.
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot.clone()
    }

    /// Total units in the cart, available without waiting on pricing.
    pub fn item_count(&self) -> u64 {
        self.lock().snapshot.item_count()
    }

    /// Current pricing state.
    pub fn pricing_state(&self) -> PricingState {
        self.lock().pricing.clone()
    }

    /// Pricing result, only when it matches the current line items.
    pub fn current_pricing(&self) -> Option<Arc<CartPricing>> {
        self.lock().pricing.pricing().cloned()
    }

    /// Add `item`, summing its quantity into a line item with the same identity.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: the item carries a zero quantity.
    /// - [`CartError::Storage`]: the cart could not be persisted; nothing changed.
    pub fn add_item(&self, item: CartLineItem) -> Result<CartSnapshot, CartError> {
        self.apply(|store| store.upsert(item))
    }

    /// Add `item` once the product's required selections are present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingSelection`] without touching the cart when a required
    /// color or size is missing, otherwise as [`CartController::add_item`].
    pub fn add_item_checked(
        &self,
        item: CartLineItem,
        requirements: VariantRequirements,
    ) -> Result<CartSnapshot, CartError> {
        requirements.validate(&item)?;

        self.add_item(item)
    }

    /// Remove the line item with the given identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be persisted.
    pub fn remove_item(
        &self,
        product_id: &str,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<CartSnapshot, CartError> {
        self.apply(|store| store.remove(product_id, color, size))
    }

    /// Replace the quantity of a line item; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be persisted.
    pub fn update_quantity(
        &self,
        product_id: &str,
        quantity: i64,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<CartSnapshot, CartError> {
        self.apply(|store| store.set_quantity(product_id, quantity, color, size))
    }

    /// Empty the cart and drop any pricing, without a network round trip.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be persisted.
    pub fn clear_cart(&self) -> Result<CartSnapshot, CartError> {
        self.apply(|store| store.clear().map(|()| Vec::new()))
    }

    /// Remove the quantities of an order that was just placed.
    ///
    /// Items added or increased while the order was in flight stay in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart could not be persisted.
    pub fn remove_ordered(&self, ordered: &[CartLineItem]) -> Result<CartSnapshot, CartError> {
        self.apply(|store| store.subtract(ordered))
    }

    /// Run a store mutation and advertise its result.
    ///
    /// The lock is held across the storage write so the store has a single writer, and the
    /// snapshot only changes once the write succeeded.
    fn apply<F>(&self, mutation: F) -> Result<CartSnapshot, CartError>
    where
        F: FnOnce(&CartStore<S>) -> Result<Vec<CartLineItem>, CartError>,
    {
        let mut state = self.lock();

        let items = mutation(&self.store)?;

        if items.as_slice() == state.snapshot.items() {
            return Ok(state.snapshot.clone());
        }

        state.snapshot = CartSnapshot::new(items);
        state.revision += 1;
        state.generation = state.generation.next();
        state.pricing = if state.snapshot.is_empty() {
            PricingState::Empty
        } else {
            PricingState::Stale
        };

        self.views.send_replace(state.view());

        Ok(state.snapshot.clone())
    }

    /// Aggregate pricing for the current line items.
    ///
    /// Returns the resulting state. A response that arrives after the line items changed, or
    /// after a newer aggregation was issued, is discarded and the state is left untouched.
    pub async fn refresh_pricing(&self) -> PricingState {
        let (generation, items) = {
            let mut state = self.lock();

            if state.snapshot.is_empty() {
                state.pricing = PricingState::Empty;

                return PricingState::Empty;
            }

            state.generation = state.generation.next();
            state.pricing = PricingState::Aggregating;

            self.views.send_replace(state.view());

            (state.generation, state.snapshot.items().to_vec())
        };

        let result = self.pricer.compute_totals(&items).await;

        let mut state = self.lock();

        if state.generation != generation {
            debug!(
                %generation,
                latest = %state.generation,
                "discarding superseded pricing response"
            );

            return state.pricing.clone();
        }

        state.pricing = match result {
            Ok(pricing) => PricingState::Fresh(Arc::new(pricing)),
            Err(error) => {
                warn!("cart pricing unavailable: {error}");

                PricingState::Error(Arc::new(error))
            }
        };

        self.views.send_replace(state.view());

        state.pricing.clone()
    }

    /// Re-issue aggregation after a failure.
    pub async fn retry_pricing(&self) -> PricingState {
        {
            let mut state = self.lock();

            if matches!(state.pricing, PricingState::Error(_)) {
                state.pricing = PricingState::Stale;
            }
        }

        self.refresh_pricing().await
    }

    /// Pricing to check out with, or the reason checkout must wait.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutBlocker`] found: empty cart, pricing not fresh, out of
    /// stock products, then products unknown to the pricing service.
    pub fn checkout_eligibility(&self) -> Result<Arc<CartPricing>, CheckoutBlocker> {
        self.checkout_items().map(|(_, pricing)| pricing)
    }

    /// Line items to order together with the pricing they were checked against.
    ///
    /// # Errors
    ///
    /// As [`CartController::checkout_eligibility`].
    pub fn checkout_items(&self) -> Result<(CartSnapshot, Arc<CartPricing>), CheckoutBlocker> {
        let state = self.lock();

        if state.snapshot.is_empty() {
            return Err(CheckoutBlocker::EmptyCart);
        }

        let Some(pricing) = state.pricing.pricing() else {
            return Err(CheckoutBlocker::PricingNotFresh);
        };

        let out_of_stock: Vec<String> = pricing
            .out_of_stock()
            .map(|item| item.product_id.clone())
            .collect();

        if !out_of_stock.is_empty() {
            return Err(CheckoutBlocker::OutOfStock(out_of_stock));
        }

        let unavailable: Vec<String> = pricing
            .unpriced(&state.snapshot)
            .into_iter()
            .map(|item| item.product_id.clone())
            .collect();

        if !unavailable.is_empty() {
            return Err(CheckoutBlocker::Unavailable(unavailable));
        }

        Ok((state.snapshot.clone(), Arc::clone(pricing)))
    }
}

impl<S> Debug for CartController<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartController").finish_non_exhaustive()
    }
}

/// Re-aggregate pricing whenever the cart goes stale.
///
/// Each stale revision spawns its own [`CartController::refresh_pricing`]; overlapping
/// requests are resolved by generation. The task ends once the controller is dropped.
pub fn spawn_pricing_sync<S>(controller: &Arc<CartController<S>>) -> JoinHandle<()>
where
    S: KeyValueStorage + 'static,
{
    let mut views = controller.subscribe();
    let controller = Arc::downgrade(controller);

    tokio::spawn(async move {
        loop {
            let needs_refresh = views.borrow_and_update().pricing.needs_refresh();

            if needs_refresh {
                let Some(controller) = controller.upgrade() else {
                    break;
                };

                tokio::spawn(async move {
                    controller.refresh_pricing().await;
                });
            }

            if views.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Duration};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::sync::oneshot;

    use crate::{
        cart::{CART_STORAGE_KEY, MemoryStorage, VariantAttribute},
        pricing::{MockCartPricer, PricedItem, PricingError},
    };

    use super::*;

    fn pricing_for(items: &[CartLineItem], total: i64) -> CartPricing {
        CartPricing {
            items: items
                .iter()
                .map(|item| PricedItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_id.clone(),
                    product_image: None,
                    boutique_name: None,
                    color: item.color.clone(),
                    size: item.size.clone(),
                    unit_price: Decimal::from(100),
                    quantity: item.quantity,
                    total_price: Decimal::from(100) * Decimal::from(item.quantity),
                    is_in_stock: true,
                    available_stock: 99,
                })
                .collect(),
            total_items: items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal: Decimal::from(total),
            shipping_cost: Decimal::ZERO,
            tax: Decimal::ZERO,
            total_amount: Decimal::from(total),
        }
    }

    fn robe() -> CartLineItem {
        CartLineItem::new("p1", 2).with_color("noir").with_size("M")
    }

    fn echo_pricer() -> MockCartPricer {
        let mut pricer = MockCartPricer::new();

        pricer
            .expect_compute_totals()
            .returning(|items| Ok(pricing_for(items, 1_000)));

        pricer
    }

    fn controller(pricer: MockCartPricer) -> (CartController<Arc<MemoryStorage>>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());

        (
            CartController::new(Arc::clone(&storage), Arc::new(pricer)),
            storage,
        )
    }

    /// Pricer whose responses are released by the test, one gate per call in call order.
    #[derive(Debug, Default)]
    struct GatedPricer {
        gates: Mutex<VecDeque<oneshot::Receiver<CartPricing>>>,
        started: Mutex<usize>,
    }

    impl GatedPricer {
        fn gate(&self) -> oneshot::Sender<CartPricing> {
            let (sender, receiver) = oneshot::channel();

            self.gates
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(receiver);

            sender
        }

        fn started(&self) -> usize {
            *self.started.lock().unwrap_or_else(PoisonError::into_inner)
        }

        async fn wait_for_calls(&self, calls: usize) {
            while self.started() < calls {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl CartPricer for GatedPricer {
        async fn compute_totals(
            &self,
            _items: &[CartLineItem],
        ) -> Result<CartPricing, PricingError> {
            let gate = self
                .gates
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            *self.started.lock().unwrap_or_else(PoisonError::into_inner) += 1;

            let Some(gate) = gate else {
                return Err(PricingError::UnexpectedResponse {
                    status: 500,
                    message: "no gate prepared".to_string(),
                });
            };

            gate.await
                .map_err(|error| PricingError::Transport(Box::new(error)))
        }
    }

    fn total_of(state: &PricingState) -> Option<Decimal> {
        state.pricing().map(|pricing| pricing.total_amount)
    }

    #[tokio::test]
    async fn end_to_end_add_update_remove() -> TestResult {
        let (controller, storage) = controller(echo_pricer());

        controller.add_item(robe())?;
        assert_eq!(controller.item_count(), 2);

        controller.update_quantity("p1", 5, Some("noir"), Some("M"))?;
        assert_eq!(controller.item_count(), 5);

        controller.remove_item("p1", Some("noir"), Some("M"))?;
        assert_eq!(controller.item_count(), 0);

        assert!(controller.store().read().is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY)?.as_deref(), Some("[]"));
        assert!(matches!(controller.pricing_state(), PricingState::Empty));

        Ok(())
    }

    #[tokio::test]
    async fn repeat_add_merges_identity() -> TestResult {
        let (controller, _) = controller(echo_pricer());

        controller.add_item(robe())?;
        let snapshot = controller.add_item(robe().with_size("M"))?;

        assert_eq!(snapshot.len(), 1, "same identity should stay one line item");
        assert_eq!(snapshot.item_count(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_zero_removes_and_lowers_count_by_prior_quantity() -> TestResult {
        let (controller, _) = controller(echo_pricer());

        controller.add_item(robe())?;
        controller.add_item(CartLineItem::new("p2", 3))?;

        let before = controller.item_count();

        let snapshot = controller.update_quantity("p1", 0, Some("noir"), Some("M"))?;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(controller.item_count(), before - 2);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_yields_fresh_pricing() -> TestResult {
        let (controller, _) = controller(echo_pricer());

        controller.add_item(robe())?;

        assert!(matches!(controller.pricing_state(), PricingState::Stale));

        let state = controller.refresh_pricing().await;

        assert!(state.is_fresh(), "expected fresh, got {}", state.label());
        assert_eq!(
            controller.current_pricing().map(|pricing| pricing.total_items),
            Some(2)
        );

        Ok(())
    }

    #[tokio::test]
    async fn mutation_after_fresh_goes_stale_before_any_response() -> TestResult {
        let (controller, _) = controller(echo_pricer());

        controller.add_item(robe())?;
        controller.refresh_pricing().await;
        assert!(controller.pricing_state().is_fresh());

        controller.add_item(CartLineItem::new("p2", 1))?;

        assert!(matches!(controller.pricing_state(), PricingState::Stale));
        assert!(
            controller.current_pricing().is_none(),
            "previous totals must not be presented as current"
        );
        assert!(controller.view().pricing.pricing().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn pricing_failure_keeps_line_items() -> TestResult {
        let mut pricer = MockCartPricer::new();

        pricer.expect_compute_totals().once().returning(|_| {
            Err(PricingError::UnexpectedResponse {
                status: 503,
                message: "Backend service unavailable".to_string(),
            })
        });
        pricer
            .expect_compute_totals()
            .once()
            .returning(|items| Ok(pricing_for(items, 500)));

        let (controller, _) = controller(pricer);

        controller.add_item(robe())?;

        let state = controller.refresh_pricing().await;

        assert!(
            matches!(state, PricingState::Error(_)),
            "expected error, got {}",
            state.label()
        );
        assert_eq!(controller.snapshot().items(), &[robe()]);
        assert_eq!(controller.item_count(), 2);

        let state = controller.retry_pricing().await;

        assert_eq!(total_of(&state), Some(Decimal::from(500)));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_never_calls_pricer() {
        let mut pricer = MockCartPricer::new();

        pricer.expect_compute_totals().never();

        let (controller, _) = controller(pricer);

        let state = controller.refresh_pricing().await;

        assert!(matches!(state, PricingState::Empty));
    }

    #[tokio::test]
    async fn clear_cart_drops_pricing_without_network() -> TestResult {
        let mut pricer = MockCartPricer::new();

        pricer
            .expect_compute_totals()
            .once()
            .returning(|items| Ok(pricing_for(items, 200)));

        let (controller, storage) = controller(pricer);

        controller.add_item(robe())?;
        controller.refresh_pricing().await;

        controller.clear_cart()?;

        assert!(matches!(controller.pricing_state(), PricingState::Empty));
        assert_eq!(controller.item_count(), 0);
        assert_eq!(storage.get(CART_STORAGE_KEY)?, None);

        Ok(())
    }

    #[tokio::test]
    async fn later_request_wins_when_it_resolves_first() -> TestResult {
        let pricer = Arc::new(GatedPricer::default());
        let gate_a = pricer.gate();
        let gate_b = pricer.gate();

        let controller = Arc::new(CartController::new(
            MemoryStorage::new(),
            Arc::clone(&pricer) as Arc<dyn CartPricer>,
        ));

        controller.add_item(robe())?;

        let request_a = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_pricing().await }
        });
        pricer.wait_for_calls(1).await;

        let request_b = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_pricing().await }
        });
        pricer.wait_for_calls(2).await;

        let items = controller.snapshot().into_items();

        gate_b
            .send(pricing_for(&items, 222))
            .map_err(|_ignored| "gate b closed")?;
        assert_eq!(total_of(&request_b.await?), Some(Decimal::from(222)));

        gate_a
            .send(pricing_for(&items, 111))
            .map_err(|_ignored| "gate a closed")?;
        request_a.await?;

        assert_eq!(
            total_of(&controller.pricing_state()),
            Some(Decimal::from(222)),
            "late response from the earlier request must be discarded"
        );

        Ok(())
    }

    #[tokio::test]
    async fn later_request_wins_when_earlier_resolves_first() -> TestResult {
        let pricer = Arc::new(GatedPricer::default());
        let gate_a = pricer.gate();
        let gate_b = pricer.gate();

        let controller = Arc::new(CartController::new(
            MemoryStorage::new(),
            Arc::clone(&pricer) as Arc<dyn CartPricer>,
        ));

        controller.add_item(robe())?;

        let request_a = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_pricing().await }
        });
        pricer.wait_for_calls(1).await;

        let request_b = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_pricing().await }
        });
        pricer.wait_for_calls(2).await;

        let items = controller.snapshot().into_items();

        gate_a
            .send(pricing_for(&items, 111))
            .map_err(|_ignored| "gate a closed")?;
        request_a.await?;

        assert!(
            matches!(controller.pricing_state(), PricingState::Aggregating),
            "superseded response must not be applied"
        );

        gate_b
            .send(pricing_for(&items, 222))
            .map_err(|_ignored| "gate b closed")?;
        request_b.await?;

        assert_eq!(
            total_of(&controller.pricing_state()),
            Some(Decimal::from(222))
        );

        Ok(())
    }

    #[tokio::test]
    async fn response_for_mutated_cart_is_discarded() -> TestResult {
        let pricer = Arc::new(GatedPricer::default());
        let gate = pricer.gate();

        let controller = Arc::new(CartController::new(
            MemoryStorage::new(),
            Arc::clone(&pricer) as Arc<dyn CartPricer>,
        ));

        controller.add_item(robe())?;
        let items = controller.snapshot().into_items();

        let request = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_pricing().await }
        });
        pricer.wait_for_calls(1).await;

        controller.add_item(CartLineItem::new("p2", 1))?;

        gate.send(pricing_for(&items, 111))
            .map_err(|_ignored| "gate closed")?;
        request.await?;

        assert!(
            matches!(controller.pricing_state(), PricingState::Stale),
            "pricing computed for the old line items must not become current"
        );

        Ok(())
    }

    #[tokio::test]
    async fn restores_cart_from_storage() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());

        storage.set(
            CART_STORAGE_KEY,
            r#"[{"product_id":"p1","quantity":2,"color":"noir","size":"M"}]"#,
        )?;

        let controller = CartController::new(storage, Arc::new(echo_pricer()));

        assert_eq!(controller.snapshot().items(), &[robe()]);
        assert!(matches!(controller.pricing_state(), PricingState::Stale));

        Ok(())
    }

    #[tokio::test]
    async fn subscribers_see_persisted_snapshot() -> TestResult {
        let (controller, _) = controller(echo_pricer());
        let mut views = controller.subscribe();

        controller.add_item(robe())?;

        views.changed().await?;
        let view = views.borrow_and_update().clone();

        assert_eq!(view.revision, 1);
        assert_eq!(view.snapshot.items(), controller.store().read().as_slice());
        assert!(view.pricing.needs_refresh());

        Ok(())
    }

    #[tokio::test]
    async fn noop_removal_keeps_fresh_pricing() -> TestResult {
        let (controller, _) = controller(echo_pricer());

        controller.add_item(robe())?;
        controller.refresh_pricing().await;

        controller.remove_item("unknown", None, None)?;

        assert!(controller.pricing_state().is_fresh());

        Ok(())
    }

    #[tokio::test]
    async fn checked_add_without_selection_does_not_mutate() -> TestResult {
        let (controller, storage) = controller(echo_pricer());

        let result = controller.add_item_checked(
            CartLineItem::new("p1", 1).with_color("noir"),
            VariantRequirements {
                color: true,
                size: true,
            },
        );

        assert!(
            matches!(
                result,
                Err(CartError::MissingSelection(VariantAttribute::Size))
            ),
            "expected missing size, got {result:?}"
        );
        assert_eq!(controller.item_count(), 0);
        assert_eq!(storage.get(CART_STORAGE_KEY)?, None);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_blocked_until_fresh_and_in_stock() -> TestResult {
        let mut pricer = MockCartPricer::new();

        pricer.expect_compute_totals().once().returning(|items| {
            let mut pricing = pricing_for(items, 300);

            for item in &mut pricing.items {
                item.is_in_stock = false;
            }

            Ok(pricing)
        });
        pricer
            .expect_compute_totals()
            .once()
            .returning(|items| Ok(pricing_for(items, 300)));

        let (controller, _) = controller(pricer);

        assert_eq!(
            controller.checkout_eligibility().err(),
            Some(CheckoutBlocker::EmptyCart)
        );

        controller.add_item(robe())?;

        assert_eq!(
            controller.checkout_eligibility().err(),
            Some(CheckoutBlocker::PricingNotFresh)
        );

        controller.refresh_pricing().await;

        assert_eq!(
            controller.checkout_eligibility().err(),
            Some(CheckoutBlocker::OutOfStock(vec!["p1".to_string()]))
        );

        controller.refresh_pricing().await;

        assert!(controller.checkout_eligibility().is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn pricing_sync_refreshes_after_mutation() -> TestResult {
        let storage = MemoryStorage::new();
        let controller = Arc::new(CartController::new(storage, Arc::new(echo_pricer())));
        let mut views = controller.subscribe();

        let sync = spawn_pricing_sync(&controller);

        controller.add_item(robe())?;

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if views.borrow_and_update().pricing.is_fresh() {
                    break;
                }

                if views.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

        assert!(controller.pricing_state().is_fresh());

        sync.abort();

        Ok(())
    }
}
