//! Listing browser
//!
//! Holds the listing a shopper is looking at together with the last page fetched for it.
//! Every fetch is stamped with a [`Generation`]; a page that arrives after the query moved on
//! is dropped.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    catalog::{
        models::ProductPage,
        query::{DEFAULT_PAGE_SIZE, ListingQuery},
        service::{CatalogError, ProductCatalog},
    },
    generation::Generation,
};

/// Fetch state of the current listing.
#[derive(Debug, Clone, Default)]
pub enum ListingState {
    /// Nothing fetched for the current query yet.
    #[default]
    Idle,

    /// A fetch is in flight.
    Loading {
        /// Last page shown, kept on screen while the next one loads.
        previous: Option<Arc<ProductPage>>,
    },

    /// The page for the current query.
    Loaded(Arc<ProductPage>),

    /// The last fetch failed; [`CatalogBrowser::retry`] issues it again.
    Failed(Arc<CatalogError>),
}

impl ListingState {
    /// The page to display, if any.
    pub fn page(&self) -> Option<&Arc<ProductPage>> {
        match self {
            Self::Loaded(page)
            | Self::Loading {
                previous: Some(page),
            } => Some(page),
            Self::Idle | Self::Loading { previous: None } | Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct BrowserState {
    query: ListingQuery,
    listing: ListingState,
    generation: Generation,
    last_page: Option<Arc<ProductPage>>,
}

/// Product listing navigation over a [`ProductCatalog`].
pub struct CatalogBrowser {
    catalog: Arc<dyn ProductCatalog>,
    page_size: u32,
    state: Mutex<BrowserState>,
}

impl CatalogBrowser {
    /// Browse `catalog` from the unfiltered first page.
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self::with_query(catalog, ListingQuery::default())
    }

    /// Browse `catalog` starting at `query`, typically restored from a shared link.
    pub fn with_query(catalog: Arc<dyn ProductCatalog>, query: ListingQuery) -> Self {
        Self {
            catalog,
            page_size: DEFAULT_PAGE_SIZE,
            state: Mutex::new(BrowserState {
                query,
                ..BrowserState::default()
            }),
        }
    }

    /// Request `page_size` products per page.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current query.
    pub fn query(&self) -> ListingQuery {
        self.lock().query.clone()
    }

    /// Current fetch state.
    pub fn listing(&self) -> ListingState {
        self.lock().listing.clone()
    }

    /// Change the query, for example with [`ListingQuery::set_category`]. Any fetch in flight
    /// for the previous query is superseded and the listing goes back to
    /// [`ListingState::Idle`] until the new query is loaded.
    pub fn update<F>(&self, change: F) -> ListingQuery
    where
        F: FnOnce(&mut ListingQuery),
    {
        let mut state = self.lock();

        change(&mut state.query);
        state.generation = state.generation.next();
        state.listing = ListingState::Idle;

        state.query.clone()
    }

    /// Fetch the page for the current query.
    pub async fn load(&self) -> ListingState {
        let (generation, query) = {
            let mut state = self.lock();

            state.generation = state.generation.next();
            state.listing = ListingState::Loading {
                previous: state.last_page.clone(),
            };

            (state.generation, state.query.clone())
        };

        let result = self.catalog.list_products(&query, self.page_size).await;

        let mut state = self.lock();

        if state.generation != generation {
            debug!(
                %generation,
                latest = %state.generation,
                "discarding superseded listing response"
            );

            return state.listing.clone();
        }

        state.listing = match result {
            Ok(page) => {
                let page = Arc::new(page);

                state.last_page = Some(Arc::clone(&page));

                ListingState::Loaded(page)
            }
            Err(error) => {
                warn!("product listing failed: {error}");

                ListingState::Failed(Arc::new(error))
            }
        };

        state.listing.clone()
    }

    /// Change the query and fetch its page.
    pub async fn navigate<F>(&self, change: F) -> ListingState
    where
        F: FnOnce(&mut ListingQuery),
    {
        self.update(change);
        self.load().await
    }

    /// Fetch the current query again after a failure.
    pub async fn retry(&self) -> ListingState {
        self.load().await
    }
}

impl Debug for CatalogBrowser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CatalogBrowser")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use testresult::TestResult;
    use tokio::sync::oneshot;

    use crate::catalog::{
        filters::ProductSort,
        models::{Brand, Category, ProductDetail},
        service::MockProductCatalog,
    };

    use super::*;

    fn page(number: u32) -> ProductPage {
        ProductPage {
            products: Vec::new(),
            total: 45,
            page: number,
            size: 20,
            total_pages: 3,
            has_next: number < 3,
            has_prev: number > 1,
        }
    }

    #[tokio::test]
    async fn loads_with_query_and_page_size() -> TestResult {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_list_products()
            .once()
            .withf(|query, page_size| {
                query.filters().category.as_deref() == Some("robes")
                    && query.sort() == ProductSort::PriceAsc
                    && *page_size == 12
            })
            .return_once(|query, _| Ok(page(query.page())));

        let browser = CatalogBrowser::new(Arc::new(catalog)).page_size(12);

        let state = browser
            .navigate(|query| {
                query.set_category(Some("robes".to_string()));
                query.set_sort(ProductSort::PriceAsc);
            })
            .await;

        assert_eq!(state.page().map(|page| page.page), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn failure_is_retryable() -> TestResult {
        let mut catalog = MockProductCatalog::new();

        catalog.expect_list_products().once().return_once(|_, _| {
            Err(CatalogError::UnexpectedResponse {
                status: 502,
                message: "bad gateway".to_string(),
            })
        });
        catalog
            .expect_list_products()
            .once()
            .return_once(|_, _| Ok(page(1)));

        let browser = CatalogBrowser::new(Arc::new(catalog));

        let state = browser.load().await;

        assert!(
            matches!(state, ListingState::Failed(_)),
            "expected failure, got {state:?}"
        );

        let state = browser.retry().await;

        assert!(matches!(state, ListingState::Loaded(_)), "got {state:?}");

        Ok(())
    }

    #[derive(Debug, Default)]
    struct GatedCatalog {
        gates: Mutex<VecDeque<oneshot::Receiver<ProductPage>>>,
        started: Mutex<usize>,
    }

    impl GatedCatalog {
        fn gate(&self) -> oneshot::Sender<ProductPage> {
            let (sender, receiver) = oneshot::channel();

            self.gates
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(receiver);

            sender
        }

        async fn wait_for_calls(&self, calls: usize) {
            while *self.started.lock().unwrap_or_else(PoisonError::into_inner) < calls {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl ProductCatalog for GatedCatalog {
        async fn list_products(
            &self,
            _query: &ListingQuery,
            _page_size: u32,
        ) -> Result<ProductPage, CatalogError> {
            let gate = self
                .gates
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            *self.started.lock().unwrap_or_else(PoisonError::into_inner) += 1;

            let Some(gate) = gate else {
                return Err(CatalogError::NotFound);
            };

            gate.await
                .map_err(|error| CatalogError::Transport(Box::new(error)))
        }

        async fn get_product(&self, _product_id: &str) -> Result<ProductDetail, CatalogError> {
            Err(CatalogError::NotFound)
        }

        async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
            Ok(Vec::new())
        }

        async fn brands(&self) -> Result<Vec<Brand>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn page_for_superseded_query_is_dropped() -> TestResult {
        let catalog = Arc::new(GatedCatalog::default());
        let first = catalog.gate();

        let browser = Arc::new(CatalogBrowser::new(
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>
        ));

        let request = tokio::spawn({
            let browser = Arc::clone(&browser);
            async move { browser.load().await }
        });
        catalog.wait_for_calls(1).await;

        browser.update(|query| query.set_page(2));

        first.send(page(1)).map_err(|_ignored| "gate closed")?;
        request.await?;

        assert!(
            matches!(browser.listing(), ListingState::Idle),
            "page 1 must not be shown for a page 2 query, got {:?}",
            browser.listing()
        );
        assert_eq!(browser.query().page(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn changing_query_retires_loaded_page() -> TestResult {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_list_products()
            .once()
            .return_once(|_, _| Ok(page(1)));
        catalog
            .expect_list_products()
            .once()
            .withf(|query, _| query.filters().category.as_deref() == Some("jupes"))
            .return_once(|_, _| Ok(page(1)));

        let browser = CatalogBrowser::new(Arc::new(catalog));

        browser.load().await;
        browser.update(|query| query.set_category(Some("jupes".to_string())));

        let listing = browser.listing();

        assert!(
            matches!(listing, ListingState::Idle),
            "page for the old query reported as current: {listing:?}"
        );
        assert!(listing.page().is_none(), "no page belongs to the new query yet");

        let state = browser.load().await;

        assert!(
            matches!(state, ListingState::Loaded(_)),
            "expected the new query to load, got {state:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn loading_keeps_previous_page_visible() -> TestResult {
        let catalog = Arc::new(GatedCatalog::default());
        let first = catalog.gate();
        let second = catalog.gate();

        let browser = Arc::new(CatalogBrowser::new(
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>
        ));

        first.send(page(1)).map_err(|_ignored| "gate closed")?;
        browser.load().await;

        let request = tokio::spawn({
            let browser = Arc::clone(&browser);
            async move { browser.navigate(|query| query.set_page(2)).await }
        });
        catalog.wait_for_calls(2).await;

        assert_eq!(
            browser.listing().page().map(|page| page.page),
            Some(1),
            "previous page stays visible while loading"
        );

        second.send(page(2)).map_err(|_ignored| "gate closed")?;

        let state = request.await?;

        assert_eq!(state.page().map(|page| page.page), Some(2));

        Ok(())
    }
}
