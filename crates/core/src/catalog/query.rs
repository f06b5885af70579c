//! Listing query translation
//!
//! A [`ListingQuery`] is the filter, sort and page a shopper is looking at. It serialises to
//! the query parameters of a shareable listing URL and back without loss, and to the
//! parameters of a request against the listing service.

use std::str::FromStr;

use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::debug;

use crate::catalog::filters::{ProductFilters, ProductSort};

/// Ordered query parameters.
pub type QueryParams = SmallVec<[(&'static str, String); 8]>;

/// Page size requested from the listing service unless told otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Category slug.
pub const CATEGORY: &str = "category";
/// Subcategory name.
pub const SUBCATEGORY: &str = "subcategory";
/// Boutique identifier.
pub const BOUTIQUE_ID: &str = "boutique_id";
/// Brand name.
pub const BRAND: &str = "brand";
/// Lowest price.
pub const MIN_PRICE: &str = "min_price";
/// Highest price.
pub const MAX_PRICE: &str = "max_price";
/// Color name.
pub const COLOR: &str = "color";
/// Size filter, also the page size on service requests.
pub const SIZE: &str = "size";
/// Item condition.
pub const CONDITION: &str = "condition";
/// Free-text search.
pub const SEARCH: &str = "search";
/// In-stock flag.
pub const IN_STOCK_ONLY: &str = "in_stock_only";
/// Featured flag.
pub const IS_FEATURED: &str = "is_featured";
/// Trending flag.
pub const IS_TRENDING: &str = "is_trending";
/// Sort order.
pub const SORT: &str = "sort";
/// Page number, starting at 1.
pub const PAGE: &str = "page";

/// Query parameters for a shareable listing URL.
///
/// Unconstrained filters are left out, as are the default sort and the first page, so an
/// untouched listing serialises to nothing at all.
pub fn to_query_params(filters: &ProductFilters, sort: ProductSort, page: u32) -> QueryParams {
    let mut params = filter_params(filters);

    if sort != ProductSort::Relevance {
        params.push((SORT, sort.as_str().to_string()));
    }

    if page != 1 {
        params.push((PAGE, page.to_string()));
    }

    params
}

/// Rebuild a listing query from URL query parameters.
///
/// Unknown keys are ignored, the first occurrence of a repeated key wins and empty values
/// count as absent. Numbers that do not parse are dropped; a page that is not a positive
/// integer becomes page 1.
pub fn from_query_params<I, K, V>(params: I) -> ListingQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let params: SmallVec<[(K, V); 16]> = params.into_iter().collect();

    let lookup = |key: &str| {
        params
            .iter()
            .find(|(name, _)| name.as_ref() == key)
            .map(|(_, value)| value.as_ref())
            .filter(|value| !value.is_empty())
    };

    let text = |key: &str| lookup(key).map(str::to_string);
    let flag = |key: &str| lookup(key) == Some("true");
    let amount = |key: &str| {
        lookup(key).and_then(|value| match Decimal::from_str(value) {
            Ok(amount) => Some(amount),
            Err(error) => {
                debug!(key, value, "ignoring unparseable price: {error}");

                None
            }
        })
    };

    let filters = ProductFilters {
        category: text(CATEGORY),
        subcategory: text(SUBCATEGORY),
        boutique_id: text(BOUTIQUE_ID),
        brand: text(BRAND),
        min_price: amount(MIN_PRICE),
        max_price: amount(MAX_PRICE),
        color: text(COLOR),
        size: text(SIZE),
        condition: text(CONDITION),
        search: text(SEARCH),
        in_stock_only: flag(IN_STOCK_ONLY),
        is_featured: flag(IS_FEATURED),
        is_trending: flag(IS_TRENDING),
    };

    let sort = lookup(SORT)
        .and_then(|value| value.parse().ok())
        .unwrap_or_default();

    let page = lookup(PAGE)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1);

    ListingQuery {
        filters,
        sort,
        page,
    }
}

fn filter_params(filters: &ProductFilters) -> QueryParams {
    let mut params = QueryParams::new();

    let min_price = filters.min_price.map(|amount| amount.to_string());
    let max_price = filters.max_price.map(|amount| amount.to_string());

    let values = [
        (CATEGORY, filters.category.as_deref()),
        (SUBCATEGORY, filters.subcategory.as_deref()),
        (BOUTIQUE_ID, filters.boutique_id.as_deref()),
        (BRAND, filters.brand.as_deref()),
        (MIN_PRICE, min_price.as_deref()),
        (MAX_PRICE, max_price.as_deref()),
        (COLOR, filters.color.as_deref()),
        (SIZE, filters.size.as_deref()),
        (CONDITION, filters.condition.as_deref()),
        (SEARCH, filters.search.as_deref()),
        (IN_STOCK_ONLY, filters.in_stock_only.then_some("true")),
        (IS_FEATURED, filters.is_featured.then_some("true")),
        (IS_TRENDING, filters.is_trending.then_some("true")),
    ];

    for (key, value) in values {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            params.push((key, value.to_string()));
        }
    }

    params
}

/// The listing a shopper is looking at: filters, sort order and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    filters: ProductFilters,
    sort: ProductSort,
    page: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            filters: ProductFilters::default(),
            sort: ProductSort::default(),
            page: 1,
        }
    }
}

impl ListingQuery {
    /// First page of the given filters and sort.
    pub fn new(filters: ProductFilters, sort: ProductSort) -> Self {
        Self {
            filters,
            sort,
            page: 1,
        }
    }

    /// Active filters.
    pub fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    /// Active sort order.
    pub fn sort(&self) -> ProductSort {
        self.sort
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Select a category. The subcategory belongs to the previous category and is cleared.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category;
        self.filters.subcategory = None;
        self.page = 1;
    }

    /// Select a subcategory within the current category.
    pub fn set_subcategory(&mut self, subcategory: Option<String>) {
        self.filters.subcategory = subcategory;
        self.page = 1;
    }

    /// Replace the filters and return to the first page.
    ///
    /// If the category changed but the subcategory did not, the stale subcategory is
    /// dropped in the same update.
    pub fn update_filters(&mut self, mut filters: ProductFilters) {
        if filters.category != self.filters.category
            && filters.subcategory == self.filters.subcategory
        {
            filters.subcategory = None;
        }

        self.filters = filters;
        self.page = 1;
    }

    /// Change the sort order and return to the first page.
    pub fn set_sort(&mut self, sort: ProductSort) {
        self.sort = sort;
        self.page = 1;
    }

    /// Move to another page, keeping filters and sort. Page 0 is treated as page 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Drop every filter and return to the first page. The sort order is kept.
    pub fn clear_filters(&mut self) {
        self.filters = ProductFilters::default();
        self.page = 1;
    }

    /// Query parameters for a shareable listing URL.
    pub fn to_query_params(&self) -> QueryParams {
        to_query_params(&self.filters, self.sort, self.page)
    }

    /// Query parameters for a request against the listing service.
    ///
    /// The service always receives the page, page size and sort. It reads both the page size
    /// and the size filter from `size`; when a size filter is set it takes that slot and the
    /// service falls back to its own page size.
    pub fn service_params(&self, page_size: u32) -> QueryParams {
        let mut params = QueryParams::new();

        params.push((PAGE, self.page.to_string()));

        if self.filters.size.as_deref().is_none_or(str::is_empty) {
            params.push((SIZE, page_size.to_string()));
        }

        params.push((SORT, self.sort.as_str().to_string()));
        params.extend(filter_params(&self.filters));

        params
    }
}
