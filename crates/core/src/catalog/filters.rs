//! Listing filters and sort orders

use std::{
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Constraints on a product listing. `None` and `false` leave a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Category slug.
    pub category: Option<String>,

    /// Subcategory within [`ProductFilters::category`].
    pub subcategory: Option<String>,

    /// Restrict to one boutique.
    pub boutique_id: Option<String>,

    /// Brand name.
    pub brand: Option<String>,

    /// Lowest acceptable current price.
    pub min_price: Option<Decimal>,

    /// Highest acceptable current price.
    pub max_price: Option<Decimal>,

    /// Color name.
    pub color: Option<String>,

    /// Size label.
    pub size: Option<String>,

    /// Item condition, such as `new` or `used`.
    pub condition: Option<String>,

    /// Free-text search.
    pub search: Option<String>,

    /// Only products currently in stock.
    #[serde(default)]
    pub in_stock_only: bool,

    /// Only featured products.
    #[serde(default)]
    pub is_featured: bool,

    /// Only trending products.
    #[serde(default)]
    pub is_trending: bool,
}

impl ProductFilters {
    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Service-defined relevance.
    #[default]
    Relevance,

    /// Cheapest first.
    PriceAsc,

    /// Most expensive first.
    PriceDesc,

    /// Most recently listed first.
    Newest,

    /// Oldest listing first.
    Oldest,

    /// Most viewed first.
    Popularity,

    /// Best rated first.
    Rating,

    /// Best selling first.
    Sales,
}

impl ProductSort {
    /// Every sort order, in menu order.
    pub const ALL: [Self; 8] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Newest,
        Self::Oldest,
        Self::Popularity,
        Self::Rating,
        Self::Sales,
    ];

    /// Wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popularity => "popularity",
            Self::Rating => "rating",
            Self::Sales => "sales",
        }
    }
}

impl Display for ProductSort {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unknown values fall back to [`ProductSort::Relevance`].
impl FromStr for ProductSort {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == value)
            .unwrap_or_default())
    }
}
