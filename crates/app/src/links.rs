//! Shareable listing links

use modedz::catalog::{ListingQuery, from_query_params};
use reqwest::Url;

/// Conversions between a [`ListingQuery`] and the URL a shopper can share.
pub trait ListingLinkExt {
    /// `base` with its query replaced by this listing. An untouched listing has no query.
    fn share_url(&self, base: &Url) -> Url;

    /// Listing described by the query of `url`.
    fn from_url(url: &Url) -> Self;
}

impl ListingLinkExt for ListingQuery {
    fn share_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let params = self.to_query_params();

        url.set_query(None);
        url.set_fragment(None);

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        url
    }

    fn from_url(url: &Url) -> Self {
        from_query_params(url.query_pairs())
    }
}
