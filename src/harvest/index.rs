//! Listing page collection
//!
//! The catalog is a single listing page; every entry row links to one detail
//! page. There is no pagination.

use crate::config::CatalogConfig;
use crate::harvest::document::Document;
use crate::harvest::fetcher::PageFetcher;
use lazy_static::lazy_static;
use scraper::Selector;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

lazy_static! {
    static ref ENTRY_LINKS: Selector =
        Selector::parse("tbody > tr > td.titleColumn > a").unwrap();
}

/// Collects the detail-page URLs listed on the catalog's listing page
pub struct IndexCollector {
    fetcher: Arc<dyn PageFetcher>,
    listing_url: String,
    site_origin: Url,
}

impl IndexCollector {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        listing_url: impl Into<String>,
        site_origin: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            fetcher,
            listing_url: listing_url.into(),
            site_origin: Url::parse(site_origin)?,
        })
    }

    pub fn from_config(
        fetcher: Arc<dyn PageFetcher>,
        config: &CatalogConfig,
    ) -> Result<Self, url::ParseError> {
        Self::new(fetcher, config.listing_url.clone(), &config.site_origin)
    }

    /// Fetches the listing page and returns its detail-page URLs in listing order
    ///
    /// A listing page that cannot be fetched or parsed yields no URLs rather
    /// than an error; callers treat that as a run with no work.
    pub async fn collect_urls(&self) -> Vec<String> {
        let body = match self.fetcher.fetch(&self.listing_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to fetch listing page: {}", e);
                return Vec::new();
            }
        };

        match Document::parse(&self.listing_url, &body) {
            Ok(document) => {
                let urls = detail_urls(&document, &self.site_origin);
                tracing::info!("Listing page {} lists {} entries", self.listing_url, urls.len());
                urls
            }
            Err(e) => {
                tracing::error!("Failed to parse listing page: {}", e);
                Vec::new()
            }
        }
    }
}

/// Resolves every entry link in `document` against `site_origin`
///
/// Links that do not resolve are skipped. A URL listed twice is kept once, at
/// its first position, so each URL identifies exactly one record.
pub fn detail_urls(document: &Document, site_origin: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for href in document.attrs(&ENTRY_LINKS, "href") {
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        match site_origin.join(href) {
            Ok(absolute) => {
                let absolute = absolute.to_string();
                if seen.insert(absolute.clone()) {
                    urls.push(absolute);
                }
            }
            Err(e) => tracing::debug!("Skipping unresolvable link {}: {}", href, e),
        }
    }

    urls
}
