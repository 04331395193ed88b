// src/source/html_list.rs

//! Selector-driven scraper for paginated HTML list pages.
//!
//! Walks `base_url`, `base_url + "page/2/"`, ... and extracts one item per
//! configured row. A single unreachable page is logged and skipped; the
//! whole fetch fails only when no page could be read.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::config::{FetchConfig, SourceSpec};
use crate::error::{AppError, Result};
use crate::models::Item;
use crate::source::ContentSource;

/// Scraper over the configured list pages.
pub struct HtmlListSource {
    spec: SourceSpec,
    client: Client,
    row_selector: Selector,
    link_selector: Selector,
    exclude: Option<Regex>,
    max_concurrent: usize,
    request_delay: Duration,
}

impl HtmlListSource {
    /// Build the source, compiling selectors and the exclude pattern up
    /// front so configuration mistakes surface before any request is made.
    pub fn new(spec: SourceSpec, fetch: &FetchConfig) -> Result<Self> {
        spec.validate()?;

        let client = Client::builder()
            .user_agent(&fetch.user_agent)
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()?;

        let row_selector = parse_selector(&spec.row_selector)?;
        let link_selector = parse_selector(&spec.link_selector)?;
        let exclude = spec
            .exclude_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| AppError::config(format!("bad exclude pattern: {e}")))?;

        Ok(Self {
            client,
            row_selector,
            link_selector,
            exclude,
            max_concurrent: fetch.max_concurrent.max(1),
            request_delay: Duration::from_millis(fetch.request_delay_ms),
            spec,
        })
    }

    /// Fetch one list page and return its items in document order.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Item>> {
        let url = self.spec.page_url(page);
        let html = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::fetch(&url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(&url, e))?
            .text()
            .await
            .map_err(|e| AppError::fetch(&url, e))?;

        self.parse_page(&url, &html)
    }

    /// Extract items from a fetched list page.
    fn parse_page(&self, page_url: &str, html: &str) -> Result<Vec<Item>> {
        let document = Html::parse_document(html);
        let base = url::Url::parse(page_url)?;

        let mut items = Vec::new();
        for row in document.select(&self.row_selector) {
            let link_elem = row
                .select(&self.link_selector)
                .next()
                .or_else(|| Some(row).filter(|r| r.value().name() == "a"));

            let Some(link_elem) = link_elem else {
                continue;
            };
            let Some(raw_link) = link_elem.value().attr(self.spec.attr_name.as_str()) else {
                continue;
            };

            let title = normalize_text(&link_elem.text().collect::<String>());
            if title.is_empty() {
                continue;
            }

            let link = resolve_url(&base, raw_link);
            items.push(Item::new(link, title));
        }
        Ok(items)
    }

    /// Whether a URL is filtered out by the exclude pattern.
    fn is_excluded(&self, url: &str) -> bool {
        self.exclude.as_ref().is_some_and(|re| re.is_match(url))
    }
}

impl HtmlListSource {
    /// Fetch pages one at a time, sleeping between requests so no two
    /// hit the site back to back.
    async fn fetch_pages_sequential(&self) -> Vec<(u32, Result<Vec<Item>>)> {
        let mut results = Vec::with_capacity(self.spec.pages as usize);
        for page in 1..=self.spec.pages {
            if page > 1 {
                tokio::time::sleep(self.request_delay).await;
            }
            results.push((page, self.fetch_page(page).await));
        }
        results
    }

    /// Fetch pages concurrently, bounded by `max_concurrent`. Only used
    /// when no politeness delay is configured.
    async fn fetch_pages_concurrent(&self) -> Vec<(u32, Result<Vec<Item>>)> {
        stream::iter(1..=self.spec.pages)
            .map(|page| async move { (page, self.fetch_page(page).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}

#[async_trait]
impl ContentSource for HtmlListSource {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let pages = self.spec.pages;
        let page_results = if self.request_delay.is_zero() {
            self.fetch_pages_concurrent().await
        } else {
            self.fetch_pages_sequential().await
        };

        let mut items = Vec::new();
        let mut failures = 0usize;
        for (page, result) in page_results {
            match result {
                Ok(page_items) => {
                    log::debug!("Page {page}: {} rows", page_items.len());
                    items.extend(page_items);
                }
                Err(error) => {
                    failures += 1;
                    log::warn!("Failed to fetch list page {page}: {error}");
                }
            }
        }

        if failures as u32 == pages {
            return Err(AppError::fetch(
                &self.spec.base_url,
                format!("all {pages} list pages failed"),
            ));
        }

        let before = items.len();
        items.retain(|item| !self.is_excluded(&item.url));
        if items.len() < before {
            log::debug!("Excluded {} items by URL pattern", before - items.len());
        }

        log::info!("Fetched {} candidate items", items.len());
        Ok(items)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Collapse runs of whitespace and trim.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly relative link against the page URL.
fn resolve_url(base: &url::Url, raw: &str) -> String {
    match base.join(raw) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(spec: SourceSpec) -> HtmlListSource {
        HtmlListSource::new(spec, &FetchConfig::default()).unwrap()
    }

    fn default_source() -> HtmlListSource {
        source_with(SourceSpec::default())
    }

    const LIST_PAGE: &str = r#"
        <html><body>
        <h1 id="list"><a href="https://www.gktoday.in/first-article/">First  Article</a></h1>
        <h1 id="list"><a href="/second-article/">Second
            Article</a></h1>
        <h1 id="list"><a href="https://www.gktoday.in/daily-current-affairs-quiz-june-1/">Quiz</a></h1>
        <h1>Not a list row</h1>
        </body></html>
    "#;

    #[test]
    fn test_parse_page_extracts_rows_in_order() {
        let source = default_source();
        let items = source
            .parse_page("https://www.gktoday.in/current-affairs/", LIST_PAGE)
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].url, "https://www.gktoday.in/first-article/");
        assert_eq!(items[0].title, "First Article");
    }

    #[test]
    fn test_parse_page_resolves_relative_links() {
        let source = default_source();
        let items = source
            .parse_page("https://www.gktoday.in/current-affairs/", LIST_PAGE)
            .unwrap();
        assert_eq!(items[1].url, "https://www.gktoday.in/second-article/");
        assert_eq!(items[1].title, "Second Article");
    }

    #[test]
    fn test_exclude_pattern_matches_quiz_urls() {
        let source = default_source();
        assert!(source.is_excluded("https://www.gktoday.in/daily-current-affairs-quiz-june-1/"));
        assert!(!source.is_excluded("https://www.gktoday.in/first-article/"));
    }

    #[test]
    fn test_parse_page_skips_rows_without_links() {
        let mut spec = SourceSpec::default();
        spec.row_selector = "h1".to_string();
        let source = source_with(spec);
        let items = source
            .parse_page("https://www.gktoday.in/current-affairs/", LIST_PAGE)
            .unwrap();
        // The bare <h1> has no anchor and is dropped.
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_new_rejects_bad_selector() {
        let mut spec = SourceSpec::default();
        spec.row_selector = "[[invalid".to_string();
        assert!(HtmlListSource::new(spec, &FetchConfig::default()).is_err());
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a \n b\tc  "), "a b c");
    }

    /// Nothing listens on port 1; every connect is refused immediately.
    fn unreachable_spec(pages: u32) -> SourceSpec {
        let mut spec = SourceSpec::default();
        spec.base_url = "http://127.0.0.1:1/".to_string();
        spec.pages = pages;
        spec
    }

    #[tokio::test]
    async fn test_all_pages_failing_is_a_fetch_error() {
        let mut fetch = FetchConfig::default();
        fetch.request_delay_ms = 0;
        let source = HtmlListSource::new(unreachable_spec(2), &fetch).unwrap();

        let err = source.fetch_latest().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_separates_sequential_fetches() {
        let mut fetch = FetchConfig::default();
        fetch.request_delay_ms = 200;
        let source = HtmlListSource::new(unreachable_spec(3), &fetch).unwrap();

        let started = tokio::time::Instant::now();
        let _ = source.fetch_latest().await;

        // Three pages means two inter-request waits; with anything less
        // the requests were fired together.
        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
