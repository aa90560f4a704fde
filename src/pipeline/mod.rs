// src/pipeline/mod.rs
use chrono::NaiveDate;
use scraper::Html;

use crate::extractors::ReviewExtractor;
use crate::sources::client::PageFetcher;
use crate::sources::models::{DateRange, ReviewRecord};
use crate::sources::{slugify, Source, SourceProfile};
use crate::storage::StorageManager;
use crate::utils::error::FetchError;

pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Inclusive on both ends.
pub fn in_range(date: NaiveDate, range: &DateRange) -> bool {
    range.contains(date)
}

/// Drives the page loop for one source: fetch, extract, filter, accumulate.
pub struct ReviewPipeline<'a, F: PageFetcher> {
    fetcher: &'a F,
    max_pages: u32,
    debug_storage: Option<&'a StorageManager>,
}

impl<'a, F: PageFetcher> ReviewPipeline<'a, F> {
    pub fn new(fetcher: &'a F, max_pages: u32) -> Self {
        Self {
            fetcher,
            max_pages,
            debug_storage: None,
        }
    }

    /// Saves every fetched page under the storage debug directory.
    pub fn with_debug_storage(mut self, storage: &'a StorageManager) -> Self {
        self.debug_storage = Some(storage);
        self
    }

    /// Scrapes pages `1..=max_pages` in order and returns the in-range reviews.
    ///
    /// The first failed fetch ends the loop; reviews collected before it are kept.
    /// Never fails: zero pages or zero reviews is just an empty result.
    pub async fn scrape(&self, source: Source, company: &str, range: &DateRange) -> Vec<ReviewRecord> {
        let profile = source.profile();
        let slug = slugify(company);
        let extractor = ReviewExtractor::new(profile.block_selector);
        let mut reviews = Vec::new();

        tracing::info!(
            "Scraping {} reviews for '{}' ({}) between {} and {}, up to {} pages",
            source, company, slug, range.start, range.end, self.max_pages
        );

        for page in 1..=self.max_pages {
            let markup = match self.fetch(&profile, &slug, page).await {
                Ok(markup) => markup,
                Err(e) => {
                    tracing::warn!("Stopping at page {}: {}", page, e);
                    break;
                }
            };

            if let Some(storage) = self.debug_storage {
                match storage.save_debug_page(&slug, source, page, &markup) {
                    Ok(path) => tracing::debug!("Saved raw page to: {}", path.display()),
                    Err(e) => tracing::warn!("Failed to save debug page {}: {}", page, e),
                }
            }

            let stats = collect_page(&extractor, &markup, range, &mut reviews);
            tracing::info!(
                "Page {}: {} blocks, {} malformed, kept {} reviews ({} total)",
                page, stats.blocks, stats.malformed, stats.kept, reviews.len()
            );
        }

        reviews
    }

    async fn fetch(&self, profile: &SourceProfile, slug: &str, page: u32) -> Result<String, FetchError> {
        let url = profile.page_url(slug, page)?;
        self.fetcher.fetch_page(&url).await
    }
}

/// Block tallies for one page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PageStats {
    blocks: usize,
    malformed: usize,
    kept: usize,
}

/// Extracts one page and appends its in-range reviews, in a single pass over the blocks.
fn collect_page(
    extractor: &ReviewExtractor,
    markup: &str,
    range: &DateRange,
    reviews: &mut Vec<ReviewRecord>,
) -> PageStats {
    let document = Html::parse_document(markup);
    let mut stats = PageStats::default();

    for result in extractor.extract(&document) {
        stats.blocks += 1;
        match result {
            Ok(record) if in_range(record.date, range) => {
                reviews.push(record);
                stats.kept += 1;
            }
            Ok(record) => tracing::debug!("Skipping out-of-range review dated {}", record.date),
            Err(e) => {
                stats.malformed += 1;
                tracing::debug!("Skipping malformed review block: {}", e);
            }
        }
    }

    if stats.blocks == 0 {
        tracing::warn!("No review blocks found on page; the site layout may have changed");
    } else if stats.malformed == stats.blocks {
        tracing::warn!(
            "All {} review blocks on page were malformed; the block layout may have changed",
            stats.blocks
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::client::testing::ScriptedFetcher;
    use reqwest::StatusCode;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year_2023() -> DateRange {
        DateRange::new(ymd(2023, 1, 1), ymd(2023, 12, 31))
    }

    fn block(title: &str, date: &str) -> String {
        format!(
            r#"<div class="paper"><h3>{}</h3><p>body of {}</p><time datetime="{}">x</time></div>"#,
            title, title, date
        )
    }

    fn page(blocks: &[String]) -> String {
        format!("<html><body>{}</body></html>", blocks.concat())
    }

    #[test]
    fn test_in_range_boundaries() {
        let range = year_2023();
        assert!(in_range(ymd(2023, 1, 1), &range));
        assert!(in_range(ymd(2023, 12, 31), &range));
        assert!(in_range(ymd(2023, 6, 15), &range));
        assert!(!in_range(ymd(2022, 12, 31), &range));
        assert!(!in_range(ymd(2024, 1, 1), &range));
    }

    #[test]
    fn test_page_stats() {
        let extractor = ReviewExtractor::new(Source::G2.profile().block_selector);
        let mut reviews = Vec::new();

        let mixed = page(&[
            block("In", "2023-04-04"),
            block("Out", "2021-04-04"),
            r#"<div class="paper"><h3>No date</h3><p>x</p></div>"#.to_string(),
        ]);
        let stats = collect_page(&extractor, &mixed, &year_2023(), &mut reviews);
        assert_eq!(stats, PageStats { blocks: 3, malformed: 1, kept: 1 });

        let all_malformed = page(&[
            r#"<div class="paper"><p>no title</p></div>"#.to_string(),
            r#"<div class="paper"><h3>Bad</h3><p>x</p><time datetime="soon">x</time></div>"#.to_string(),
        ]);
        let stats = collect_page(&extractor, &all_malformed, &year_2023(), &mut reviews);
        assert_eq!(stats, PageStats { blocks: 2, malformed: 2, kept: 0 });

        let no_blocks = page(&[r#"<div class="review"><h3>Other site</h3></div>"#.to_string()]);
        let stats = collect_page(&extractor, &no_blocks, &year_2023(), &mut reviews);
        assert_eq!(stats, PageStats::default());

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].title, "In");
    }

    #[test]
    fn test_filters_and_preserves_order() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page(&[block("A", "2023-03-01"), block("Old", "2022-12-01"), block("B", "2023-02-01")])),
            Ok(page(&[block("C", "2023-12-31"), block("Future", "2024-01-01")])),
            Ok(page(&[block("D", "2023-01-01")])),
        ]);
        let pipeline = ReviewPipeline::new(&fetcher, DEFAULT_MAX_PAGES);

        let reviews = tokio_test::block_on(pipeline.scrape(Source::G2, "Acme Inc", &year_2023()));

        let titles: Vec<&str> = reviews.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[test]
    fn test_stop_on_page_two_keeps_page_one() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page(&[block("Kept", "2023-05-05")])),
            Err(StatusCode::SERVICE_UNAVAILABLE),
            Ok(page(&[block("Never fetched", "2023-05-06")])),
        ]);
        let pipeline = ReviewPipeline::new(&fetcher, 3);

        let reviews = tokio_test::block_on(pipeline.scrape(Source::G2, "Acme Inc", &year_2023()));

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].title, "Kept");
        assert_eq!(fetcher.calls().len(), 2, "page 3 must not be attempted");
    }

    #[tokio::test]
    async fn test_never_exceeds_max_pages() {
        let pages = (0..10).map(|_| Ok(page(&[block("X", "2023-07-07")]))).collect();
        let fetcher = ScriptedFetcher::new(pages);
        let pipeline = ReviewPipeline::new(&fetcher, 3);

        let reviews = pipeline.scrape(Source::Capterra, "Acme Inc", &year_2023()).await;

        // Capterra blocks are div.review, so the G2-style markup yields nothing.
        assert!(reviews.is_empty());
        let calls = fetcher.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].as_str(), "https://www.capterra.com/p/acme-inc/reviews/?page=1");
        assert_eq!(calls[2].as_str(), "https://www.capterra.com/p/acme-inc/reviews/?page=3");
    }

    #[tokio::test]
    async fn test_first_page_failure_yields_empty() {
        let fetcher = ScriptedFetcher::new(vec![Err(StatusCode::FORBIDDEN)]);
        let pipeline = ReviewPipeline::new(&fetcher, 3);

        let reviews = pipeline.scrape(Source::G2, "Acme Inc", &year_2023()).await;

        assert!(reviews.is_empty());
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_inverted_range_yields_empty() {
        let fetcher = ScriptedFetcher::new(vec![Ok(page(&[block("A", "2023-06-15")]))]);
        let pipeline = ReviewPipeline::new(&fetcher, 1);
        let inverted = DateRange::new(ymd(2023, 12, 31), ymd(2023, 1, 1));

        let reviews = pipeline.scrape(Source::G2, "Acme Inc", &inverted).await;

        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn test_debug_pages_are_saved() {
        let dir = std::env::temp_dir().join(format!("review_scraper_pipeline_{}", std::process::id()));
        let storage = StorageManager::new(&dir).unwrap();
        let markup = page(&[block("A", "2023-06-15")]);
        let fetcher = ScriptedFetcher::new(vec![Ok(markup.clone())]);
        let pipeline = ReviewPipeline::new(&fetcher, 2).with_debug_storage(&storage);

        let reviews = pipeline.scrape(Source::G2, "Acme Inc", &year_2023()).await;

        assert_eq!(reviews.len(), 1);
        let saved = std::fs::read_to_string(dir.join("debug").join("acme-inc_g2_page1.html")).unwrap();
        assert_eq!(saved, markup);
        assert!(!dir.join("debug").join("acme-inc_g2_page2.html").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
