// src/extractors/review.rs

// --- Imports ---
use crate::sources::models::ReviewRecord;
use crate::utils::error::ExtractError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- Constants ---
// Length of "YYYY-MM-DD"; datetime attributes usually carry a time component as well.
const DAY_PRECISION_LEN: usize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h3").expect("Failed to compile TITLE_SELECTOR")
});

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to compile BODY_SELECTOR")
});

static TIME_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("time").expect("Failed to compile TIME_SELECTOR")
});

/// Turns listing markup into review records.
///
/// Blocks are handled independently: a block missing its title, body or date
/// yields an `Err` item and never affects its siblings.
pub struct ReviewExtractor {
    block_selector: &'static Selector,
}

impl ReviewExtractor {
    pub fn new(block_selector: &'static Selector) -> Self {
        Self { block_selector }
    }

    /// Lazily extracts one result per review block, in document order.
    pub fn extract<'a>(
        &self,
        document: &'a Html,
    ) -> impl Iterator<Item = Result<ReviewRecord, ExtractError>> + 'a {
        let selector = self.block_selector;
        document.select(selector).map(extract_block)
    }
}

fn extract_block(block: ElementRef<'_>) -> Result<ReviewRecord, ExtractError> {
    let title = first_text(block, &TITLE_SELECTOR, "h3")?;
    let body = first_text(block, &BODY_SELECTOR, "p")?;

    let time = block
        .select(&TIME_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingElement("time"))?;
    let datetime = time
        .value()
        .attr("datetime")
        .ok_or(ExtractError::MissingDateAttribute)?;
    let date = parse_day(datetime)?;

    Ok(ReviewRecord::new(title, body, date))
}

fn first_text(
    block: ElementRef<'_>,
    selector: &Selector,
    tag: &'static str,
) -> Result<String, ExtractError> {
    block
        .select(selector)
        .next()
        .map(stripped_text)
        .ok_or(ExtractError::MissingElement(tag))
}

/// Trims every text fragment, drops the empty ones and concatenates the rest.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Parses the leading `YYYY-MM-DD` of a machine-readable datetime value.
fn parse_day(datetime: &str) -> Result<NaiveDate, ExtractError> {
    let day: String = datetime.chars().take(DAY_PRECISION_LEN).collect();
    NaiveDate::parse_from_str(&day, DATE_FORMAT)
        .map_err(|_| ExtractError::InvalidDate(datetime.to_string()))
}
