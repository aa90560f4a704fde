// src/sources/mod.rs
pub mod client;
pub mod models;

use std::fmt;

use clap::ValueEnum;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::Selector;

use crate::utils::error::FetchError;

// --- CSS Selectors (Lazy Static) ---
static G2_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.paper").expect("Failed to compile G2_BLOCK_SELECTOR")
});

static CAPTERRA_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.review").expect("Failed to compile CAPTERRA_BLOCK_SELECTOR")
});

/// Review website to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    G2,
    Capterra,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::G2 => "g2",
            Source::Capterra => "capterra",
        }
    }

    /// The per-site variation point: everything else in the pipeline is shared.
    pub fn profile(&self) -> SourceProfile {
        match self {
            Source::G2 => SourceProfile {
                url_template: "https://www.g2.com/products/{slug}/reviews",
                block_selector: &G2_BLOCK_SELECTOR,
            },
            Source::Capterra => SourceProfile {
                url_template: "https://www.capterra.com/p/{slug}/reviews/",
                block_selector: &CAPTERRA_BLOCK_SELECTOR,
            },
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SourceProfile {
    url_template: &'static str,
    pub block_selector: &'static Selector,
}

impl SourceProfile {
    /// Builds the listing URL for one page (1-based).
    pub fn page_url(&self, slug: &str, page: u32) -> Result<Url, FetchError> {
        let base = self.url_template.replace("{slug}", slug);
        Url::parse_with_params(&base, &[("page", page.to_string())])
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
    }
}

/// Lowercases the company name and replaces spaces with hyphens.
pub fn slugify(company: &str) -> String {
    company.to_lowercase().replace(' ', "-")
}
