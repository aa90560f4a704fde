// src/sources/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder reviewer name; listing pages are not mined for reviewer identity.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// One normalized customer review, as written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: String,
    #[serde(rename = "review")]
    pub body: String,
    pub date: NaiveDate, // Serialized as YYYY-MM-DD
    pub rating: Option<f32>, // Never extracted, always null
    pub reviewer: String,
}

impl ReviewRecord {
    pub fn new(title: String, body: String, date: NaiveDate) -> Self {
        Self {
            title,
            body,
            date,
            rating: None,
            reviewer: ANONYMOUS_REVIEWER.to_string(),
        }
    }
}

/// Inclusive date window. `start <= end` is not enforced; an inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
