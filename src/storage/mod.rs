use std::fs;
use std::path::{Path, PathBuf};
use crate::sources::models::ReviewRecord;
use crate::sources::Source;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Output file name: `{company}_{source}_reviews.json`, using the company name as given.
    pub fn reviews_file_name(company: &str, source: Source) -> String {
        format!("{}_{}_reviews.json", company, source)
    }

    /// Writes the reviews as a pretty-printed JSON array, replacing any previous file.
    pub fn save_reviews(
        &self,
        company: &str,
        source: Source,
        reviews: &[ReviewRecord],
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(Self::reviews_file_name(company, source));

        let json = serde_json::to_string_pretty(reviews)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} reviews to {}", reviews.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves the raw markup of one fetched page under `debug/`
    pub fn save_debug_page(
        &self,
        slug: &str,
        source: Source,
        page: u32,
        markup: &str,
    ) -> Result<PathBuf, StorageError> {
        let debug_dir = self.base_dir.join("debug");
        if !debug_dir.exists() {
            fs::create_dir_all(&debug_dir)
                .map_err(StorageError::IoError)?;
        }

        let file_path = debug_dir.join(format!("{}_{}_page{}.html", slug, source, page));
        fs::write(&file_path, markup)
            .map_err(StorageError::IoError)?;

        Ok(file_path)
    }
}
