// src/extractors/mod.rs
pub mod review;

pub use review::ReviewExtractor;
