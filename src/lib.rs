pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod llm;

use std::sync::Arc;
use config::Config;
use error::Result;
use fetcher::DocumentFetcher;
use llm::{GeminiClient, SummaryGenerator};

/// Application state shared across handlers. Nothing in it is mutated after
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: DocumentFetcher,
    pub generator: Arc<dyn SummaryGenerator>,
}

impl AppState {
    /// Builds the state with a Gemini-backed generator.
    pub fn new(config: &Config) -> Result<Self> {
        let generator = GeminiClient::from_config(config)?;
        Self::with_generator(config, Arc::new(generator))
    }

    pub fn with_generator(config: &Config, generator: Arc<dyn SummaryGenerator>) -> Result<Self> {
        let fetcher = DocumentFetcher::new(config.fetch_timeout, config.max_download_bytes)?;
        Ok(AppState { fetcher, generator })
    }
}
