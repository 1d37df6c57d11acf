use tracing::debug;

use crate::error::{AppError, Result};

/// Extracts the text of every page and joins them in page order, with no
/// separator. A PDF without a text layer yields an empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| AppError::ExtractionError(format!("Failed to extract text from PDF: {}", e)))?;

    debug!(pages = pages.len(), "PDF parsed");
    Ok(pages.concat())
}

/// Runs [`extract_text`] on the blocking pool. The buffer and the parsed
/// document are owned by the closure and dropped when it returns or panics.
pub async fn extract_text_blocking(bytes: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AppError::ExtractionError(format!("Failed to extract text from PDF: {}", e)))?
}
