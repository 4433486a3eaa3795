//! ContentExtractor trait definition.

use codechat_types::error::ExtractionError;

/// Optional collaborator that turns attachment bytes into prompt text.
///
/// Extraction is pure CPU work, so the trait is synchronous. A failure means
/// the attachment is represented in the prompt by its marker line only --
/// "attachment stored, content not extracted" -- never an aborted turn.
pub trait ContentExtractor: Send + Sync {
    fn extract_text(&self, data: &[u8], declared_type: &str) -> Result<String, ExtractionError>;
}
