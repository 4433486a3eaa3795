//! TextGenerator trait definition.
//!
//! The model call is a single opaque request/response from the core's point
//! of view. Implementations live in codechat-infra (e.g. `GeminiClient`).

use codechat_types::error::GenerationError;

/// A collaborator that turns a flat prompt into generated text.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Any
/// transport, quota, or auth failure surfaces as `GenerationError`; the
/// turn loop renders it as a fallback assistant message rather than
/// crashing the interaction.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
