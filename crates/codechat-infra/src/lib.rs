//! Infrastructure layer for codechat.
//!
//! Contains implementations of the trait ports defined in `codechat-core`:
//! SQLite conversation storage, filesystem blob storage, plain-text content
//! extraction, and the Gemini HTTP client.

pub mod blob;
pub mod extract;
pub mod llm;
pub mod sqlite;
