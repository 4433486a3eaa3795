//! Attachment storage and extraction abstractions.
//!
//! Attachment bytes are owned by the blob store and referenced, not
//! duplicated, by messages. Implementations live in codechat-infra.

pub mod blob_store;
pub mod extract;
