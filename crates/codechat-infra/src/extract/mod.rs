//! Attachment content extraction.

pub mod plain;
