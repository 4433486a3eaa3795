//! Attachment blob storage.

pub mod filesystem;
