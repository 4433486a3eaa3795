//! Shared domain types for codechat.
//!
//! This crate contains the core domain types used across the codechat
//! workspace: conversations, messages, attachments, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
