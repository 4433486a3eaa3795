//! Business logic and repository trait definitions for codechat.
//!
//! This crate defines the "ports" (repository and collaborator traits) that
//! the infrastructure layer implements, plus the pure context-assembly logic.
//! It depends only on `codechat-types` -- never on `codechat-infra` or any
//! database/IO crate.

pub mod chat;
pub mod context;
pub mod llm;
pub mod storage;
