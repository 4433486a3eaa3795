//! Conversation persistence abstractions and turn orchestration.
//!
//! This module defines the `ConversationRepository` trait that the
//! infrastructure layer implements, the `ConversationService` that drives a
//! chat turn end to end, and the explicit UI session state struct.

pub mod repository;
pub mod service;
pub mod state;
