//! LLM collaborator abstractions.

pub mod generator;
