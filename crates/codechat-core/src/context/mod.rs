//! Prompt context assembly.
//!
//! Pure functions that turn stored history plus the new user turn into the
//! flat textual prompt sent to the model, and classify what comes back.
//! Nothing here touches storage.

pub mod classify;
pub mod prompt;
pub mod window;
