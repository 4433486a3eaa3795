//! CLI command definitions and dispatch for the `codechat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod conversation;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Persistent code-focused chat with a generative model.
#[derive(Parser)]
#[command(name = "codechat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List conversations in creation order.
    #[command(alias = "ls")]
    List,

    /// Create a new conversation.
    New {
        /// Title for the conversation; omitted titles are derived from the
        /// first message.
        title: Option<String>,
    },

    /// Show a conversation's messages.
    Show {
        /// Conversation id.
        id: Uuid,
    },

    /// Rename a conversation.
    Rename {
        /// Conversation id.
        id: Uuid,

        /// New title.
        title: String,
    },

    /// Delete a conversation and all of its messages.
    #[command(alias = "rm")]
    Delete {
        /// Conversation id.
        id: Uuid,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Delete a single message from a conversation.
    #[command(name = "delete-message")]
    DeleteMessage {
        /// Conversation id.
        id: Uuid,

        /// Message id as shown by `codechat show`.
        message_id: i64,
    },

    /// Start an interactive chat session.
    Chat {
        /// Resume an existing conversation; omitted starts a fresh one on
        /// the first message.
        id: Option<Uuid>,

        /// Instructions appended to every prompt.
        #[arg(long)]
        instructions: Option<String>,
    },
}
