//! Conversation lifecycle CLI commands: list, new, show, rename, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use codechat_types::chat::Speaker;
use codechat_types::error::StoreError;

use crate::state::AppState;

/// List all conversations in creation order.
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.conversation_service.list_conversations().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("codechat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(conversation.id).fg(Color::DarkGrey),
            Cell::new(&conversation.title),
            Cell::new(conversation.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Create a new conversation.
pub async fn new_conversation(state: &AppState, title: Option<String>, json: bool) -> Result<()> {
    let conversation = match state.conversation_service.create_conversation(title).await {
        Ok(conversation) => conversation,
        Err(StoreError::DuplicateTitle(title)) => {
            eprintln!(
                "  {} A conversation titled '{}' already exists.",
                style("!").red().bold(),
                style(title).cyan()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    } else {
        println!(
            "  {} Created conversation {} ({})",
            style("+").green().bold(),
            style(&conversation.title).cyan(),
            style(conversation.id).dim()
        );
    }
    Ok(())
}

/// Print a conversation's messages in order.
pub async fn show_conversation(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let Some(conversation) = state.conversation_service.get_conversation(id).await? else {
        eprintln!("  {} Conversation not found: {id}", style("!").red().bold());
        std::process::exit(1);
    };

    let history = state.conversation_service.get_history(id).await?;

    if json {
        let output = serde_json::json!({
            "conversation": conversation,
            "messages": history,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(&conversation.title).cyan().bold(),
        style(conversation.id).dim()
    );
    println!();

    for message in &history {
        let label = match message.speaker {
            Speaker::User => style(format!("[{}] You", message.id)).green().bold(),
            Speaker::Assistant => style(format!("[{}] Assistant", message.id)).cyan().bold(),
        };
        println!("  {label}");
        for line in message.body.lines() {
            println!("    {line}");
        }
        if let Some(attachment) = &message.attachment {
            println!("    {}", style(format!("(attached: {})", attachment.name())).dim());
        }
        println!();
    }

    if history.is_empty() {
        println!("  {}", style("No messages.").dim());
        println!();
    }

    Ok(())
}

/// Rename a conversation.
pub async fn rename_conversation(
    state: &AppState,
    id: &Uuid,
    title: &str,
    json: bool,
) -> Result<()> {
    match state.conversation_service.rename_conversation(id, title).await {
        Ok(()) => {}
        Err(StoreError::NotFound) => {
            eprintln!("  {} Conversation not found: {id}", style("!").red().bold());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    if json {
        println!("{}", serde_json::json!({ "id": id, "title": title }));
    } else {
        println!(
            "  {} Renamed to {}",
            style("~").green().bold(),
            style(title).cyan()
        );
    }
    Ok(())
}

/// Delete a conversation, prompting unless `--force`.
pub async fn delete_conversation(state: &AppState, id: &Uuid, force: bool, json: bool) -> Result<()> {
    let Some(conversation) = state.conversation_service.get_conversation(id).await? else {
        eprintln!("  {} Conversation not found: {id}", style("!").red().bold());
        std::process::exit(1);
    };

    if !force && !json {
        print!(
            "  Delete '{}' and all of its messages? [y/N] ",
            style(&conversation.title).cyan()
        );
        use std::io::Write;
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("  {}", style("Aborted.").dim());
            return Ok(());
        }
    }

    state
        .conversation_service
        .delete_conversation_with_attachments(state.blob_store.as_ref(), id)
        .await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!(
            "  {} Deleted {}",
            style("-").red().bold(),
            style(&conversation.title).cyan()
        );
    }
    Ok(())
}

/// Delete a single message.
pub async fn delete_message(
    state: &AppState,
    id: &Uuid,
    message_id: i64,
    json: bool,
) -> Result<()> {
    match state.conversation_service.delete_message(id, message_id).await {
        Ok(()) => {}
        Err(StoreError::NotFound) => {
            eprintln!(
                "  {} No message {message_id} in conversation {id}",
                style("!").red().bold()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    if json {
        println!("{}", serde_json::json!({ "deleted_message": message_id }));
    } else {
        println!("  {} Deleted message {message_id}", style("-").red().bold());
    }
    Ok(())
}
