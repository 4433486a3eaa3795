//! Interactive chat loop.
//!
//! Coordinates the conversation lifecycle: session state, lazy conversation
//! creation on the first message, slash commands, attachments, and reply
//! rendering.

use std::path::Path;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use codechat_core::chat::service::TurnInput;
use codechat_core::chat::state::SessionState;
use codechat_core::context::classify::GeneratedContent;
use codechat_core::storage::blob_store::BlobStore;
use codechat_core::storage::extract::ContentExtractor;
use codechat_infra::extract::plain::detect_mime;
use codechat_infra::llm::gemini::GeminiClient;
use uuid::Uuid;

use crate::state::AppState;

/// Run the interactive chat loop.
///
/// With no conversation id, creation is deferred until the first message so
/// quitting immediately leaves nothing behind.
pub async fn run_chat_loop(
    state: &AppState,
    conversation_id: Option<Uuid>,
    instructions: Option<&str>,
) -> Result<()> {
    let generator = GeminiClient::from_config(&state.config.llm)
        .map_err(|e| anyhow::anyhow!("cannot start chat: {e}"))?;

    let mut session = SessionState::new();
    match conversation_id {
        Some(id) => {
            let Some(conversation) = state.conversation_service.get_conversation(&id).await? else {
                anyhow::bail!("conversation not found: {id}");
            };
            session.select(conversation.id);
            println!();
            println!(
                "  {} Resuming {}",
                style(">").cyan().bold(),
                style(&conversation.title).cyan()
            );
            replay_history(state, &conversation.id).await?;
        }
        None => {
            session.request_new_chat();
            println!();
            println!(
                "  {} New chat. Type a message, {} for commands.",
                style(">").cyan().bold(),
                style("/help").yellow()
            );
        }
    }
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            println!("\n  {}", style("Session ended.").dim());
            break;
        };
        let text = line.trim().to_string();
        if text.is_empty() {
            continue;
        }

        // Slash commands
        if let Some(command) = text.strip_prefix('/') {
            let mut parts = command.splitn(2, ' ');
            let name = parts.next().unwrap_or_default();
            let rest = parts.next().unwrap_or_default().trim();

            match name {
                "exit" | "quit" => {
                    println!("  {}", style("Session ended.").dim());
                    break;
                }
                "new" => {
                    session.request_new_chat();
                    println!("  {} Next message starts a fresh conversation.", style("*").cyan());
                    continue;
                }
                "help" => {
                    print_help();
                    continue;
                }
                "attach" => {
                    let mut words = rest.splitn(2, ' ');
                    let path = words.next().unwrap_or_default();
                    let message = words.next().unwrap_or_default().trim();
                    if path.is_empty() || message.is_empty() {
                        println!(
                            "  {} Usage: {}",
                            style("?").yellow().bold(),
                            style("/attach <file> <message>").yellow()
                        );
                        continue;
                    }
                    match build_attachment_input(state, path, message).await {
                        Ok(input) => {
                            run_one_turn(state, &generator, &mut session, input, instructions).await?;
                        }
                        Err(e) => {
                            println!("  {} {e}", style("!").red().bold());
                        }
                    }
                    continue;
                }
                other => {
                    println!(
                        "  {} Unknown command: /{other}. Type {} for available commands.",
                        style("?").yellow().bold(),
                        style("/help").yellow()
                    );
                    continue;
                }
            }
        }

        run_one_turn(state, &generator, &mut session, TurnInput::text(text), instructions).await?;
    }

    Ok(())
}

/// Run a single turn, creating the conversation lazily when needed.
async fn run_one_turn(
    state: &AppState,
    generator: &GeminiClient,
    session: &mut SessionState,
    input: TurnInput,
    instructions: Option<&str>,
) -> Result<()> {
    // A pending new-chat request already cleared the active conversation.
    session.take_pending_new_chat();
    let conversation_id = match session.active_conversation {
        Some(id) => id,
        None => {
            let conversation = state.conversation_service.create_conversation(None).await?;
            session.select(conversation.id);
            conversation.id
        }
    };

    let reply = state
        .conversation_service
        .run_turn(generator, &conversation_id, input, instructions, &state.config.prompt)
        .await?;

    println!();
    match &reply.content {
        GeneratedContent::Code { language, code } => {
            println!("  {}", style(format!("Assistant ({language})")).cyan().bold());
            for line in code.lines() {
                println!("    {}", style(line).yellow());
            }
        }
        GeneratedContent::Prose(body) => {
            println!("  {}", style("Assistant").cyan().bold());
            for line in body.lines() {
                println!("    {line}");
            }
        }
    }
    println!();
    Ok(())
}

/// Store the attachment, extract its text when possible, and build the turn.
async fn build_attachment_input(state: &AppState, path: &str, message: &str) -> Result<TurnInput> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {path}: {e}"))?;

    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid file name: {path}"))?;

    let attachment = state.blob_store.save(&data, filename).await?;

    let mime = detect_mime(filename);
    let attachment_text = match state.extractor.extract_text(&data, &mime) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(file = %filename, error = %e, "Attachment content not extracted");
            None
        }
    };

    Ok(TurnInput {
        text: message.to_string(),
        attachment: Some(attachment),
        attachment_text,
    })
}

/// Print the stored history of a resumed conversation.
async fn replay_history(state: &AppState, conversation_id: &Uuid) -> Result<()> {
    let history = state.conversation_service.get_history(conversation_id).await?;
    println!();
    for message in &history {
        let label = match message.speaker {
            codechat_types::chat::Speaker::User => style("You").green().bold(),
            codechat_types::chat::Speaker::Assistant => style("Assistant").cyan().bold(),
        };
        println!("  {label}");
        for line in message.body.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("  {} ", style("You >").green().bold());
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    println!("    /new                     start a fresh conversation");
    println!("    /attach <file> <message> send a message with a file attached");
    println!("    /exit, /quit             leave the chat");
    println!();
}
