//! Word cloud CLI subcommands.
//!
//! The HTTP API only ever adds words; deleting one entry or wiping the
//! cloud are operator actions and live here, behind a confirmation prompt.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use agora_types::word::WordId;

use crate::state::AppState;

/// Word cloud subcommands.
#[derive(Subcommand)]
pub enum WordsCommand {
    /// List every word with its submission count.
    List,

    /// Delete a single word by id.
    Delete {
        /// Word id (shown by `agora words list`).
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Delete every word in the cloud.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a words subcommand.
pub async fn handle_words_command(cmd: WordsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        WordsCommand::List => list_words(state, json).await,
        WordsCommand::Delete { id, force } => delete_word(state, &id, force, json).await,
        WordsCommand::Clear { force } => clear_words(state, force, json).await,
    }
}

/// List all words, highest value first.
async fn list_words(state: &AppState, json: bool) -> Result<()> {
    let words = state.word_service.all_words().await?;

    if json {
        let items: Vec<serde_json::Value> = words
            .iter()
            .map(|w| {
                serde_json::json!({
                    "id": w.id.to_string(),
                    "text": w.text,
                    "value": w.value,
                })
            })
            .collect();
        let result = serde_json::json!({
            "words": items,
            "count": words.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if words.is_empty() {
        println!();
        println!("  {} The word cloud is empty.", style("i").blue().bold());
        println!("     Words arrive via POST /api/wordclouds while the server runs.");
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  Word cloud ({} distinct {})",
        words.len(),
        if words.len() == 1 { "word" } else { "words" },
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Word").fg(Color::White),
        Cell::new("Submissions").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for word in &words {
        table.add_row(vec![
            Cell::new(&word.text).fg(Color::Cyan),
            Cell::new(word.value),
            Cell::new(word.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}

/// Delete one word permanently with confirmation.
async fn delete_word(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let word_id: WordId = id
        .parse()
        .with_context(|| format!("Invalid word id '{id}'"))?;

    // Look the word up so the prompt can show its text
    let words = state.word_service.all_words().await?;
    let word = words
        .iter()
        .find(|w| w.id == word_id)
        .with_context(|| format!("No word with id '{id}'"))?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete word '{}' ({} submissions)?",
                style(&word.text).red().bold(),
                word.value,
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.word_service.delete_word(&word_id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": removed, "id": id }));
    } else if removed {
        println!();
        println!(
            "  {} Word '{}' deleted.",
            style("✓").red().bold(),
            word.text,
        );
        println!();
    } else {
        println!();
        println!(
            "  {} Word '{}' was already gone.",
            style("i").blue().bold(),
            word.text,
        );
        println!();
    }

    Ok(())
}

/// Wipe the whole cloud with confirmation.
async fn clear_words(state: &AppState, force: bool, json: bool) -> Result<()> {
    let stats = state.word_service.word_stats().await?;

    if stats.total_words == 0 {
        if json {
            println!("{}", serde_json::json!({ "deleted": 0 }));
        } else {
            println!();
            println!("  {} The word cloud is already empty.", style("i").blue().bold());
            println!();
        }
        return Ok(());
    }

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete all {} words ({} submissions)?",
                style(stats.total_words).red().bold(),
                stats.total_submissions,
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let deleted = state.word_service.clear_words().await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        println!();
        println!(
            "  {} Cleared {} {} from the cloud.",
            style("✓").red().bold(),
            deleted,
            if deleted == 1 { "word" } else { "words" },
        );
        println!();
    }

    Ok(())
}
