//! Engagement status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display the engagement dashboard.
///
/// Shows vote totals, comment totals, word cloud stats, and where the
/// data lives.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    // Gather stats
    let vote_stats = state.vote_service.vote_stats().await?;
    let comment_stats = state.comment_service.all_comment_stats().await?;
    let word_stats = state.word_service.word_stats().await?;

    let resources_with_comments = comment_stats.len();
    let total_comments: u64 = comment_stats.values().map(|s| s.count).sum();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "votes": {
                "resources": vote_stats.total_resources,
                "total": vote_stats.total_votes,
            },
            "comments": {
                "resources": resources_with_comments,
                "total": total_comments,
            },
            "words": {
                "distinct": word_stats.total_words,
                "submissions": word_stats.total_submissions,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Agora v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    // Votes
    println!("  {}", style("── Votes ──").dim());
    println!(
        "  Resources voted on: {}",
        style(vote_stats.total_resources).bold()
    );
    println!(
        "  Votes cast:         {}",
        style(vote_stats.total_votes).green()
    );
    println!();

    // Comments
    println!("  {}", style("── Comments ──").dim());
    println!(
        "  Resources discussed: {}",
        style(resources_with_comments).bold()
    );
    println!(
        "  Comments posted:     {}",
        style(total_comments).green()
    );
    println!();

    // Word cloud
    println!("  {}", style("── Word cloud ──").dim());
    println!(
        "  Distinct words: {}",
        style(word_stats.total_words).bold()
    );
    println!(
        "  Submissions:    {}",
        style(word_stats.total_submissions).green()
    );
    if let Some(top) = word_stats.top_words.first() {
        println!(
            "  Top word:       {} ({}x)",
            style(&top.text).cyan(),
            top.value
        );
    }
    println!();

    // System
    println!("  {}", style("── System ──").dim());
    println!(
        "  Data dir: {}",
        style(state.data_dir.display()).dim()
    );
    println!(
        "  Database: {}",
        style("SQLite (WAL mode)").dim()
    );
    println!();

    Ok(())
}
