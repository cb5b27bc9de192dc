//! Operator CLI handlers for `goalsplit goal` subcommands.
//!
//! Implements:
//! - `goalsplit goal list`        -- table of stored goals, newest first
//! - `goalsplit goal show <id>`   -- one goal with its five steps
//! - `goalsplit goal delete <id>` -- remove a stored goal

use anyhow::{Result, bail};
use sqlx::PgPool;

use goalsplit_db::models::Goal;
use goalsplit_db::queries::goals::{self as goal_queries, GoalFilter};

use crate::GoalCommands;

/// Widest goal text shown in the list table before truncation.
const GOAL_COLUMN_WIDTH: usize = 48;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `GoalCommands` variant to the appropriate handler.
pub async fn run_goal_command(command: GoalCommands, pool: &PgPool) -> Result<()> {
    match command {
        GoalCommands::List { skip, limit, user } => {
            cmd_list(pool, GoalFilter::new(skip, limit, user)).await
        }
        GoalCommands::Show { id } => cmd_show(pool, id).await,
        GoalCommands::Delete { id } => cmd_delete(pool, id).await,
    }
}

// -----------------------------------------------------------------------
// goalsplit goal list
// -----------------------------------------------------------------------

async fn cmd_list(pool: &PgPool, filter: GoalFilter) -> Result<()> {
    let goals = goal_queries::list_goals(pool, &filter).await?;
    let total = goal_queries::count_goals(pool, filter.user_id.as_deref()).await?;

    if goals.is_empty() {
        println!("No goals found. POST to /goals or run `goalsplit serve` to create one.");
        return Ok(());
    }

    let id_w = goals
        .iter()
        .map(|g| g.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let source_w = 8;

    println!(
        "{:>id_w$}  {:>4}  {:<source_w$}  {:<16}  GOAL",
        "ID", "CPLX", "SOURCE", "CREATED",
    );
    for goal in &goals {
        println!(
            "{:>id_w$}  {:>4}  {:<source_w$}  {:<16}  {}",
            goal.id,
            goal.complexity,
            goal.source.to_string(),
            goal.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&goal.goal_text, GOAL_COLUMN_WIDTH),
        );
    }

    println!();
    println!(
        "Showing {} of {} goal(s) (skip {}, limit {}).",
        goals.len(),
        total,
        filter.skip,
        filter.limit
    );
    Ok(())
}

// -----------------------------------------------------------------------
// goalsplit goal show <id>
// -----------------------------------------------------------------------

async fn cmd_show(pool: &PgPool, id: i64) -> Result<()> {
    let Some(goal) = goal_queries::get_goal(pool, id).await? else {
        bail!("goal {id} not found");
    };
    print_goal(&goal);
    Ok(())
}

fn print_goal(goal: &Goal) {
    println!("Goal: {}", goal.goal_text);
    println!("  ID:          {}", goal.id);
    println!("  Complexity:  {}/10", goal.complexity);
    println!("  Source:      {}", goal.source);
    if let Some(user_id) = &goal.user_id {
        println!("  User:        {user_id}");
    }
    println!(
        "  Created:     {}",
        goal.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    println!("Steps:");
    for (i, step) in goal.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

// -----------------------------------------------------------------------
// goalsplit goal delete <id>
// -----------------------------------------------------------------------

async fn cmd_delete(pool: &PgPool, id: i64) -> Result<()> {
    if !goal_queries::delete_goal(pool, id).await? {
        bail!("goal {id} not found");
    }
    println!("Goal {id} deleted.");
    Ok(())
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Run a marathon", 48), "Run a marathon");
    }

    #[test]
    fn truncate_marks_long_text() {
        let out = truncate("abcdefghij", 8);
        assert_eq!(out, "abcde...");
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("ééééé", 5), "ééééé");
        assert_eq!(truncate("éééééé", 5), "éé...");
    }
}
