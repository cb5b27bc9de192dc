//! `goalsplit decompose <goal>`: run the decomposer once, without a database.

use anyhow::{Context, Result};

use goalsplit_core::decompose::{Decomposition, GoalDecomposer};
use goalsplit_core::service::validate_goal;

pub async fn run_decompose(decomposer: &GoalDecomposer, goal: &str, json: bool) -> Result<()> {
    let goal = validate_goal(goal)?;
    tracing::debug!(backend = decomposer.backend_name(), "decomposing goal");

    let decomposition = decomposer.decompose(goal).await;

    if json {
        let rendered = serde_json::to_string_pretty(&decomposition)
            .context("failed to serialize decomposition")?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(goal, &decomposition));
    }
    Ok(())
}

fn render_text(goal: &str, decomposition: &Decomposition) -> String {
    let mut out = format!(
        "Goal:        {}\nComplexity:  {}/10\nSource:      {}\n\nSteps:\n",
        goal.trim(),
        decomposition.result.complexity(),
        decomposition.source,
    );
    for (i, step) in decomposition.result.steps().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }
    out
}
