//! Database query functions for the `goals` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::debug;

use crate::models::{Goal, NewGoal};

/// Page size used when a listing does not ask for one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page a single listing may return.
pub const MAX_LIMIT: i64 = 200;

/// Pagination and filtering for [`list_goals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalFilter {
    pub skip: i64,
    pub limit: i64,
    pub user_id: Option<String>,
}

impl GoalFilter {
    /// Build a filter, clamping `skip` to `>= 0` and `limit` to `1..=MAX_LIMIT`.
    pub fn new(skip: Option<i64>, limit: Option<i64>, user_id: Option<String>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            user_id: user_id.filter(|u| !u.is_empty()),
        }
    }
}

impl Default for GoalFilter {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Insert a new goal row. Returns the stored goal with server-generated
/// defaults (id, created_at).
pub async fn insert_goal(pool: &PgPool, goal: &NewGoal<'_>) -> Result<Goal> {
    let [one, two, three, four, five] = goal.steps;
    let row = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals \
         (goal_text, step_one, step_two, step_three, step_four, step_five, complexity, source, user_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING *",
    )
    .bind(goal.goal_text)
    .bind(one)
    .bind(two)
    .bind(three)
    .bind(four)
    .bind(five)
    .bind(goal.complexity)
    .bind(goal.source)
    .bind(goal.user_id)
    .fetch_one(pool)
    .await
    .context("failed to insert goal")?;

    debug!(goal_id = row.id, "goal row inserted");
    Ok(row)
}

/// Fetch a goal by its ID.
pub async fn get_goal(pool: &PgPool, id: i64) -> Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch goal")?;

    Ok(goal)
}

/// List goals newest first, honouring the filter's offset, limit and user.
pub async fn list_goals(pool: &PgPool, filter: &GoalFilter) -> Result<Vec<Goal>> {
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT * FROM goals \
         WHERE ($1::text IS NULL OR user_id = $1) \
         ORDER BY created_at DESC, id DESC \
         OFFSET $2 LIMIT $3",
    )
    .bind(filter.user_id.as_deref())
    .bind(filter.skip)
    .bind(filter.limit)
    .fetch_all(pool)
    .await
    .context("failed to list goals")?;

    Ok(goals)
}

/// Count goals, optionally restricted to one user.
pub async fn count_goals(pool: &PgPool, user_id: Option<&str>) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE ($1::text IS NULL OR user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("failed to count goals")?;

    Ok(count)
}

/// Delete a goal. Returns `false` when no row had that ID.
pub async fn delete_goal(pool: &PgPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM goals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete goal")?;

    Ok(result.rows_affected() > 0)
}
