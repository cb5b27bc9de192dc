//! Integration tests for the `goals` table queries.
//!
//! Each test creates a unique temporary database on the shared test
//! PostgreSQL, runs migrations, and drops it on completion.

use goalsplit_db::models::{GenerationSource, NewGoal};
use goalsplit_db::pool;
use goalsplit_db::queries::goals::{self, GoalFilter};
use goalsplit_test_utils::{create_test_db, drop_test_db};

fn new_goal<'a>(text: &'a str, user_id: Option<&'a str>) -> NewGoal<'a> {
    NewGoal {
        goal_text: text,
        steps: ["one", "two", "three", "four", "five"],
        complexity: 3,
        source: GenerationSource::Fallback,
        user_id,
    }
}

#[tokio::test]
async fn insert_and_get_goal() {
    let (pool, db_name) = create_test_db().await;

    let goal = goals::insert_goal(&pool, &new_goal("Learn to sail", Some("user_abc")))
        .await
        .expect("insert_goal should succeed");

    assert!(goal.id > 0);
    assert_eq!(goal.goal_text, "Learn to sail");
    assert_eq!(goal.step_one.as_deref(), Some("one"));
    assert_eq!(goal.step_five.as_deref(), Some("five"));
    assert_eq!(goal.complexity, 3);
    assert_eq!(goal.source, GenerationSource::Fallback);
    assert_eq!(goal.user_id.as_deref(), Some("user_abc"));

    let fetched = goals::get_goal(&pool, goal.id)
        .await
        .expect("get_goal should succeed")
        .expect("goal should exist");
    assert_eq!(fetched.id, goal.id);
    assert_eq!(fetched.steps().len(), 5);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_missing_goal_returns_none() {
    let (pool, db_name) = create_test_db().await;

    let fetched = goals::get_goal(&pool, 424242).await.expect("query should succeed");
    assert!(fetched.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_goals_newest_first_with_paging() {
    let (pool, db_name) = create_test_db().await;

    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let g = goals::insert_goal(&pool, &new_goal(text, None)).await.unwrap();
        ids.push(g.id);
    }

    let all = goals::list_goals(&pool, &GoalFilter::default()).await.unwrap();
    let texts: Vec<&str> = all.iter().map(|g| g.goal_text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);

    let page = goals::list_goals(&pool, &GoalFilter::new(Some(1), Some(1), None))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].goal_text, "second");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_and_count_filter_by_user() {
    let (pool, db_name) = create_test_db().await;

    goals::insert_goal(&pool, &new_goal("mine", Some("user_a"))).await.unwrap();
    goals::insert_goal(&pool, &new_goal("theirs", Some("user_b"))).await.unwrap();
    goals::insert_goal(&pool, &new_goal("anonymous", None)).await.unwrap();

    let filter = GoalFilter::new(None, None, Some("user_a".to_string()));
    let mine = goals::list_goals(&pool, &filter).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].goal_text, "mine");

    assert_eq!(goals::count_goals(&pool, None).await.unwrap(), 3);
    assert_eq!(goals::count_goals(&pool, Some("user_b")).await.unwrap(), 1);
    assert_eq!(goals::count_goals(&pool, Some("nobody")).await.unwrap(), 0);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_goal_reports_whether_row_existed() {
    let (pool, db_name) = create_test_db().await;

    let goal = goals::insert_goal(&pool, &new_goal("short lived", None)).await.unwrap();

    assert!(goals::delete_goal(&pool, goal.id).await.unwrap());
    assert!(!goals::delete_goal(&pool, goal.id).await.unwrap());
    assert!(goals::get_goal(&pool, goal.id).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn complexity_outside_range_is_rejected() {
    let (pool, db_name) = create_test_db().await;

    let mut bad = new_goal("too hard", None);
    bad.complexity = 11;
    let result = goals::insert_goal(&pool, &bad).await;
    assert!(result.is_err(), "check constraint should reject complexity 11");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn table_counts_include_goals() {
    let (pool, db_name) = create_test_db().await;

    goals::insert_goal(&pool, &new_goal("counted", None)).await.unwrap();

    let counts = pool::table_counts(&pool).await.unwrap();
    let goals_count = counts
        .iter()
        .find(|(name, _)| name == "goals")
        .map(|(_, n)| *n);
    assert_eq!(goals_count, Some(1));

    pool.close().await;
    drop_test_db(&db_name).await;
}
