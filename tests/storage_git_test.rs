//! Tests for git synchronization of the data directory

mod common;

use common::{create_goal, extract_id_from_response, test_today};
use git2::Repository;
use productivity_mcp::{FixedClock, TrackerServerHandler};
use std::fs;
use tempfile::TempDir;

fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

fn head_message(repo: &Repository) -> String {
    let head = repo.head().unwrap();
    let commit = repo.find_commit(head.target().unwrap()).unwrap();
    commit.message().unwrap().to_string()
}

// Every save becomes a commit with a descriptive message
#[tokio::test]
async fn test_saves_are_committed() {
    let (temp_dir, repo) = setup_test_repo();
    let handler = TrackerServerHandler::with_clock(
        temp_dir.path(),
        true,
        FixedClock::at_date(test_today()),
    )
    .unwrap();

    create_goal(&handler, "Fitness").await;
    assert_eq!(head_message(&repo), "Create goal Fitness");

    let habit = extract_id_from_response(
        &handler
            .handle_create_habit("Stretch".to_string(), None, None)
            .await
            .unwrap(),
    );
    handler.handle_complete_task(habit).await.unwrap();
    assert_eq!(head_message(&repo), "Complete Stretch");

    handler.handle_end_day(Some(true), None).await.unwrap();
    assert_eq!(head_message(&repo), "End day 2025-06-10");

    let head = repo.head().unwrap();
    let tree = repo
        .find_commit(head.target().unwrap())
        .unwrap()
        .tree()
        .unwrap();
    assert!(tree.get_name("productivityData.json").is_some());
    assert!(tree.get_name("lastEndedDay").is_some());
}

// Without --sync-git nothing is committed
#[tokio::test]
async fn test_no_commits_without_sync() {
    let (temp_dir, repo) = setup_test_repo();
    let handler = TrackerServerHandler::with_clock(
        temp_dir.path(),
        false,
        FixedClock::at_date(test_today()),
    )
    .unwrap();

    create_goal(&handler, "Fitness").await;
    assert!(temp_dir.path().join("productivityData.json").exists());
    assert!(repo.head().is_err());
}

// Outside a repository sync is skipped silently
#[tokio::test]
async fn test_sync_outside_repository() {
    let temp_dir = TempDir::new().unwrap();
    let handler = TrackerServerHandler::with_clock(
        temp_dir.path(),
        true,
        FixedClock::at_date(test_today()),
    )
    .unwrap();

    create_goal(&handler, "Fitness").await;
    let saved = fs::read_to_string(temp_dir.path().join("productivityData.json")).unwrap();
    assert!(saved.contains("\"name\": \"Fitness\""));
}
