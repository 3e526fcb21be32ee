//! Integration tests for predicate search (find and find_one).

mod todo;

use stored_rust::{InMemoryStore, Outcome, Repository, RepositoryOptions, SearchRequest};
use todo::{unique_id, TodoListItem};

fn todos_repository(store: InMemoryStore) -> Repository<InMemoryStore, TodoListItem> {
    Repository::connect(store, RepositoryOptions::new("todos-db", "todos")).unwrap()
}

fn seed(repo: &Repository<InMemoryStore, TodoListItem>, tasks: &[(&str, u32)]) {
    for (task, priority) in tasks {
        repo.add(TodoListItem::new(unique_id(), *task, *priority));
    }
}

#[test]
fn find_without_a_filter_is_not_applicable() {
    let repo = todos_repository(InMemoryStore::new());
    seed(&repo, &[("buy milk", 1)]);

    let outcome = repo.find(&SearchRequest::new());
    assert!(outcome.is_not_applicable());
}

#[test]
fn find_returns_every_match_with_counts() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[
            ("buy milk", 1),
            ("water plants", 3),
            ("file taxes", 5),
            ("walk dog", 2),
        ],
    );

    let outcome = repo.find(&SearchRequest::matching(|t: &TodoListItem| t.priority >= 3));

    let collection = outcome.completed().unwrap();
    assert_eq!(collection.items.len(), 2);
    assert_eq!(collection.total_count, 2);
    assert_eq!(collection.page_size, 2);
    assert!(collection.status_codes.is_empty());
    assert_eq!(collection.request_charge, Some(1.0));
    assert!(collection.is_ok());

    let mut tasks: Vec<&str> = collection.items.iter().map(|t| t.task.as_str()).collect();
    tasks.sort();
    assert_eq!(tasks, ["file taxes", "water plants"]);
}

#[test]
fn find_with_no_matches_completes_empty() {
    let repo = todos_repository(InMemoryStore::new());
    seed(&repo, &[("buy milk", 1)]);

    let outcome = repo.find(&SearchRequest::matching(|t: &TodoListItem| {
        t.task.contains("no such task")
    }));

    let collection = outcome.completed().unwrap();
    assert!(collection.items.is_empty());
    assert_eq!(collection.total_count, 0);
    assert!(collection.is_ok());
}

#[test]
fn find_is_capped_by_the_store_page_bound() {
    let store = InMemoryStore::new().with_query_page_size(2);
    let repo = todos_repository(store);
    seed(
        &repo,
        &[("a", 1), ("b", 1), ("c", 1), ("d", 1)],
    );

    let collection = repo
        .find(&SearchRequest::matching(|_: &TodoListItem| true))
        .completed()
        .unwrap();

    assert_eq!(collection.items.len(), 2);
}

#[test]
fn find_one_without_a_filter_is_not_applicable() {
    let repo = todos_repository(InMemoryStore::new());
    let outcome = repo.find_one(&SearchRequest::new());
    assert_eq!(outcome, Outcome::NotApplicable);
}

#[test]
fn find_one_returns_a_single_match() {
    let repo = todos_repository(InMemoryStore::new());
    seed(&repo, &[("buy milk", 1), ("water plants", 3)]);

    let outcome = repo.find_one(&SearchRequest::matching(|t: &TodoListItem| {
        t.task == "water plants"
    }));

    let result = outcome.completed().unwrap();
    assert!(result.is_ok());
    assert_eq!(result.item.unwrap().priority, 3);
    assert_eq!(result.request_charge, Some(1.0));
}

#[test]
fn find_one_with_no_match_completes_with_nothing() {
    let repo = todos_repository(InMemoryStore::new());
    seed(&repo, &[("buy milk", 1)]);

    let outcome = repo.find_one(&SearchRequest::matching(|t: &TodoListItem| {
        t.priority > 100
    }));

    let result = outcome.completed().unwrap();
    assert!(result.is_ok());
    assert_eq!(result.item, None);
    assert_eq!(result.status_code, None);
}
