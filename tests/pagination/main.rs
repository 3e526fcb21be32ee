//! Integration tests for sorted pagination with continuation tokens.

mod todo;

use std::time::Duration;

use stored_rust::{
    DocumentKey, InMemoryStore, Outcome, PageRequest, PaginatedResult, Repository,
    RepositoryOptions, SortKey,
};
use todo::TodoListItem;

fn todos_repository(store: InMemoryStore) -> Repository<InMemoryStore, TodoListItem> {
    Repository::connect(store, RepositoryOptions::new("todos-db", "todos")).unwrap()
}

fn seed(repo: &Repository<InMemoryStore, TodoListItem>, items: &[(&str, &str, u32)]) {
    for (id, task, priority) in items {
        let result = repo.add(TodoListItem::new(*id, *task, *priority));
        assert!(result.is_ok());
    }
}

fn by_priority() -> SortKey<TodoListItem> {
    SortKey::by(|t: &TodoListItem| t.priority)
}

fn ids(page: &PaginatedResult<TodoListItem>) -> Vec<&str> {
    page.items.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn zero_page_size_is_refused() {
    let repo = todos_repository(InMemoryStore::new());
    let outcome = repo.get_paginated(PageRequest::new(0));
    match outcome {
        Outcome::PreconditionFailed(reason) => assert!(reason.contains("page size")),
        other => panic!("expected a refusal, got {:?}", other),
    }
}

#[test]
fn malformed_tokens_are_refused() {
    let repo = todos_repository(InMemoryStore::new());
    seed(&repo, &[("t1", "a", 1)]);

    let outcome = repo.get_paginated(
        PageRequest::new(2).continue_from(Some("!!! not a token !!!".to_string())),
    );

    match outcome {
        Outcome::PreconditionFailed(reason) => {
            assert!(reason.contains("invalid continuation token"));
        }
        other => panic!("expected a refusal, got {:?}", other),
    }
}

#[test]
fn empty_container_has_no_first_page() {
    let repo = todos_repository(InMemoryStore::new());
    let outcome = repo.get_paginated(PageRequest::new(5));
    assert!(outcome.is_not_applicable());
}

#[test]
fn walks_every_page_in_custom_sort_order() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[
            ("t1", "file taxes", 3),
            ("t2", "buy milk", 1),
            ("t3", "water plants", 2),
            ("t4", "clean gutters", 5),
            ("t5", "walk dog", 4),
        ],
    );

    let first = repo
        .get_paginated(PageRequest::new(2).sort_by(by_priority()))
        .completed()
        .unwrap();
    assert_eq!(ids(&first), ["t2", "t3"]);
    assert!(first.continuation_token.is_some());
    assert_eq!(first.request_charge, Some(1.0));

    let second = repo
        .get_paginated(
            PageRequest::new(2)
                .sort_by(by_priority())
                .continue_from(first.continuation_token.clone()),
        )
        .completed()
        .unwrap();
    assert_eq!(ids(&second), ["t1", "t5"]);

    let third = repo
        .get_paginated(
            PageRequest::new(2)
                .sort_by(by_priority())
                .continue_from(second.continuation_token.clone()),
        )
        .completed()
        .unwrap();
    assert_eq!(ids(&third), ["t4"]);
    // A short page is still a page; only the next fetch reveals the end
    assert!(third.continuation_token.is_some());

    let exhausted = repo.get_paginated(
        PageRequest::new(2)
            .sort_by(by_priority())
            .continue_from(third.continuation_token.clone()),
    );
    assert!(exhausted.is_not_applicable());
}

#[test]
fn descending_scans_reverse_the_order() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[("t1", "a", 3), ("t2", "b", 1), ("t3", "c", 2)],
    );

    let page = repo
        .get_paginated(PageRequest::new(10).descending().sort_by(by_priority()))
        .completed()
        .unwrap();

    assert_eq!(ids(&page), ["t1", "t3", "t2"]);
}

#[test]
fn default_order_is_the_stamped_timestamp() {
    let repo = todos_repository(InMemoryStore::new());
    for (id, task) in [("t1", "first"), ("t2", "second"), ("t3", "third")] {
        repo.add(TodoListItem::new(id, task, 1));
        std::thread::sleep(Duration::from_millis(2));
    }

    let ascending = repo
        .get_paginated(PageRequest::new(10))
        .completed()
        .unwrap();
    assert_eq!(ids(&ascending), ["t1", "t2", "t3"]);

    let descending = repo
        .get_paginated(PageRequest::new(10).descending())
        .completed()
        .unwrap();
    assert_eq!(ids(&descending), ["t3", "t2", "t1"]);
}

#[test]
fn single_item_pages_sweep_equal_priorities_by_timestamp() {
    let repo = todos_repository(InMemoryStore::new());
    for id in ["t1", "t2", "t3"] {
        let result = repo.add(TodoListItem::new(id, "same priority", 7));
        assert!(result.is_ok());
        std::thread::sleep(Duration::from_millis(2));
    }

    // Newest first, one record per page
    let mut token = None;
    let mut seen = Vec::new();
    loop {
        let outcome =
            repo.get_paginated(PageRequest::new(1).descending().continue_from(token.take()));
        let Some(page) = outcome.completed() else {
            break;
        };
        assert_eq!(page.items.len(), 1);
        seen.push(page.items[0].id.clone());
        token = page.continuation_token.clone();
    }

    assert_eq!(seen, ["t3", "t2", "t1"]);
}

#[test]
fn single_item_pages_sweep_duplicate_ids_across_partitions() {
    let repo = todos_repository(InMemoryStore::new());
    let mut batch = std::collections::BTreeMap::new();
    batch.insert(
        "tenant-1".into(),
        TodoListItem::new("dup", "shared task", 7),
    );
    batch.insert(
        "tenant-2".into(),
        TodoListItem::new("dup", "shared task", 7),
    );
    let seeded = repo.add_range(batch).completed().unwrap();
    assert!(seeded.is_ok());
    assert_eq!(seeded.items.len(), 2);

    // Equal priority and equal id: only the partition key distinguishes
    // the two rows, and the sweep must still visit both
    let mut token = None;
    let mut pages = 0;
    loop {
        let outcome = repo.get_paginated(
            PageRequest::new(1)
                .sort_by(by_priority())
                .continue_from(token.take()),
        );
        let Some(page) = outcome.completed() else {
            break;
        };
        assert_eq!(ids(&page), ["dup"]);
        pages += 1;
        token = page.continuation_token.clone();
    }

    assert_eq!(pages, 2);
}

#[test]
fn later_sort_keys_break_ties() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[
            ("t1", "zebra", 1),
            ("t2", "apple", 1),
            ("t3", "mango", 1),
        ],
    );

    let page = repo
        .get_paginated(
            PageRequest::new(10)
                .sort_by(by_priority())
                .sort_by(SortKey::by(|t: &TodoListItem| t.task.clone())),
        )
        .completed()
        .unwrap();

    assert_eq!(ids(&page), ["t2", "t3", "t1"]);
}

#[test]
fn tokens_only_resume_the_order_that_minted_them() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[("t1", "a", 1), ("t2", "b", 2), ("t3", "c", 3)],
    );

    let first = repo
        .get_paginated(PageRequest::new(1).sort_by(by_priority()))
        .completed()
        .unwrap();
    let token = first.continuation_token.clone();

    // Same keys, flipped direction
    let flipped = repo.get_paginated(
        PageRequest::new(1)
            .descending()
            .sort_by(by_priority())
            .continue_from(token.clone()),
    );
    match flipped {
        Outcome::PreconditionFailed(reason) => {
            assert!(reason.contains("does not match"));
        }
        other => panic!("expected a refusal, got {:?}", other),
    }

    // Same direction, different key arity
    let wider = repo.get_paginated(
        PageRequest::new(1)
            .sort_by(by_priority())
            .sort_by(SortKey::by(|t: &TodoListItem| t.task.clone()))
            .continue_from(token),
    );
    assert!(matches!(wider, Outcome::PreconditionFailed(_)));
}

#[test]
fn tokens_resume_across_repository_instances() {
    let store = InMemoryStore::new();
    let repo = todos_repository(store.clone());
    seed(
        &repo,
        &[("t1", "a", 1), ("t2", "b", 2), ("t3", "c", 3)],
    );

    let first = repo
        .get_paginated(PageRequest::new(2).sort_by(by_priority()))
        .completed()
        .unwrap();

    // A fresh repository over the same container picks up where the
    // token left off
    let other = todos_repository(store);
    let second = other
        .get_paginated(
            PageRequest::new(2)
                .sort_by(by_priority())
                .continue_from(first.continuation_token.clone()),
        )
        .completed()
        .unwrap();

    assert_eq!(ids(&second), ["t3"]);
}

#[test]
fn removals_between_pages_do_not_skip_survivors() {
    let repo = todos_repository(InMemoryStore::new());
    seed(
        &repo,
        &[
            ("t1", "a", 1),
            ("t2", "b", 2),
            ("t3", "c", 3),
            ("t4", "d", 4),
            ("t5", "e", 5),
        ],
    );

    let first = repo
        .get_paginated(PageRequest::new(2).sort_by(by_priority()))
        .completed()
        .unwrap();
    assert_eq!(ids(&first), ["t1", "t2"]);

    // Drop a row the scan has not reached yet
    let removed = repo.remove(&DocumentKey::new("t3")).completed().unwrap();
    assert!(removed.is_ok());

    let second = repo
        .get_paginated(
            PageRequest::new(2)
                .sort_by(by_priority())
                .continue_from(first.continuation_token.clone()),
        )
        .completed()
        .unwrap();

    // The survivors after the resume point appear exactly once
    assert_eq!(ids(&second), ["t4", "t5"]);
}
