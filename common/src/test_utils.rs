//! Fixtures shared by the tests of every crate of the workspace.
//!
//! Public so that other crates can reuse it for their own tests.

use serde_json::{Value, json};

use crate::data::Record;
use crate::infrastructure::memory::MemoryDataService;
use crate::{AUTHORS_TABLE, CATEGORIES_TABLE, COMMENTS_TABLE, POST_TAGS_TABLE, POSTS_TABLE, TAGS_TABLE};

/// Turns a JSON object literal into a record.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be a JSON object, got {}", other),
    }
}

pub fn category_record(id: &str, name: &str, slug: &str) -> Record {
    record(json!({
        "id": id,
        "name": name,
        "slug": slug,
        "description": null,
        "created_at": "2025-01-01T00:00:00Z"
    }))
}

pub fn post_record(
    id: &str,
    title: &str,
    status: &str,
    category_id: Option<&str>,
    published_at: Option<&str>,
) -> Record {
    record(json!({
        "id": id,
        "title": title,
        "slug": crate::slug::slugify(title),
        "content": format!("Content of {}", title),
        "excerpt": null,
        "featured_image": null,
        "author_id": 1,
        "category_id": category_id,
        "status": status,
        "published_at": published_at,
        "created_at": published_at.unwrap_or("2025-01-01T00:00:00Z"),
        "updated_at": published_at.unwrap_or("2025-01-01T00:00:00Z")
    }))
}

pub fn comment_record(id: &str, post_id: &str, author: &str, status: &str, created_at: &str) -> Record {
    record(json!({
        "id": id,
        "post_id": post_id,
        "author_name": author,
        "author_email": format!("{}@example.com", author.to_lowercase()),
        "content": format!("Comment from {}", author),
        "status": status,
        "created_at": created_at
    }))
}

/// A small blog: two categories, five posts in every status, one tag and a
/// handful of comments.
///
/// | post | title               | status    | category | published_at         |
/// |------|---------------------|-----------|----------|----------------------|
/// | p1   | Hello Rust          | published | tech     | 2025-02-01 (+ image) |
/// | p2   | Async in Practice   | published | tech     | 2025-03-01           |
/// | p3   | Draft Notes         | draft     | life     | -                    |
/// | p4   | Weekend Walk        | published | life     | 2025-01-15           |
/// | p5   | Old News            | archived  | -        | 2024-06-01           |
pub fn seeded_blog() -> MemoryDataService {
    let store = MemoryDataService::blog();

    store.seed(
        CATEGORIES_TABLE,
        [
            category_record("c-tech", "Tech", "tech"),
            category_record("c-life", "Life", "life"),
        ],
    );
    store.seed(
        AUTHORS_TABLE,
        [record(json!({"id": 1, "first_name": "Ada", "last_name": "Lovelace"}))],
    );

    let mut hello = post_record("p1", "Hello Rust", "published", Some("c-tech"), Some("2025-02-01T10:00:00Z"));
    hello.insert("featured_image".into(), json!("https://img.example.com/hello.png"));
    store.seed(
        POSTS_TABLE,
        [
            hello,
            post_record("p2", "Async in Practice", "published", Some("c-tech"), Some("2025-03-01T10:00:00Z")),
            post_record("p3", "Draft Notes", "draft", Some("c-life"), None),
            post_record("p4", "Weekend Walk", "published", Some("c-life"), Some("2025-01-15T10:00:00Z")),
            post_record("p5", "Old News", "archived", None, Some("2024-06-01T10:00:00Z")),
        ],
    );

    store.seed(
        TAGS_TABLE,
        [record(json!({"id": "t-rust", "name": "Rust", "slug": "rust", "created_at": "2025-01-01T00:00:00Z"}))],
    );
    store.seed(
        POST_TAGS_TABLE,
        [record(json!({"id": "pt-1", "post_id": "p1", "tag_id": "t-rust"}))],
    );

    store.seed(
        COMMENTS_TABLE,
        [
            comment_record("cm1", "p1", "Grace", "approved", "2025-02-02T10:00:00Z"),
            comment_record("cm2", "p1", "Linus", "pending", "2025-02-03T10:00:00Z"),
            comment_record("cm3", "p2", "Barbara", "rejected", "2025-03-02T10:00:00Z"),
            comment_record("cm4", "p1", "Ken", "approved", "2025-02-04T10:00:00Z"),
        ],
    );

    store
}
