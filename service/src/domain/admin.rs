//! Queries behind the admin console: full CRUD on posts and categories and
//! comment moderation. Like the public queries these write straight through to
//! the upstream service and leave local state to the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use futures::try_join;
use itertools::Itertools;
use quire_common::data::{DataError, DataService, Record, SelectQuery, decode, decode_all, encode};
use quire_common::entities::{
    AuthorId, Category, CategoryId, Comment, CommentId, CommentStatus, ModeratedComment, Moderation, Post, PostId,
    PostStatus, PostSummary, published_at_after,
};
use quire_common::slug::Slug;
use quire_common::{
    CATEGORIES_TABLE, CATEGORY_ID_FIELD_NAME, COMMENTS_TABLE, CREATED_FIELD_NAME, ID_FIELD_NAME,
    POSTS_TABLE, PUBLISHED_FIELD_NAME, STATUS_FIELD_NAME, UPDATED_FIELD_NAME,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::blog::{embed_relations, single};

/// Everything the editor writes for a post. Timestamps are managed here, not
/// by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostInput {
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<CategoryId>,
    pub status: PostStatus,
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
}

/// What happens to posts that still reference a category being deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryDeletePolicy {
    /// Refuse the delete while any post references the category.
    #[default]
    Block,
    /// Clear the reference on those posts, then delete.
    Detach,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub total_comments: usize,
}

// Posts

/// Every post regardless of status, most recently created first.
pub async fn get_all_posts(data: &impl DataService) -> Result<Vec<Post>, DataError> {
    let query = SelectQuery::new().order_desc(CREATED_FIELD_NAME);
    let posts = decode_all(data.select(POSTS_TABLE, query).await?, "post")?;
    embed_relations(data, posts, false).await
}

pub async fn get_post_by_id(data: &impl DataService, id: &PostId) -> Result<Post, DataError> {
    let query = SelectQuery::new().eq(ID_FIELD_NAME, id.as_ref()).limit(1);
    let post = single(data.select(POSTS_TABLE, query).await?, POSTS_TABLE, "post")?;
    embed_relations(data, vec![post], false)
        .await?
        .pop()
        .ok_or_else(|| DataError::not_found(POSTS_TABLE))
}

/// Insert a post; a post created as published is stamped right away.
pub async fn create_post(data: &impl DataService, input: &PostInput) -> Result<Post, DataError> {
    let now = Utc::now();
    let mut record = encode(input, "post")?;
    record.insert(
        PUBLISHED_FIELD_NAME.to_string(),
        timestamp_value(published_at_after(None, input.status, now)),
    );
    record.insert(UPDATED_FIELD_NAME.to_string(), timestamp_value(Some(now)));

    let post = decode(data.insert(POSTS_TABLE, record).await?, "post")?;
    embed_relations(data, vec![post], false)
        .await?
        .pop()
        .ok_or_else(|| DataError::not_found(POSTS_TABLE))
}

/// Update a post. When the new status is published, the stored
/// `published_at` is read first and only filled in if it was never set.
pub async fn update_post(data: &impl DataService, id: &PostId, input: &PostInput) -> Result<Post, DataError> {
    let now = Utc::now();
    let mut changes = encode(input, "post")?;
    changes.insert(UPDATED_FIELD_NAME.to_string(), timestamp_value(Some(now)));

    if input.status == PostStatus::Published {
        let query = SelectQuery::new().eq(ID_FIELD_NAME, id.as_ref()).limit(1);
        let current: Post = single(data.select(POSTS_TABLE, query).await?, POSTS_TABLE, "post")?;
        let resolved = published_at_after(current.published_at, input.status, now);
        if resolved != current.published_at {
            changes.insert(PUBLISHED_FIELD_NAME.to_string(), timestamp_value(resolved));
        }
    }

    let post = decode(data.update(POSTS_TABLE, id.as_ref(), changes).await?, "post")?;
    embed_relations(data, vec![post], false)
        .await?
        .pop()
        .ok_or_else(|| DataError::not_found(POSTS_TABLE))
}

pub async fn delete_post(data: &impl DataService, id: &PostId) -> Result<(), DataError> {
    data.delete(POSTS_TABLE, id.as_ref()).await
}

// Categories

pub async fn create_category(data: &impl DataService, input: &CategoryInput) -> Result<Category, DataError> {
    let record = encode(input, "category")?;
    decode(data.insert(CATEGORIES_TABLE, record).await?, "category")
}

pub async fn update_category(
    data: &impl DataService,
    id: &CategoryId,
    input: &CategoryInput,
) -> Result<Category, DataError> {
    let changes = encode(input, "category")?;
    decode(data.update(CATEGORIES_TABLE, id.as_ref(), changes).await?, "category")
}

/// Delete a category, applying `policy` to posts that still reference it.
pub async fn delete_category(
    data: &impl DataService,
    id: &CategoryId,
    policy: CategoryDeletePolicy,
) -> Result<(), DataError> {
    let query = SelectQuery::new().eq(CATEGORY_ID_FIELD_NAME, id.as_ref());
    let referencing = data.select(POSTS_TABLE, query).await?;

    let mut detached = Vec::new();
    if !referencing.is_empty() {
        match policy {
            CategoryDeletePolicy::Block => {
                return Err(DataError::Conflict(format!(
                    "category is still used by {} post(s)",
                    referencing.len()
                )));
            }
            CategoryDeletePolicy::Detach => {
                let post_ids: Vec<String> = referencing.iter().filter_map(record_id).collect();
                tracing::info!(category = %id, posts = post_ids.len(), "detaching posts from category");
                try_join_all(post_ids.iter().map(|post_id| {
                    let mut changes = Record::new();
                    changes.insert(CATEGORY_ID_FIELD_NAME.to_string(), Value::Null);
                    data.update(POSTS_TABLE, post_id, changes)
                }))
                .await?;
                detached = post_ids;
            }
        }
    }

    // detaching is not undone when the delete fails
    data.delete(CATEGORIES_TABLE, id.as_ref()).await.inspect_err(|error| {
        if !detached.is_empty() {
            tracing::warn!(
                category = %id,
                posts = ?detached,
                %error,
                "category delete failed after its posts were detached"
            );
        }
    })
}

// Comments

/// Every comment newest first, each with the title and slug of its post.
pub async fn get_all_comments(data: &impl DataService) -> Result<Vec<ModeratedComment>, DataError> {
    let query = SelectQuery::new().order_desc(CREATED_FIELD_NAME);
    let comments: Vec<Comment> = decode_all(data.select(COMMENTS_TABLE, query).await?, "comment")?;

    let post_ids: Vec<String> = comments
        .iter()
        .map(|comment| comment.post_id.0.clone())
        .unique()
        .collect();
    let summaries: HashMap<PostId, PostSummary> = if post_ids.is_empty() {
        HashMap::new()
    } else {
        let query = SelectQuery::new().any_of(ID_FIELD_NAME, post_ids);
        decode_all::<Post>(data.select(POSTS_TABLE, query).await?, "post")?
            .into_iter()
            .map(|post| {
                let summary = PostSummary {
                    title: post.title,
                    slug: post.slug,
                };
                (post.id, summary)
            })
            .collect()
    };

    Ok(comments
        .into_iter()
        .map(|comment| {
            let post = summaries.get(&comment.post_id).cloned();
            ModeratedComment { comment, post }
        })
        .collect())
}

pub async fn update_comment_status(
    data: &impl DataService,
    id: &CommentId,
    moderation: Moderation,
) -> Result<Comment, DataError> {
    let status = CommentStatus::from(moderation);
    let mut changes = Record::new();
    changes.insert(STATUS_FIELD_NAME.to_string(), Value::from(status.as_str()));
    decode(data.update(COMMENTS_TABLE, id.as_ref(), changes).await?, "comment")
}

pub async fn delete_comment(data: &impl DataService, id: &CommentId) -> Result<(), DataError> {
    data.delete(COMMENTS_TABLE, id.as_ref()).await
}

// Dashboard

/// Post and comment counters for the dashboard; both selects run concurrently.
pub async fn get_admin_stats(data: &impl DataService) -> Result<AdminStats, DataError> {
    let (posts, comments) = try_join!(
        data.select(POSTS_TABLE, SelectQuery::new()),
        data.select(COMMENTS_TABLE, SelectQuery::new()),
    )?;

    let count_status = |status: PostStatus| {
        posts
            .iter()
            .filter(|post| post.get(STATUS_FIELD_NAME).and_then(Value::as_str) == Some(status.as_str()))
            .count()
    };

    Ok(AdminStats {
        total_posts: posts.len(),
        published_posts: count_status(PostStatus::Published),
        draft_posts: count_status(PostStatus::Draft),
        total_comments: comments.len(),
    })
}

fn timestamp_value(at: Option<DateTime<Utc>>) -> Value {
    at.map(|at| Value::String(at.to_rfc3339()))
        .unwrap_or(Value::Null)
}

fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_FIELD_NAME)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
