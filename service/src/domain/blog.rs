//! Queries behind the public site.
//!
//! Each function is a thin pass-through to the upstream [`DataService`]: it
//! builds one select (or insert), decodes the rows and embeds related records.
//! Nothing is cached and nothing is retried; the caller owns whatever it gets back.

use std::collections::HashMap;

use futures::try_join;
use itertools::Itertools;
use quire_common::data::{DataError, DataService, Record, SelectQuery, decode, decode_all, encode};
use quire_common::entities::{Author, Category, Comment, CommentStatus, Post, PostId, PostStatus, PostTag, Tag, TagId};
use quire_common::{
    AUTHORS_TABLE, CATEGORIES_TABLE, CATEGORY_ID_FIELD_NAME, COMMENTS_TABLE, CREATED_FIELD_NAME,
    FEATURED_IMAGE_FIELD_NAME, ID_FIELD_NAME, NAME_FIELD_NAME, POST_ID_FIELD_NAME, POST_TAGS_TABLE,
    POSTS_TABLE, PUBLISHED_FIELD_NAME, SLUG_FIELD_NAME, STATUS_FIELD_NAME, TAGS_TABLE,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_FEATURED_COUNT: u64 = 3;

/// Comment as submitted by a reader. Status is not part of the payload: new
/// comments always enter the moderation queue as pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
}

/// Published posts, newest first, rows `[offset, offset + limit)`.
pub async fn get_posts(data: &impl DataService, limit: u64, offset: u64) -> Result<Vec<Post>, DataError> {
    let query = published()
        .order_desc(PUBLISHED_FIELD_NAME)
        .range(offset, limit);
    let posts = decode_all(data.select(POSTS_TABLE, query).await?, "post")?;
    embed_relations(data, posts, true).await
}

/// The published post with `slug`.
pub async fn get_post_by_slug(data: &impl DataService, slug: &str) -> Result<Post, DataError> {
    let query = published().eq(SLUG_FIELD_NAME, slug).limit(1);
    let post = single(data.select(POSTS_TABLE, query).await?, POSTS_TABLE, "post")?;
    embed_relations(data, vec![post], true)
        .await?
        .pop()
        .ok_or_else(|| DataError::not_found(POSTS_TABLE))
}

/// Every category, alphabetically.
pub async fn get_categories(data: &impl DataService) -> Result<Vec<Category>, DataError> {
    let query = SelectQuery::new().order_asc(NAME_FIELD_NAME);
    decode_all(data.select(CATEGORIES_TABLE, query).await?, "category")
}

/// Published posts of the category with `category_slug`, newest first.
/// An unknown category yields no posts.
pub async fn get_posts_by_category(
    data: &impl DataService,
    category_slug: &str,
    limit: u64,
) -> Result<Vec<Post>, DataError> {
    let query = SelectQuery::new().eq(SLUG_FIELD_NAME, category_slug).limit(1);
    let Some(record) = data.select(CATEGORIES_TABLE, query).await?.into_iter().next() else {
        return Ok(Vec::new());
    };
    let category: Category = decode(record, "category")?;

    let query = published()
        .eq(CATEGORY_ID_FIELD_NAME, category.id.as_ref())
        .order_desc(PUBLISHED_FIELD_NAME)
        .limit(limit);
    let posts = decode_all(data.select(POSTS_TABLE, query).await?, "post")?;
    embed_relations(data, posts, false).await
}

/// Approved comments of a post, newest first.
pub async fn get_comments_by_post(data: &impl DataService, post_id: &PostId) -> Result<Vec<Comment>, DataError> {
    let query = SelectQuery::new()
        .eq(POST_ID_FIELD_NAME, post_id.as_ref())
        .eq(STATUS_FIELD_NAME, CommentStatus::Approved.as_str())
        .order_desc(CREATED_FIELD_NAME);
    decode_all(data.select(COMMENTS_TABLE, query).await?, "comment")
}

/// Store a reader's comment; it starts pending whatever the payload says.
pub async fn create_comment(data: &impl DataService, comment: &NewComment) -> Result<Comment, DataError> {
    let mut record = encode(comment, "comment")?;
    record.insert(
        STATUS_FIELD_NAME.to_string(),
        Value::from(CommentStatus::Pending.as_str()),
    );
    decode(data.insert(COMMENTS_TABLE, record).await?, "comment")
}

/// Published posts that have a featured image, newest first.
pub async fn get_featured_posts(data: &impl DataService, limit: u64) -> Result<Vec<Post>, DataError> {
    let query = published()
        .not_null(FEATURED_IMAGE_FIELD_NAME)
        .order_desc(PUBLISHED_FIELD_NAME)
        .limit(limit);
    let posts = decode_all(data.select(POSTS_TABLE, query).await?, "post")?;
    embed_relations(data, posts, false).await
}

fn published() -> SelectQuery {
    SelectQuery::new().eq(STATUS_FIELD_NAME, PostStatus::Published.as_str())
}

/// First record decoded, or `NotFound` for an empty result.
pub(crate) fn single<T: serde::de::DeserializeOwned>(
    records: Vec<Record>,
    table: &str,
    entity: &'static str,
) -> Result<T, DataError> {
    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| DataError::not_found(table))?;
    decode(record, entity)
}

/// Embed category, author and (optionally) tags into `posts`.
///
/// The three lookups are independent and run concurrently; a failure of any of
/// them fails the whole query, the way a join would.
pub(crate) async fn embed_relations(
    data: &impl DataService,
    mut posts: Vec<Post>,
    with_tags: bool,
) -> Result<Vec<Post>, DataError> {
    if posts.is_empty() {
        return Ok(posts);
    }

    let category_ids: Vec<String> = posts
        .iter()
        .filter_map(|post| post.category_id.as_ref().map(|id| id.0.clone()))
        .unique()
        .collect();
    let author_ids: Vec<i64> = posts.iter().map(|post| post.author_id.0).unique().collect();
    let post_ids: Vec<String> = posts.iter().map(|post| post.id.0.clone()).collect();

    let (categories, authors, mut tags) = try_join!(
        fetch_by_ids::<Category, _>(data, CATEGORIES_TABLE, category_ids, "category"),
        fetch_by_ids::<Author, _>(data, AUTHORS_TABLE, author_ids, "author"),
        fetch_tags(data, post_ids, with_tags),
    )?;

    let categories: HashMap<_, _> = categories.into_iter().map(|c| (c.id.clone(), c)).collect();
    let authors: HashMap<_, _> = authors.into_iter().map(|a| (a.id, a)).collect();

    for post in posts.iter_mut() {
        post.category = post
            .category_id
            .as_ref()
            .and_then(|id| categories.get(id))
            .cloned();
        post.author = authors.get(&post.author_id).cloned();
        post.tags = tags.remove(&post.id).unwrap_or_default();
    }

    Ok(posts)
}

async fn fetch_by_ids<T, V>(
    data: &impl DataService,
    table: &str,
    ids: Vec<V>,
    entity: &'static str,
) -> Result<Vec<T>, DataError>
where
    T: serde::de::DeserializeOwned,
    V: Into<Value>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let query = SelectQuery::new().any_of(ID_FIELD_NAME, ids);
    decode_all(data.select(table, query).await?, entity)
}

async fn fetch_tags(
    data: &impl DataService,
    post_ids: Vec<String>,
    with_tags: bool,
) -> Result<HashMap<PostId, Vec<Tag>>, DataError> {
    if !with_tags || post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query = SelectQuery::new().any_of(POST_ID_FIELD_NAME, post_ids);
    let links: Vec<PostTag> = decode_all(data.select(POST_TAGS_TABLE, query).await?, "post tag")?;
    let tag_ids: Vec<String> = links.iter().map(|link| link.tag_id.0.clone()).unique().collect();

    let tags: HashMap<TagId, Tag> = fetch_by_ids::<Tag, _>(data, TAGS_TABLE, tag_ids, "tag")
        .await?
        .into_iter()
        .map(|tag| (tag.id.clone(), tag))
        .collect();

    let mut grouped = links
        .into_iter()
        .filter_map(|link| tags.get(&link.tag_id).map(|tag| (link.post_id, tag.clone())))
        .into_group_map();
    for tags in grouped.values_mut() {
        tags.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use quire_common::test_utils::seeded_blog;

    use super::*;

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_ref()).collect()
    }

    #[tokio::test]
    async fn posts_are_published_only_and_newest_first() {
        let store = seeded_blog();

        let posts = get_posts(&store, DEFAULT_PAGE_SIZE, 0).await.unwrap();

        assert_eq!(ids(&posts), vec!["p2", "p1", "p4"]);
        assert!(posts.iter().all(|p| p.status == PostStatus::Published));
    }

    #[tokio::test]
    async fn posts_page_honours_offset_and_limit() {
        let store = seeded_blog();

        let page = get_posts(&store, 1, 1).await.unwrap();

        assert_eq!(ids(&page), vec!["p1"]);
    }

    #[tokio::test]
    async fn posts_embed_category_author_and_tags() {
        let store = seeded_blog();

        let posts = get_posts(&store, DEFAULT_PAGE_SIZE, 0).await.unwrap();
        let hello = posts.iter().find(|p| p.id.as_ref() == "p1").unwrap();

        assert_eq!(hello.category.as_ref().map(|c| c.name.as_str()), Some("Tech"));
        assert_eq!(hello.author_name(), "Ada Lovelace");
        assert_eq!(hello.tags.iter().map(|t| t.slug.as_str()).collect::<Vec<_>>(), vec!["rust"]);
    }

    #[tokio::test]
    async fn post_by_slug_only_finds_published_posts() {
        let store = seeded_blog();

        let post = get_post_by_slug(&store, "hello-rust").await.unwrap();
        assert_eq!(post.id.as_ref(), "p1");

        let draft = get_post_by_slug(&store, "draft-notes").await;
        assert_eq!(draft, Err(DataError::not_found(POSTS_TABLE)));
    }

    #[tokio::test]
    async fn categories_are_alphabetical() {
        let store = seeded_blog();

        let categories = get_categories(&store).await.unwrap();

        assert_eq!(
            categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Life", "Tech"]
        );
    }

    #[tokio::test]
    async fn posts_by_category_match_slug() {
        let store = seeded_blog();

        let tech = get_posts_by_category(&store, "tech", DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(ids(&tech), vec!["p2", "p1"]);

        let life = get_posts_by_category(&store, "life", DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(ids(&life), vec!["p4"]);

        let unknown = get_posts_by_category(&store, "missing", DEFAULT_PAGE_SIZE).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn only_approved_comments_are_public() {
        let store = seeded_blog();

        let comments = get_comments_by_post(&store, &PostId::from("p1")).await.unwrap();

        assert_eq!(
            comments.iter().map(|c| c.id.as_ref()).collect::<Vec<_>>(),
            vec!["cm4", "cm1"]
        );
    }

    #[tokio::test]
    async fn new_comments_start_pending() {
        let store = seeded_blog();
        let comment = NewComment {
            post_id: PostId::from("p1"),
            author_name: "Reader".into(),
            author_email: "reader@example.com".into(),
            content: "Great read".into(),
        };

        let created = create_comment(&store, &comment).await.unwrap();

        assert_eq!(created.status, CommentStatus::Pending);
        let public = get_comments_by_post(&store, &PostId::from("p1")).await.unwrap();
        assert!(public.iter().all(|c| c.id != created.id));
    }

    #[tokio::test]
    async fn featured_posts_need_an_image() {
        let store = seeded_blog();

        let featured = get_featured_posts(&store, DEFAULT_FEATURED_COUNT).await.unwrap();

        assert_eq!(ids(&featured), vec!["p1"]);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = seeded_blog();
        store.fail(CATEGORIES_TABLE);

        assert!(matches!(get_categories(&store).await, Err(DataError::Backend(_))));
        assert!(get_posts(&store, DEFAULT_PAGE_SIZE, 0).await.is_err());
    }
}
