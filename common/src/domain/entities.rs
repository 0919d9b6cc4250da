use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

/// Authors live in the upstream user table and carry numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub i64);

impl Default for AuthorId {
    fn default() -> Self {
        Self(1)
    }
}

macro_rules! text_id_conversions {
    ($($id:ident),*) => {
        $(
            impl From<&str> for $id {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }

            impl From<String> for $id {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }

            impl AsRef<str> for $id {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

text_id_conversions!(PostId, CategoryId, TagId, CommentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }
}

/// The only statuses an administrator can move a comment into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moderation {
    Approved,
    Rejected,
}

impl From<Moderation> for CommentStatus {
    fn from(value: Moderation) -> Self {
        match value {
            Moderation::Approved => CommentStatus::Approved,
            Moderation::Rejected => CommentStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the many-to-many join between posts and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTag {
    pub post_id: PostId,
    pub tag_id: TagId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Author {
    /// "First Last", or `Anonymous` unless both parts are present.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            _ => ANONYMOUS_AUTHOR.to_string(),
        }
    }
}

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// A blog post as returned by the upstream service, optionally with its
/// category, author and tags embedded by the data access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub author_id: AuthorId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub status: PostStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl Post {
    pub fn author_name(&self) -> String {
        self.author
            .as_ref()
            .map(Author::display_name)
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
    }
}

/// Resolves the `published_at` a post must carry after a write that leaves it in
/// `status`. The timestamp is set once, on the first transition to published,
/// and is never cleared afterwards.
pub fn published_at_after(
    current: Option<DateTime<Utc>>,
    status: PostStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (current, status) {
        (Some(published_at), _) => Some(published_at),
        (None, PostStatus::Published) => Some(now),
        (None, _) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

/// Title and slug of the post a moderated comment belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
}

/// Comment as listed in the moderation queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratedComment {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(default)]
    pub post: Option<PostSummary>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn first_publish_sets_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(published_at_after(None, PostStatus::Published, now), Some(now));
    }

    #[test]
    fn republishing_keeps_original_timestamp() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();
        assert_eq!(published_at_after(Some(first), PostStatus::Published, later), Some(first));
        assert_eq!(published_at_after(Some(first), PostStatus::Draft, later), Some(first));
    }

    #[test]
    fn drafts_stay_unpublished() {
        let now = Utc::now();
        assert_eq!(published_at_after(None, PostStatus::Draft, now), None);
        assert_eq!(published_at_after(None, PostStatus::Archived, now), None);
    }

    #[test]
    fn author_name_falls_back_to_anonymous() {
        let full = Author {
            id: AuthorId(1),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
        };
        let partial = Author {
            id: AuthorId(2),
            first_name: Some("Ada".into()),
            last_name: None,
        };
        assert_eq!(full.display_name(), "Ada Lovelace");
        assert_eq!(partial.display_name(), "Anonymous");
    }

    #[test]
    fn post_decodes_from_upstream_record() {
        let json = serde_json::json!({
            "id": "6b1f",
            "title": "Hello",
            "slug": "hello",
            "content": "Body",
            "excerpt": null,
            "featured_image": null,
            "author_id": 1,
            "category_id": null,
            "status": "published",
            "published_at": "2025-03-01T12:00:00+00:00",
            "created_at": "2025-03-01T11:00:00.123456+00:00",
            "updated_at": "2025-03-01T12:00:00Z"
        });

        let post: Post = serde_json::from_value(json).unwrap();

        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.category_id, None);
        assert!(post.tags.is_empty());
        assert_eq!(post.author_name(), "Anonymous");
    }

    #[test]
    fn moderated_comment_flattens_comment_fields() {
        let json = serde_json::json!({
            "id": "c1",
            "post_id": "p1",
            "author_name": "Reader",
            "author_email": "reader@example.com",
            "content": "Nice",
            "status": "pending",
            "created_at": "2025-03-01T12:00:00Z",
            "post": { "title": "Hello", "slug": "hello" }
        });

        let moderated: ModeratedComment = serde_json::from_value(json).unwrap();

        assert_eq!(moderated.comment.status, CommentStatus::Pending);
        assert_eq!(moderated.post.unwrap().slug, "hello");
    }
}
