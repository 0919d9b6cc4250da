mod domain;
mod infrastructure;

pub mod test_utils;

// Upstream table names

pub const POSTS_TABLE: &'static str = "posts";
pub const CATEGORIES_TABLE: &'static str = "categories";
pub const TAGS_TABLE: &'static str = "tags";
pub const POST_TAGS_TABLE: &'static str = "post_tags";
pub const COMMENTS_TABLE: &'static str = "comments";
pub const AUTHORS_TABLE: &'static str = "authors";

// Shared record field names

pub const ID_FIELD_NAME: &'static str = "id";
pub const SLUG_FIELD_NAME: &'static str = "slug";
pub const NAME_FIELD_NAME: &'static str = "name";
pub const STATUS_FIELD_NAME: &'static str = "status";

pub const CREATED_FIELD_NAME: &'static str = "created_at";
pub const UPDATED_FIELD_NAME: &'static str = "updated_at";
pub const PUBLISHED_FIELD_NAME: &'static str = "published_at";

pub const POST_ID_FIELD_NAME: &'static str = "post_id";
pub const TAG_ID_FIELD_NAME: &'static str = "tag_id";
pub const CATEGORY_ID_FIELD_NAME: &'static str = "category_id";
pub const AUTHOR_ID_FIELD_NAME: &'static str = "author_id";
pub const FEATURED_IMAGE_FIELD_NAME: &'static str = "featured_image";

// expose domain module

pub use domain::*;

// expose infrastructure modules

pub use infrastructure::database;
pub use infrastructure::memory::MemoryDataService;
