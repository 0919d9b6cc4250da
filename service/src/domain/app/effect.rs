//! I/O requested by the application and the outcomes fed back into it.
//!
//! Effects are plain values so the state machine never awaits while holding
//! the session lock. Each one carries the [`Ticket`] it was issued under.

use futures::join;
use quire_common::data::{DataError, DataService};
use quire_common::entities::{
    Category, CategoryId, Comment, CommentId, ModeratedComment, Moderation, Post, PostId,
};

use crate::domain::admin::{self, AdminStats, CategoryDeletePolicy, CategoryInput, PostInput};
use crate::domain::auth::{CredentialVerifier, Credentials};
use crate::domain::blog::{self, NewComment};

/// Which generation counter a ticket is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// The active view; bumped on every mount.
    View,
    /// The site header; bumped when the site is entered.
    Header,
}

/// Generation an effect was issued under. Outcomes carrying an older
/// generation than the current one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub lane: Lane,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(Ticket, Fetch),
    Write(Ticket, Write),
    Authenticate(Ticket, Credentials),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Header,
    Home { featured: u64, recent: u64 },
    Post { slug: String },
    Category { slug: String, limit: u64 },
    Dashboard { recent: u64 },
    Posts,
    Editor { post_id: Option<PostId> },
    Categories,
    Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    SubmitComment(NewComment),
    CreatePost(PostInput),
    UpdatePost(PostId, PostInput),
    DeletePost(PostId),
    CreateCategory(CategoryInput),
    UpdateCategory(CategoryId, CategoryInput),
    DeleteCategory(CategoryId, CategoryDeletePolicy),
    Moderate(CommentId, Moderation),
    DeleteComment(CommentId),
}

#[derive(Debug)]
pub struct Outcome {
    pub ticket: Ticket,
    pub result: Resolved,
}

#[derive(Debug)]
pub enum Resolved {
    Loaded(Loaded),
    Written(Written),
    Authenticated(Result<bool, anyhow::Error>),
}

#[derive(Debug)]
pub enum Loaded {
    Header(Result<Vec<Category>, DataError>),
    Home {
        featured: Result<Vec<Post>, DataError>,
        recent: Result<Vec<Post>, DataError>,
    },
    Post {
        post: Result<Post, DataError>,
        /// Only requested once the post itself was found.
        comments: Option<Result<Vec<Comment>, DataError>>,
    },
    Category(Result<Vec<Post>, DataError>),
    Dashboard {
        recent: Result<Vec<Post>, DataError>,
        categories: Result<Vec<Category>, DataError>,
        stats: Result<AdminStats, DataError>,
    },
    Posts(Result<Vec<Post>, DataError>),
    Editor {
        categories: Result<Vec<Category>, DataError>,
        post: Option<Result<Post, DataError>>,
    },
    Categories(Result<Vec<Category>, DataError>),
    Comments(Result<Vec<ModeratedComment>, DataError>),
}

#[derive(Debug)]
pub enum Written {
    CommentSubmitted(Result<Comment, DataError>),
    PostSaved(Result<Post, DataError>),
    PostDeleted(PostId, Result<(), DataError>),
    CategorySaved(Result<Category, DataError>),
    CategoryDeleted(CategoryId, Result<(), DataError>),
    CommentModerated(Result<Comment, DataError>),
    CommentDeleted(CommentId, Result<(), DataError>),
}

impl Effect {
    pub async fn run<D: DataService, V: CredentialVerifier>(self, data: &D, verifier: &V) -> Outcome {
        match self {
            Effect::Fetch(ticket, fetch) => Outcome {
                ticket,
                result: Resolved::Loaded(fetch.run(data).await),
            },
            Effect::Write(ticket, write) => Outcome {
                ticket,
                result: Resolved::Written(write.run(data).await),
            },
            Effect::Authenticate(ticket, credentials) => Outcome {
                ticket,
                result: Resolved::Authenticated(verifier.verify(&credentials).await),
            },
        }
    }
}

impl Fetch {
    async fn run(self, data: &impl DataService) -> Loaded {
        match self {
            Fetch::Header => Loaded::Header(blog::get_categories(data).await),
            Fetch::Home { featured, recent } => {
                let (featured, recent) = join!(
                    blog::get_featured_posts(data, featured),
                    blog::get_posts(data, recent, 0),
                );
                Loaded::Home { featured, recent }
            }
            Fetch::Post { slug } => {
                let post = blog::get_post_by_slug(data, &slug).await;
                let comments = match &post {
                    Ok(post) => Some(blog::get_comments_by_post(data, &post.id).await),
                    Err(_) => None,
                };
                Loaded::Post { post, comments }
            }
            Fetch::Category { slug, limit } => {
                Loaded::Category(blog::get_posts_by_category(data, &slug, limit).await)
            }
            Fetch::Dashboard { recent } => {
                let (recent, categories, stats) = join!(
                    blog::get_posts(data, recent, 0),
                    blog::get_categories(data),
                    admin::get_admin_stats(data),
                );
                Loaded::Dashboard {
                    recent,
                    categories,
                    stats,
                }
            }
            Fetch::Posts => Loaded::Posts(admin::get_all_posts(data).await),
            Fetch::Editor { post_id } => {
                let post = async {
                    match &post_id {
                        Some(id) => Some(admin::get_post_by_id(data, id).await),
                        None => None,
                    }
                };
                let (categories, post) = join!(blog::get_categories(data), post);
                Loaded::Editor { categories, post }
            }
            Fetch::Categories => Loaded::Categories(blog::get_categories(data).await),
            Fetch::Comments => Loaded::Comments(admin::get_all_comments(data).await),
        }
    }
}

impl Write {
    async fn run(self, data: &impl DataService) -> Written {
        match self {
            Write::SubmitComment(comment) => Written::CommentSubmitted(blog::create_comment(data, &comment).await),
            Write::CreatePost(input) => Written::PostSaved(admin::create_post(data, &input).await),
            Write::UpdatePost(id, input) => Written::PostSaved(admin::update_post(data, &id, &input).await),
            Write::DeletePost(id) => {
                let result = admin::delete_post(data, &id).await;
                Written::PostDeleted(id, result)
            }
            Write::CreateCategory(input) => Written::CategorySaved(admin::create_category(data, &input).await),
            Write::UpdateCategory(id, input) => {
                Written::CategorySaved(admin::update_category(data, &id, &input).await)
            }
            Write::DeleteCategory(id, policy) => {
                let result = admin::delete_category(data, &id, policy).await;
                Written::CategoryDeleted(id, result)
            }
            Write::Moderate(id, verdict) => {
                Written::CommentModerated(admin::update_comment_status(data, &id, verdict).await)
            }
            Write::DeleteComment(id) => {
                let result = admin::delete_comment(data, &id).await;
                Written::CommentDeleted(id, result)
            }
        }
    }
}
