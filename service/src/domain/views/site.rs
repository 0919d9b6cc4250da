use quire_common::entities::{Category, Comment, Post, PostId};
use serde::{Deserialize, Serialize};

use crate::domain::blog::NewComment;

use super::Loadable;

/// Site chrome: category menu, loaded once per visit of the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderView {
    pub categories: Loadable<Vec<Category>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeView {
    pub featured: Loadable<Vec<Post>>,
    pub recent: Loadable<Vec<Post>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub slug: String,
    pub post: Loadable<Post>,
    pub comments: Loadable<Vec<Comment>>,
    pub form: CommentForm,
    pub submitting: bool,
}

impl PostView {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            post: Loadable::Loading,
            comments: Loadable::Loading,
            form: CommentForm::default(),
            submitting: false,
        }
    }
}

/// Reader's comment draft on the post page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentForm {
    pub author_name: String,
    pub author_email: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentField {
    AuthorName(String),
    AuthorEmail(String),
    Content(String),
}

impl CommentForm {
    pub fn edit(&mut self, field: CommentField) {
        match field {
            CommentField::AuthorName(value) => self.author_name = value,
            CommentField::AuthorEmail(value) => self.author_email = value,
            CommentField::Content(value) => self.content = value,
        }
    }

    /// The comment to store, once every field is filled in.
    pub fn to_new_comment(&self, post_id: &PostId) -> Result<NewComment, &'static str> {
        let name = self.author_name.trim();
        let email = self.author_email.trim();
        let content = self.content.trim();
        if name.is_empty() || email.is_empty() || content.is_empty() {
            return Err("Please fill in your name, email and comment");
        }

        Ok(NewComment {
            post_id: post_id.clone(),
            author_name: name.to_string(),
            author_email: email.to_string(),
            content: content.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub slug: String,
    pub posts: Loadable<Vec<Post>>,
}

impl CategoryView {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            posts: Loadable::Loading,
        }
    }

    /// Heading of the page: the category of the first post, or the slug when
    /// there is nothing to take it from.
    pub fn name(&self) -> String {
        self.posts
            .ready()
            .and_then(|posts| posts.first())
            .and_then(|post| post.category.as_ref())
            .map(|category| category.name.clone())
            .unwrap_or_else(|| self.slug.clone())
    }
}
