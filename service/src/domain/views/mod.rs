//! State of every screen, independent of how it is rendered.
//!
//! A view is mounted with its parameters, shows [`Loadable::Loading`] for each
//! pending fetch and ends up with the data or an error message. Forms keep a
//! local draft until submitted.

use quire_common::data::DataError;
use quire_common::entities::{CategoryId, CommentId, PostId};
use serde::{Deserialize, Serialize};

pub mod admin;
pub mod filter;
pub mod site;

pub use admin::{
    CategoriesView, CategoryField, CategoryForm, CommentsView, DashboardView, EditorView, LoginView, PostDraft,
    PostField, PostsView,
};
pub use filter::ListFilter;
pub use site::{CommentField, CommentForm, HeaderView, HomeView, PostView, CategoryView};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    /// Outcome of a fetch. Failures are logged here and leave an error state
    /// behind; nothing is retried.
    pub fn settle(result: Result<T, DataError>, what: &str) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load {}", what);
                Loadable::Failed(format!("Could not load {}", what))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Loadable::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Message shown above the current view until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice::Info(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }
}

/// Record a destructive action applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DeleteTarget {
    Post(PostId),
    Category(CategoryId),
    Comment(CommentId),
}

/// Pending delete waiting for the user to confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub prompt: &'static str,
    pub target: DeleteTarget,
}

impl Confirmation {
    pub fn new(target: DeleteTarget) -> Self {
        let prompt = match target {
            DeleteTarget::Post(_) => "Are you sure you want to delete this post?",
            DeleteTarget::Category(_) => "Are you sure you want to delete this category?",
            DeleteTarget::Comment(_) => "Are you sure you want to delete this comment?",
        };
        Self { prompt, target }
    }
}
