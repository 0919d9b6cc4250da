use quire_common::entities::{CommentStatus, ModeratedComment, Post, PostStatus};
use serde::de::{DeserializeOwned, IntoDeserializer, value::StrDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

/// Item of a list that can be searched and filtered by status.
pub trait Searchable {
    type Status: PartialEq;

    fn status(&self) -> Self::Status;

    /// Texts the search term is looked up in.
    fn haystacks(&self) -> [&str; 2];
}

impl Searchable for Post {
    type Status = PostStatus;

    fn status(&self) -> PostStatus {
        self.status
    }

    fn haystacks(&self) -> [&str; 2] {
        [&self.title, &self.content]
    }
}

impl Searchable for ModeratedComment {
    type Status = CommentStatus;

    fn status(&self) -> CommentStatus {
        self.comment.status
    }

    fn haystacks(&self) -> [&str; 2] {
        [&self.comment.content, &self.comment.author_name]
    }
}

/// Search term and status filter of an admin list. Applied locally on the
/// loaded rows; no status means all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFilter<S> {
    pub term: String,
    pub status: Option<S>,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self {
            term: String::new(),
            status: None,
        }
    }
}

impl<S: PartialEq> ListFilter<S> {
    pub fn matches<T: Searchable<Status = S>>(&self, item: &T) -> bool {
        let status_matches = self
            .status
            .as_ref()
            .is_none_or(|status| *status == item.status());
        if !status_matches {
            return false;
        }

        let term = self.term.to_lowercase();
        term.is_empty()
            || item
                .haystacks()
                .iter()
                .any(|text| text.to_lowercase().contains(&term))
    }

    pub fn apply<'a, T: Searchable<Status = S>>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

/// Reads a status filter where `null`, a missing value and `"all"` all mean
/// no filtering.
pub fn status_or_all<'de, D, S>(deserializer: D) -> Result<Option<S>, D::Error>
where
    D: Deserializer<'de>,
    S: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("all") => Ok(None),
        Some(status) => {
            let status: StrDeserializer<'_, D::Error> = status.into_deserializer();
            S::deserialize(status).map(Some)
        }
    }
}
