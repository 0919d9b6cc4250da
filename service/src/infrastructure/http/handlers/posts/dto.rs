use quire_common::entities::{Comment, Post};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyResponse<T: Serialize> {
    data: Vec<T>,
    meta: MetadataResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataResponse {
    total: usize,
}

impl<T: Serialize> From<Vec<T>> for ManyResponse<T> {
    fn from(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            data,
            meta: MetadataResponse { total },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneResponse<T: Serialize> {
    data: T,
}

impl<T: Serialize> From<T> for OneResponse<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

/// A post page: the post with its approved comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}
