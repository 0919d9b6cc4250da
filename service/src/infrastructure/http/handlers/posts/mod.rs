use axum::extract::{Path, State};
use axum::http::StatusCode;
use quire_common::entities::{Category, Post};
use serde::Deserialize;

use crate::domain::AppState;
use crate::domain::blog::{self, DEFAULT_FEATURED_COUNT, DEFAULT_PAGE_SIZE};
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::posts::dto::{
    ManyResponse, OneResponse, PostDetailResponse,
};
use crate::infrastructure::http::querystring::QueryString;

mod dto;

const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize, Debug, Default)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageParams {
    fn limit_or(&self, default: u64) -> Result<u64, ApiError> {
        match self.limit.unwrap_or(default) {
            0 => Err(ApiError::UnprocessableEntity("limit must be positive".to_string())),
            limit if limit > MAX_PAGE_SIZE => Err(ApiError::UnprocessableEntity(format!(
                "limit must not exceed {}",
                MAX_PAGE_SIZE
            ))),
            limit => Ok(limit),
        }
    }
}

pub async fn list_posts<S: AppState>(
    QueryString(params): QueryString<PageParams>,
    State(state): State<S>,
) -> Result<ApiSuccess<ManyResponse<Post>>, ApiError> {
    let limit = params.limit_or(DEFAULT_PAGE_SIZE)?;
    let posts = blog::get_posts(state.data(), limit, params.offset.unwrap_or(0)).await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyResponse::from(posts)))
}

pub async fn find_post_by_slug<S: AppState>(
    Path(slug): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<OneResponse<PostDetailResponse>>, ApiError> {
    let post = blog::get_post_by_slug(state.data(), &slug).await?;
    let comments = blog::get_comments_by_post(state.data(), &post.id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        OneResponse::from(PostDetailResponse { post, comments }),
    ))
}

pub async fn list_categories<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<ManyResponse<Category>>, ApiError> {
    let categories = blog::get_categories(state.data()).await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyResponse::from(categories)))
}

pub async fn list_category_posts<S: AppState>(
    Path(slug): Path<String>,
    QueryString(params): QueryString<PageParams>,
    State(state): State<S>,
) -> Result<ApiSuccess<ManyResponse<Post>>, ApiError> {
    let limit = params.limit_or(DEFAULT_PAGE_SIZE)?;
    let posts = blog::get_posts_by_category(state.data(), &slug, limit).await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyResponse::from(posts)))
}

pub async fn list_featured<S: AppState>(
    QueryString(params): QueryString<PageParams>,
    State(state): State<S>,
) -> Result<ApiSuccess<ManyResponse<Post>>, ApiError> {
    let limit = params.limit_or(DEFAULT_FEATURED_COUNT)?;
    let posts = blog::get_featured_posts(state.data(), limit).await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyResponse::from(posts)))
}
