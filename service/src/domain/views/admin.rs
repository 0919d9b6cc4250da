use quire_common::entities::{
    AuthorId, Category, CategoryId, Comment, CommentId, CommentStatus, ModeratedComment, Post, PostId, PostStatus,
};
use quire_common::slug::SlugField;
use serde::{Deserialize, Serialize};

use crate::domain::admin::{AdminStats, CategoryInput, PostInput};
use crate::domain::navigation::EditorTarget;

use super::{ListFilter, Loadable};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginView {
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub recent_posts: Loadable<Vec<Post>>,
    pub categories: Loadable<Vec<Category>>,
    pub stats: Loadable<AdminStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsView {
    pub posts: Loadable<Vec<Post>>,
    pub filter: ListFilter<PostStatus>,
}

impl PostsView {
    pub fn visible(&self) -> Vec<&Post> {
        self.posts
            .ready()
            .map(|posts| self.filter.apply(posts))
            .unwrap_or_default()
    }

    pub fn remove(&mut self, id: &PostId) {
        if let Some(posts) = self.posts.ready_mut() {
            posts.retain(|post| &post.id != id);
        }
    }
}

/// Local draft of the post editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub slug: SlugField,
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub category_id: Option<CategoryId>,
    pub status: PostStatus,
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostField {
    Title(String),
    Slug(String),
    Content(String),
    Excerpt(String),
    FeaturedImage(String),
    Category(Option<CategoryId>),
}

impl PostDraft {
    pub fn new(author_id: AuthorId) -> Self {
        Self {
            title: String::new(),
            slug: SlugField::default(),
            content: String::new(),
            excerpt: String::new(),
            featured_image: String::new(),
            category_id: None,
            status: PostStatus::Draft,
            author_id,
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: SlugField::existing(post.slug.as_str()),
            content: post.content.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            featured_image: post.featured_image.clone().unwrap_or_default(),
            category_id: post.category_id.clone(),
            status: post.status,
            author_id: post.author_id,
        }
    }

    pub fn edit(&mut self, field: PostField) {
        match field {
            PostField::Title(title) => {
                self.slug.follow(&title);
                self.title = title;
            }
            PostField::Slug(slug) => self.slug.edit(slug),
            PostField::Content(content) => self.content = content,
            PostField::Excerpt(excerpt) => self.excerpt = excerpt,
            PostField::FeaturedImage(url) => self.featured_image = url,
            PostField::Category(category_id) => self.category_id = category_id,
        }
    }

    /// Validated write for the chosen target `status`.
    pub fn to_input(&self, status: PostStatus) -> Result<PostInput, &'static str> {
        let title = self.title.trim();
        if title.is_empty() || self.content.trim().is_empty() {
            return Err("Please fill in the title and content");
        }
        let slug = self
            .slug
            .resolve(title)
            .map_err(|_| "Please enter a valid slug")?;

        Ok(PostInput {
            title: title.to_string(),
            slug,
            content: self.content.clone(),
            excerpt: non_blank(&self.excerpt),
            featured_image: non_blank(&self.featured_image),
            category_id: self.category_id.clone(),
            status,
            author_id: self.author_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub target: EditorTarget,
    pub draft: Loadable<PostDraft>,
    pub categories: Loadable<Vec<Category>>,
    pub preview: bool,
    pub saving: bool,
}

impl EditorView {
    pub fn new(target: EditorTarget, author_id: AuthorId) -> Self {
        let draft = match target {
            EditorTarget::New => Loadable::Ready(PostDraft::new(author_id)),
            EditorTarget::Existing(_) => Loadable::Loading,
        };
        Self {
            target,
            draft,
            categories: Loadable::Loading,
            preview: false,
            saving: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoriesView {
    pub categories: Loadable<Vec<Category>>,
    pub form: Option<CategoryForm>,
}

impl CategoriesView {
    /// Replace the category with the same id, or append it.
    pub fn save(&mut self, category: Category) {
        let Some(categories) = self.categories.ready_mut() else {
            return;
        };
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => categories.push(category),
        }
    }

    pub fn remove(&mut self, id: &CategoryId) {
        if let Some(categories) = self.categories.ready_mut() {
            categories.retain(|category| &category.id != id);
        }
    }

    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.ready()?.iter().find(|c| &c.id == id)
    }
}

/// Create/edit form of the categories manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryForm {
    pub editing: Option<CategoryId>,
    pub name: String,
    pub slug: SlugField,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Name(String),
    Slug(String),
    Description(String),
}

impl CategoryForm {
    pub fn for_category(category: &Category) -> Self {
        Self {
            editing: Some(category.id.clone()),
            name: category.name.clone(),
            slug: SlugField::existing(category.slug.as_str()),
            description: category.description.clone().unwrap_or_default(),
        }
    }

    pub fn edit(&mut self, field: CategoryField) {
        match field {
            CategoryField::Name(name) => {
                self.slug.follow(&name);
                self.name = name;
            }
            CategoryField::Slug(slug) => self.slug.edit(slug),
            CategoryField::Description(description) => self.description = description,
        }
    }

    pub fn to_input(&self) -> Result<CategoryInput, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please enter a category name");
        }
        let slug = self
            .slug
            .resolve(name)
            .map_err(|_| "Please enter a valid slug")?;

        Ok(CategoryInput {
            name: name.to_string(),
            slug,
            description: non_blank(&self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentsView {
    pub comments: Loadable<Vec<ModeratedComment>>,
    pub filter: ListFilter<CommentStatus>,
}

impl CommentsView {
    pub fn visible(&self) -> Vec<&ModeratedComment> {
        self.comments
            .ready()
            .map(|comments| self.filter.apply(comments))
            .unwrap_or_default()
    }

    /// Swap in the stored comment, keeping the post it was listed with.
    pub fn replace(&mut self, comment: Comment) {
        if let Some(entry) = self
            .comments
            .ready_mut()
            .and_then(|comments| comments.iter_mut().find(|c| c.comment.id == comment.id))
        {
            entry.comment = comment;
        }
    }

    pub fn remove(&mut self, id: &CommentId) {
        if let Some(comments) = self.comments.ready_mut() {
            comments.retain(|entry| &entry.comment.id != id);
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
