use quire_common::entities::{CategoryId, CommentId, CommentStatus, Moderation, PostId, PostStatus};
use serde::Deserialize;

use crate::domain::auth::Credentials;
use crate::domain::navigation::Page;
use crate::domain::views::filter::status_or_all;
use crate::domain::views::{CategoryField, CommentField, DeleteTarget, PostField};

/// Everything a user can do, as sent by the shell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // site
    Navigate {
        page: Page,
        #[serde(default)]
        slug: Option<String>,
    },
    OpenPost {
        slug: String,
    },
    Back,
    OpenAdmin,
    EditComment {
        field: CommentField,
    },
    SubmitComment,

    // admin console
    Login(Credentials),
    Logout,
    ExitAdmin,
    ShowDashboard,
    ShowPosts,
    ShowCategories,
    ShowComments,
    NewPost,
    EditExistingPost {
        id: PostId,
    },

    // posts list
    SearchPosts {
        term: String,
    },
    FilterPosts {
        #[serde(default, deserialize_with = "status_or_all")]
        status: Option<PostStatus>,
    },

    // post editor
    EditPost {
        field: PostField,
    },
    TogglePreview,
    SavePost {
        status: PostStatus,
    },

    // categories manager
    NewCategory,
    EditCategory {
        id: CategoryId,
    },
    UpdateCategoryForm {
        field: CategoryField,
    },
    SubmitCategory,
    CloseCategoryForm,

    // comments manager
    SearchComments {
        term: String,
    },
    FilterComments {
        #[serde(default, deserialize_with = "status_or_all")]
        status: Option<CommentStatus>,
    },
    Moderate {
        id: CommentId,
        verdict: Moderation,
    },

    // confirmation and notices
    RequestDelete {
        target: DeleteTarget,
    },
    Confirm,
    Cancel,
    DismissNotice,
}
