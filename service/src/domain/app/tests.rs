use std::sync::Arc;
use std::time::Duration;

use quire_common::data::DataService;
use quire_common::entities::{CategoryId, CommentId, CommentStatus, Moderation, PostId, PostStatus};
use quire_common::test_utils::seeded_blog;
use quire_common::{CATEGORIES_TABLE, COMMENTS_TABLE, MemoryDataService, POSTS_TABLE};
use serde_json::Value;
use tokio::sync::Mutex;

use super::*;
use crate::domain::admin::CategoryDeletePolicy;
use crate::domain::auth::CredentialVerifier;
use crate::domain::navigation::AddressSync;
use crate::domain::views::{CategoryField, CommentField, PostField};

#[derive(Clone)]
struct StaticVerifier;

impl CredentialVerifier for StaticVerifier {
    async fn verify(&self, credentials: &Credentials) -> Result<bool, anyhow::Error> {
        Ok(credentials.username == "admin" && credentials.password == "admin123")
    }
}

struct Harness {
    app: Arc<Mutex<BlogApp>>,
    store: MemoryDataService,
}

impl Harness {
    async fn start(path: &str) -> Self {
        Self::start_with(AppOptions::default(), path).await
    }

    async fn start_with(options: AppOptions, path: &str) -> Self {
        let harness = Self {
            app: Arc::new(Mutex::new(BlogApp::new(options))),
            store: seeded_blog(),
        };
        start(&harness.app, &harness.store, &StaticVerifier, path).await;
        harness
    }

    async fn admin() -> Self {
        let harness = Self::start("/admin").await;
        harness.send(Command::Login(Credentials::new("admin", "admin123"))).await;
        harness
    }

    async fn send(&self, command: Command) {
        dispatch(&self.app, &self.store, &StaticVerifier, command).await;
    }

    async fn view(&self) -> ActiveView {
        self.app.lock().await.view().clone()
    }

    async fn notice(&self) -> Option<Notice> {
        self.app.lock().await.notice().cloned()
    }
}

fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.slug.as_str()).collect()
}

#[tokio::test]
async fn root_address_shows_home_with_header() {
    let harness = Harness::start("/").await;

    let ActiveView::Home(home) = harness.view().await else {
        panic!("expected home view");
    };
    assert_eq!(slugs(home.featured.ready().unwrap()), vec!["hello-rust"]);
    assert_eq!(
        slugs(home.recent.ready().unwrap()),
        vec!["async-in-practice", "hello-rust", "weekend-walk"]
    );

    let app = harness.app.lock().await;
    assert_eq!(app.header().categories.ready().map(Vec::len), Some(2));
    assert_eq!(app.mode(), Mode::Site);
}

#[tokio::test]
async fn post_page_loads_post_then_approved_comments() {
    let harness = Harness::start("/").await;

    harness.send(Command::OpenPost { slug: "hello-rust".into() }).await;

    let ActiveView::Post(view) = harness.view().await else {
        panic!("expected post view");
    };
    assert_eq!(view.post.ready().map(|p| p.title.as_str()), Some("Hello Rust"));
    let comments: Vec<&str> = view.comments.ready().unwrap().iter().map(|c| c.id.as_ref()).collect();
    assert_eq!(comments, vec!["cm4", "cm1"]);
}

#[tokio::test]
async fn unknown_post_is_reported_not_found() {
    let harness = Harness::start("/").await;

    harness.send(Command::OpenPost { slug: "draft-notes".into() }).await;

    let ActiveView::Post(view) = harness.view().await else {
        panic!("expected post view");
    };
    assert_eq!(view.post, Loadable::Failed(POST_NOT_FOUND.to_string()));
    assert_eq!(view.comments, Loadable::Ready(Vec::new()));
}

#[tokio::test]
async fn category_page_is_named_after_its_posts() {
    let harness = Harness::start("/").await;

    harness
        .send(Command::Navigate {
            page: Page::Category,
            slug: Some("tech".into()),
        })
        .await;
    let ActiveView::Category(tech) = harness.view().await else {
        panic!("expected category view");
    };
    assert_eq!(tech.name(), "Tech");
    assert_eq!(slugs(tech.posts.ready().unwrap()), vec!["async-in-practice", "hello-rust"]);

    harness
        .send(Command::Navigate {
            page: Page::Category,
            slug: Some("missing".into()),
        })
        .await;
    let ActiveView::Category(missing) = harness.view().await else {
        panic!("expected category view");
    };
    assert_eq!(missing.name(), "missing");
}

#[tokio::test]
async fn category_snapshot_carries_heading_and_posts() {
    let harness = Harness::start("/").await;
    harness
        .send(Command::Navigate {
            page: Page::Category,
            slug: Some("tech".into()),
        })
        .await;

    let app = harness.app.lock().await;
    let snapshot = serde_json::to_value(app.snapshot()).unwrap();

    assert_eq!(snapshot["view"]["name"], "category");
    assert_eq!(snapshot["view"]["heading"], "Tech");
    assert_eq!(snapshot["view"]["slug"], "tech");
    assert_eq!(snapshot["view"]["posts"]["state"], "ready");
    assert_eq!(snapshot["view"]["posts"]["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn back_returns_home() {
    let harness = Harness::start("/").await;
    harness.send(Command::OpenPost { slug: "hello-rust".into() }).await;

    harness.send(Command::Back).await;

    let app = harness.app.lock().await;
    assert_eq!(app.public_route(), &PublicRoute::home());
    assert!(matches!(app.view(), ActiveView::Home(_)));
}

#[tokio::test]
async fn comment_submission_enters_moderation() {
    let harness = Harness::start("/").await;
    harness.send(Command::OpenPost { slug: "hello-rust".into() }).await;

    for field in [
        CommentField::AuthorName("Reader".into()),
        CommentField::AuthorEmail("reader@example.com".into()),
        CommentField::Content("Thanks for writing this".into()),
    ] {
        harness.send(Command::EditComment { field }).await;
    }
    harness.send(Command::SubmitComment).await;

    assert_eq!(harness.notice().await, Some(Notice::info(COMMENT_SUBMITTED)));
    let ActiveView::Post(view) = harness.view().await else {
        panic!("expected post view");
    };
    assert_eq!(view.form, CommentForm::default());
    assert!(!view.submitting);

    let stored = harness.store.rows(COMMENTS_TABLE);
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().any(|c| c["author_name"] == "Reader" && c["status"] == "pending"));
}

#[tokio::test]
async fn incomplete_comment_is_not_sent() {
    let harness = Harness::start("/").await;
    harness.send(Command::OpenPost { slug: "hello-rust".into() }).await;

    harness
        .send(Command::EditComment {
            field: CommentField::Content("Anonymous thoughts".into()),
        })
        .await;
    harness.send(Command::SubmitComment).await;

    assert!(matches!(harness.notice().await, Some(Notice::Error(_))));
    assert_eq!(harness.store.rows(COMMENTS_TABLE).len(), 4);
}

#[tokio::test]
async fn valid_login_opens_dashboard() {
    let harness = Harness::admin().await;

    let app = harness.app.lock().await;
    assert_eq!(app.admin_route(), &AdminRoute::Authenticated(AdminSection::Dashboard));
    let ActiveView::Dashboard(dashboard) = app.view() else {
        panic!("expected dashboard");
    };
    assert_eq!(dashboard.stats.ready().map(|s| s.total_posts), Some(5));
    assert_eq!(dashboard.recent_posts.ready().map(Vec::len), Some(3));
    assert_eq!(dashboard.categories.ready().map(Vec::len), Some(2));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let harness = Harness::start("/admin").await;

    harness.send(Command::Login(Credentials::new("admin", "wrong"))).await;

    let app = harness.app.lock().await;
    assert_eq!(app.admin_route(), &AdminRoute::Unauthenticated);
    assert_eq!(
        app.view(),
        &ActiveView::Login(LoginView {
            pending: false,
            error: Some(INVALID_LOGIN.to_string()),
        })
    );
}

#[tokio::test]
async fn admin_sections_need_login() {
    let harness = Harness::start("/admin").await;

    harness.send(Command::ShowPosts).await;

    assert!(matches!(harness.view().await, ActiveView::Login(_)));
}

#[tokio::test]
async fn logout_returns_to_login() {
    let harness = Harness::admin().await;

    harness.send(Command::Logout).await;

    let app = harness.app.lock().await;
    assert_eq!(app.admin_route(), &AdminRoute::Unauthenticated);
    assert!(matches!(app.view(), ActiveView::Login(_)));
}

#[tokio::test]
async fn failing_fetch_leaves_siblings_intact() {
    let harness = Harness::start("/admin").await;
    harness.store.fail(COMMENTS_TABLE);

    harness.send(Command::Login(Credentials::new("admin", "admin123"))).await;

    let ActiveView::Dashboard(dashboard) = harness.view().await else {
        panic!("expected dashboard");
    };
    assert!(matches!(dashboard.stats, Loadable::Failed(_)));
    assert!(dashboard.recent_posts.is_ready());
    assert!(dashboard.categories.is_ready());
}

#[tokio::test]
async fn posts_list_filters_locally() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowPosts).await;
    let selects = harness.store.select_count(POSTS_TABLE);

    harness
        .send(Command::FilterPosts {
            status: Some(PostStatus::Draft),
        })
        .await;
    harness.send(Command::SearchPosts { term: "NOTES".into() }).await;

    let ActiveView::Posts(view) = harness.view().await else {
        panic!("expected posts list");
    };
    let visible: Vec<&str> = view.visible().iter().map(|p| p.id.as_ref()).collect();
    assert_eq!(visible, vec!["p3"]);
    assert_eq!(harness.store.select_count(POSTS_TABLE), selects);
}

#[tokio::test]
async fn confirmed_delete_splices_list_without_refetch() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowPosts).await;
    let selects = harness.store.select_count(POSTS_TABLE);

    harness
        .send(Command::RequestDelete {
            target: DeleteTarget::Post(PostId::from("p1")),
        })
        .await;
    assert_eq!(
        harness.app.lock().await.confirmation().map(|c| c.prompt),
        Some("Are you sure you want to delete this post?")
    );
    harness.send(Command::Confirm).await;

    let ActiveView::Posts(view) = harness.view().await else {
        panic!("expected posts list");
    };
    assert!(view.posts.ready().unwrap().iter().all(|p| p.id.as_ref() != "p1"));
    assert_eq!(view.posts.ready().map(Vec::len), Some(4));
    assert_eq!(harness.store.select_count(POSTS_TABLE), selects);
    assert_eq!(harness.store.rows(POSTS_TABLE).len(), 4);
    assert!(harness.app.lock().await.confirmation().is_none());
}

#[tokio::test]
async fn cancelled_delete_keeps_post() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowPosts).await;

    harness
        .send(Command::RequestDelete {
            target: DeleteTarget::Post(PostId::from("p1")),
        })
        .await;
    harness.send(Command::Cancel).await;
    harness.send(Command::Confirm).await;

    assert_eq!(harness.store.rows(POSTS_TABLE).len(), 5);
}

#[tokio::test]
async fn failed_delete_shows_notice() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowPosts).await;
    harness.store.fail(POSTS_TABLE);

    harness
        .send(Command::RequestDelete {
            target: DeleteTarget::Post(PostId::from("p1")),
        })
        .await;
    harness.send(Command::Confirm).await;

    assert_eq!(
        harness.notice().await,
        Some(Notice::error("Error deleting post. Please try again."))
    );
    let ActiveView::Posts(view) = harness.view().await else {
        panic!("expected posts list");
    };
    assert_eq!(view.posts.ready().map(Vec::len), Some(5));
}

#[tokio::test]
async fn editor_requires_title_and_content() {
    let harness = Harness::admin().await;
    harness.send(Command::NewPost).await;

    harness
        .send(Command::SavePost {
            status: PostStatus::Published,
        })
        .await;

    assert_eq!(
        harness.notice().await,
        Some(Notice::error("Please fill in the title and content"))
    );
    assert_eq!(harness.store.rows(POSTS_TABLE).len(), 5);
}

#[tokio::test]
async fn publishing_new_post_returns_to_list() {
    let harness = Harness::admin().await;
    harness.send(Command::NewPost).await;

    for field in [
        PostField::Title("Fresh Off The Press".into()),
        PostField::Content("Body".into()),
        PostField::Category(Some(CategoryId::from("c-life"))),
    ] {
        harness.send(Command::EditPost { field }).await;
    }
    harness.send(Command::TogglePreview).await;
    harness
        .send(Command::SavePost {
            status: PostStatus::Published,
        })
        .await;

    let ActiveView::Posts(view) = harness.view().await else {
        panic!("expected posts list after saving");
    };
    let created = view
        .posts
        .ready()
        .unwrap()
        .iter()
        .find(|p| p.slug == "fresh-off-the-press")
        .cloned()
        .expect("new post listed");
    assert_eq!(created.status, PostStatus::Published);
    assert!(created.published_at.is_some());
    assert_eq!(
        harness.app.lock().await.admin_route().section(),
        Some(&AdminSection::Posts)
    );
}

#[tokio::test]
async fn editing_existing_post_keeps_slug() {
    let harness = Harness::admin().await;
    harness.send(Command::EditExistingPost { id: PostId::from("p3") }).await;

    harness
        .send(Command::EditPost {
            field: PostField::Title("Finished Notes".into()),
        })
        .await;
    let ActiveView::Editor(editor) = harness.view().await else {
        panic!("expected editor");
    };
    let draft = editor.draft.ready().unwrap();
    assert_eq!(draft.slug.value(), "draft-notes");
    assert_eq!(editor.categories.ready().map(Vec::len), Some(2));

    harness
        .send(Command::SavePost {
            status: PostStatus::Published,
        })
        .await;

    let stored = harness
        .store
        .select(POSTS_TABLE, quire_common::data::SelectQuery::new().eq("id", "p3"))
        .await
        .unwrap();
    assert_eq!(stored[0]["title"], "Finished Notes");
    assert_eq!(stored[0]["slug"], "draft-notes");
    assert_eq!(stored[0]["status"], "published");
    assert!(!stored[0]["published_at"].is_null());
}

#[tokio::test]
async fn new_category_slug_derives_from_name() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowCategories).await;

    harness.send(Command::NewCategory).await;
    harness
        .send(Command::UpdateCategoryForm {
            field: CategoryField::Name("Tech News!".into()),
        })
        .await;
    harness.send(Command::SubmitCategory).await;

    let ActiveView::Categories(view) = harness.view().await else {
        panic!("expected categories manager");
    };
    assert!(view.form.is_none());
    let categories = view.categories.ready().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[2].slug, "tech-news");
    assert_eq!(harness.store.rows(CATEGORIES_TABLE).len(), 3);
}

#[tokio::test]
async fn blank_category_name_is_not_sent() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowCategories).await;

    harness.send(Command::NewCategory).await;
    harness.send(Command::SubmitCategory).await;

    assert_eq!(harness.notice().await, Some(Notice::error("Please enter a category name")));
    assert_eq!(harness.store.rows(CATEGORIES_TABLE).len(), 2);
}

#[tokio::test]
async fn renaming_category_keeps_its_slug() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowCategories).await;

    harness.send(Command::EditCategory { id: CategoryId::from("c-tech") }).await;
    harness
        .send(Command::UpdateCategoryForm {
            field: CategoryField::Name("Technology".into()),
        })
        .await;
    harness.send(Command::SubmitCategory).await;

    let ActiveView::Categories(view) = harness.view().await else {
        panic!("expected categories manager");
    };
    let tech = view.find(&CategoryId::from("c-tech")).unwrap();
    assert_eq!(tech.name, "Technology");
    assert_eq!(tech.slug, "tech");
}

async fn delete_life_category(policy: CategoryDeletePolicy) -> Harness {
    let options = AppOptions {
        category_delete_policy: policy,
        ..AppOptions::default()
    };
    let harness = Harness::start_with(options, "/admin").await;
    harness.send(Command::Login(Credentials::new("admin", "admin123"))).await;
    harness.send(Command::ShowCategories).await;
    harness
        .send(Command::RequestDelete {
            target: DeleteTarget::Category(CategoryId::from("c-life")),
        })
        .await;
    harness.send(Command::Confirm).await;
    harness
}

#[tokio::test]
async fn blocked_category_delete_keeps_category() {
    let harness = delete_life_category(CategoryDeletePolicy::Block).await;

    assert_eq!(
        harness.notice().await,
        Some(Notice::error("This category still has posts and cannot be deleted."))
    );
    let ActiveView::Categories(view) = harness.view().await else {
        panic!("expected categories manager");
    };
    assert_eq!(view.categories.ready().map(Vec::len), Some(2));
}

#[tokio::test]
async fn detaching_category_delete_clears_posts() {
    let harness = delete_life_category(CategoryDeletePolicy::Detach).await;

    assert_eq!(harness.notice().await, None);
    let ActiveView::Categories(view) = harness.view().await else {
        panic!("expected categories manager");
    };
    assert!(view.find(&CategoryId::from("c-life")).is_none());
    let weekend = harness
        .store
        .rows(POSTS_TABLE)
        .into_iter()
        .find(|p| p["id"] == "p4")
        .unwrap();
    assert_eq!(weekend["category_id"], Value::Null);
}

#[tokio::test]
async fn moderation_updates_list_in_place() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowComments).await;

    harness
        .send(Command::FilterComments {
            status: Some(CommentStatus::Pending),
        })
        .await;
    harness
        .send(Command::Moderate {
            id: CommentId::from("cm2"),
            verdict: Moderation::Approved,
        })
        .await;

    let ActiveView::Comments(view) = harness.view().await else {
        panic!("expected comments manager");
    };
    assert!(view.visible().is_empty());
    let cm2 = view
        .comments
        .ready()
        .unwrap()
        .iter()
        .find(|c| c.comment.id.as_ref() == "cm2")
        .unwrap();
    assert_eq!(cm2.comment.status, CommentStatus::Approved);
    assert_eq!(cm2.post.as_ref().map(|p| p.slug.as_str()), Some("hello-rust"));
}

#[tokio::test]
async fn deleting_comment_removes_it() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowComments).await;

    harness
        .send(Command::RequestDelete {
            target: DeleteTarget::Comment(CommentId::from("cm3")),
        })
        .await;
    harness.send(Command::Confirm).await;

    let ActiveView::Comments(view) = harness.view().await else {
        panic!("expected comments manager");
    };
    assert_eq!(view.comments.ready().map(Vec::len), Some(3));
}

#[tokio::test]
async fn stale_fetch_does_not_overwrite_newer_view() {
    let harness = Harness::start("/").await;
    harness.store.delay_next(POSTS_TABLE, Duration::from_millis(300));

    let slow = tokio::spawn({
        let app = harness.app.clone();
        let store = harness.store.clone();
        async move {
            dispatch(&app, &store, &StaticVerifier, Command::OpenPost { slug: "hello-rust".into() }).await;
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    harness
        .send(Command::OpenPost {
            slug: "async-in-practice".into(),
        })
        .await;
    slow.await.unwrap();

    let ActiveView::Post(view) = harness.view().await else {
        panic!("expected post view");
    };
    assert_eq!(view.slug, "async-in-practice");
    assert_eq!(view.post.ready().map(|p| p.title.as_str()), Some("Async in Practice"));
}

#[tokio::test]
async fn admin_only_sync_pushes_when_crossing() {
    let harness = Harness::start("/").await;

    harness.send(Command::OpenPost { slug: "hello-rust".into() }).await;
    assert!(harness.app.lock().await.take_pushes().is_empty());

    harness.send(Command::OpenAdmin).await;
    harness.send(Command::ExitAdmin).await;

    let mut app = harness.app.lock().await;
    assert_eq!(app.take_pushes(), vec!["/admin".to_string(), "/".to_string()]);
    assert_eq!(app.address(), "/");
    assert!(matches!(app.view(), ActiveView::Home(_)));
}

#[tokio::test]
async fn uniform_sync_restores_and_pushes_pages() {
    let options = AppOptions {
        address_sync: AddressSync::all(),
        ..AppOptions::default()
    };
    let harness = Harness::start_with(options, "/category/life").await;

    assert!(matches!(harness.view().await, ActiveView::Category(_)));

    harness.send(Command::OpenPost { slug: "weekend-walk".into() }).await;
    harness
        .send(Command::Navigate {
            page: Page::About,
            slug: None,
        })
        .await;

    let mut app = harness.app.lock().await;
    assert_eq!(
        app.take_pushes(),
        vec!["/post/weekend-walk".to_string(), "/about".to_string()]
    );
}

#[tokio::test]
async fn header_is_loaded_once_per_site_visit() {
    let harness = Harness::start("/").await;
    let selects = harness.store.select_count(CATEGORIES_TABLE);

    harness
        .send(Command::Navigate {
            page: Page::About,
            slug: None,
        })
        .await;

    assert_eq!(harness.store.select_count(CATEGORIES_TABLE), selects);
}

#[tokio::test]
async fn snapshot_lists_visible_rows() {
    let harness = Harness::admin().await;
    harness.send(Command::ShowPosts).await;
    harness
        .send(Command::FilterPosts {
            status: Some(PostStatus::Archived),
        })
        .await;

    let app = harness.app.lock().await;
    let snapshot = serde_json::to_value(app.snapshot()).unwrap();

    assert_eq!(snapshot["mode"], "admin");
    assert_eq!(snapshot["view"]["name"], "posts");
    assert_eq!(snapshot["view"]["visible"].as_array().map(Vec::len), Some(1));
    assert_eq!(snapshot["view"]["posts"]["state"], "ready");
    assert!(snapshot.get("header").is_none());
}
