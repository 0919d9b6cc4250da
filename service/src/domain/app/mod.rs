//! The root application: one instance per browser session.
//!
//! [`BlogApp`] owns both routers, the active view and the site header. It never
//! performs I/O itself. [`BlogApp::handle`] and [`BlogApp::apply`] mutate the
//! state and return the [`Effect`]s to run next; [`dispatch`] drives that loop.

use quire_common::data::DataError;
use quire_common::entities::{ModeratedComment, Post, PostStatus};
use serde::Serialize;

use crate::domain::auth::Credentials;
use crate::domain::navigation::{
    ADMIN_PATH, AdminEvent, AdminRoute, AdminSection, EditorTarget, Page, PublicEvent, PublicRoute, SITE_PATH,
    StartLocation,
};
use crate::domain::views::{
    CategoriesView, CategoryForm, CategoryView, CommentForm, CommentsView, Confirmation, DashboardView,
    DeleteTarget, EditorView, HeaderView, HomeView, Loadable, LoginView, Notice, PostDraft, PostView, PostsView,
};

mod command;
mod effect;
mod options;
mod runner;
#[cfg(test)]
mod tests;

pub use command::Command;
pub use effect::{Effect, Fetch, Lane, Loaded, Outcome, Resolved, Ticket, Write, Written};
pub use options::AppOptions;
pub use runner::{dispatch, start};

pub const COMMENT_SUBMITTED: &str = "Comment submitted successfully! It will be visible after approval.";
pub const INVALID_LOGIN: &str = "Invalid username or password";
pub const POST_NOT_FOUND: &str = "Post not found";

const SAVE_POST_FAILED: &str = "Error saving post. Please try again.";
const DELETE_POST_FAILED: &str = "Error deleting post. Please try again.";
const SAVE_CATEGORY_FAILED: &str = "Error saving category. Please try again.";
const DELETE_CATEGORY_FAILED: &str = "Error deleting category. Please try again.";
const CATEGORY_IN_USE: &str = "This category still has posts and cannot be deleted.";
const SUBMIT_COMMENT_FAILED: &str = "Error submitting comment. Please try again.";
const MODERATE_COMMENT_FAILED: &str = "Error updating comment status. Please try again.";
const DELETE_COMMENT_FAILED: &str = "Error deleting comment. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Site,
    Admin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActiveView {
    Home(HomeView),
    Post(PostView),
    Category(CategoryView),
    About,
    Login(LoginView),
    Dashboard(DashboardView),
    Posts(PostsView),
    Editor(EditorView),
    Categories(CategoriesView),
    Comments(CommentsView),
}

impl ActiveView {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveView::Home(_) => "home",
            ActiveView::Post(_) => "post",
            ActiveView::Category(_) => "category",
            ActiveView::About => "about",
            ActiveView::Login(_) => "login",
            ActiveView::Dashboard(_) => "dashboard",
            ActiveView::Posts(_) => "posts",
            ActiveView::Editor(_) => "editor",
            ActiveView::Categories(_) => "categories",
            ActiveView::Comments(_) => "comments",
        }
    }
}

#[derive(Debug)]
pub struct BlogApp {
    options: AppOptions,
    mode: Mode,
    public: PublicRoute,
    admin: AdminRoute,
    header: HeaderView,
    view: ActiveView,
    view_generation: u64,
    header_generation: u64,
    notice: Option<Notice>,
    confirmation: Option<Confirmation>,
    address: String,
    pushes: Vec<String>,
}

impl BlogApp {
    pub fn new(options: AppOptions) -> Self {
        Self {
            options,
            mode: Mode::Site,
            public: PublicRoute::home(),
            admin: AdminRoute::default(),
            header: HeaderView::default(),
            view: ActiveView::Home(HomeView::default()),
            view_generation: 0,
            header_generation: 0,
            notice: None,
            confirmation: None,
            address: SITE_PATH.to_string(),
            pushes: Vec::new(),
        }
    }

    /// Read the start address and mount the first view. Called once.
    pub fn start(&mut self, path: &str) -> Vec<Effect> {
        self.address = path.to_string();
        match self.options.address_sync.restore(path) {
            StartLocation::Admin => {
                self.mode = Mode::Admin;
                self.mount_admin()
            }
            StartLocation::Site(route) => {
                self.mode = Mode::Site;
                self.public = route;
                let mut effects = self.load_header();
                effects.extend(self.mount_site());
                effects
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Vec<Effect> {
        tracing::debug!(?command, view = self.view.name(), "handling command");

        match command {
            Command::Navigate { page, slug } => self.navigate_site(PublicEvent::Navigate { page, slug }),
            Command::OpenPost { slug } => self.navigate_site(PublicEvent::OpenPost { slug }),
            Command::Back => self.navigate_site(PublicEvent::Back),
            Command::OpenAdmin => self.enter_admin(),
            Command::EditComment { field } => {
                if let ActiveView::Post(view) = &mut self.view {
                    view.form.edit(field);
                    return Vec::new();
                }
                self.ignored("edit_comment")
            }
            Command::SubmitComment => self.submit_comment(),

            Command::Login(credentials) => self.login(credentials),
            Command::Logout => self.logout(),
            Command::ExitAdmin => {
                if self.mode != Mode::Admin {
                    return self.ignored("exit_admin");
                }
                self.enter_site(PublicRoute::home())
            }
            Command::ShowDashboard => self.show_section(AdminSection::Dashboard),
            Command::ShowPosts => self.show_section(AdminSection::Posts),
            Command::ShowCategories => self.show_section(AdminSection::Categories),
            Command::ShowComments => self.show_section(AdminSection::Comments),
            Command::NewPost => self.show_section(AdminSection::PostEditor(EditorTarget::New)),
            Command::EditExistingPost { id } => {
                self.show_section(AdminSection::PostEditor(EditorTarget::Existing(id)))
            }

            Command::SearchPosts { term } => {
                if let ActiveView::Posts(view) = &mut self.view {
                    view.filter.term = term;
                    return Vec::new();
                }
                self.ignored("search_posts")
            }
            Command::FilterPosts { status } => {
                if let ActiveView::Posts(view) = &mut self.view {
                    view.filter.status = status;
                    return Vec::new();
                }
                self.ignored("filter_posts")
            }

            Command::EditPost { field } => {
                if let ActiveView::Editor(view) = &mut self.view {
                    if let Some(draft) = view.draft.ready_mut() {
                        draft.edit(field);
                        return Vec::new();
                    }
                }
                self.ignored("edit_post")
            }
            Command::TogglePreview => {
                if let ActiveView::Editor(view) = &mut self.view {
                    view.preview = !view.preview;
                    return Vec::new();
                }
                self.ignored("toggle_preview")
            }
            Command::SavePost { status } => self.save_post(status),

            Command::NewCategory => {
                if let ActiveView::Categories(view) = &mut self.view {
                    view.form = Some(CategoryForm::default());
                    return Vec::new();
                }
                self.ignored("new_category")
            }
            Command::EditCategory { id } => {
                if let ActiveView::Categories(view) = &mut self.view {
                    if let Some(form) = view.find(&id).map(CategoryForm::for_category) {
                        view.form = Some(form);
                        return Vec::new();
                    }
                }
                self.ignored("edit_category")
            }
            Command::UpdateCategoryForm { field } => {
                if let ActiveView::Categories(view) = &mut self.view {
                    if let Some(form) = view.form.as_mut() {
                        form.edit(field);
                        return Vec::new();
                    }
                }
                self.ignored("update_category_form")
            }
            Command::SubmitCategory => self.submit_category(),
            Command::CloseCategoryForm => {
                if let ActiveView::Categories(view) = &mut self.view {
                    view.form = None;
                    return Vec::new();
                }
                self.ignored("close_category_form")
            }

            Command::SearchComments { term } => {
                if let ActiveView::Comments(view) = &mut self.view {
                    view.filter.term = term;
                    return Vec::new();
                }
                self.ignored("search_comments")
            }
            Command::FilterComments { status } => {
                if let ActiveView::Comments(view) = &mut self.view {
                    view.filter.status = status;
                    return Vec::new();
                }
                self.ignored("filter_comments")
            }
            Command::Moderate { id, verdict } => {
                if !matches!(self.view, ActiveView::Comments(_)) {
                    return self.ignored("moderate");
                }
                vec![Effect::Write(self.view_ticket(), Write::Moderate(id, verdict))]
            }

            Command::RequestDelete { target } => self.request_delete(target),
            Command::Confirm => self.confirm(),
            Command::Cancel => {
                self.confirmation = None;
                Vec::new()
            }
            Command::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    /// Feed the outcome of an effect back in. Outcomes issued for an older
    /// mount are dropped.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        let current = match outcome.ticket.lane {
            Lane::View => self.view_generation,
            Lane::Header => self.header_generation,
        };
        if outcome.ticket.generation != current {
            tracing::debug!(
                lane = ?outcome.ticket.lane,
                issued = outcome.ticket.generation,
                current,
                "discarding stale outcome"
            );
            return Vec::new();
        }

        match outcome.result {
            Resolved::Loaded(loaded) => {
                self.apply_loaded(loaded);
                Vec::new()
            }
            Resolved::Written(written) => self.apply_written(written),
            Resolved::Authenticated(result) => self.apply_login(result),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let route = match self.mode {
            Mode::Site => RouteSnapshot::Site(&self.public),
            Mode::Admin => RouteSnapshot::Admin(&self.admin),
        };
        let view = match &self.view {
            ActiveView::Home(view) => ViewSnapshot::Home(view),
            ActiveView::Post(view) => ViewSnapshot::Post(view),
            ActiveView::Category(view) => ViewSnapshot::Category {
                heading: view.name(),
                view,
            },
            ActiveView::About => ViewSnapshot::About,
            ActiveView::Login(view) => ViewSnapshot::Login(view),
            ActiveView::Dashboard(view) => ViewSnapshot::Dashboard(view),
            ActiveView::Posts(view) => ViewSnapshot::Posts {
                visible: view.visible(),
                view,
            },
            ActiveView::Editor(view) => ViewSnapshot::Editor(view),
            ActiveView::Categories(view) => ViewSnapshot::Categories(view),
            ActiveView::Comments(view) => ViewSnapshot::Comments {
                visible: view.visible(),
                view,
            },
        };

        Snapshot {
            mode: self.mode,
            address: &self.address,
            route,
            header: (self.mode == Mode::Site).then_some(&self.header),
            view,
            notice: self.notice.as_ref(),
            confirmation: self.confirmation.as_ref(),
        }
    }

    /// Addresses pushed since the last call, oldest first.
    pub fn take_pushes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pushes)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn header(&self) -> &HeaderView {
        &self.header
    }

    pub fn public_route(&self) -> &PublicRoute {
        &self.public
    }

    pub fn admin_route(&self) -> &AdminRoute {
        &self.admin
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    // navigation

    fn navigate_site(&mut self, event: PublicEvent) -> Vec<Effect> {
        let route = self.public.transition(event);
        if self.mode == Mode::Admin {
            return self.enter_site(route);
        }

        self.public = route;
        if let Some(path) = self.options.address_sync.push_for(&self.public) {
            self.push(path);
        }
        self.mount_site()
    }

    fn enter_site(&mut self, route: PublicRoute) -> Vec<Effect> {
        self.mode = Mode::Site;
        self.public = route;
        let path = self
            .options
            .address_sync
            .push_for(&self.public)
            .unwrap_or_else(|| SITE_PATH.to_string());
        self.push(path);

        let mut effects = self.load_header();
        effects.extend(self.mount_site());
        effects
    }

    fn enter_admin(&mut self) -> Vec<Effect> {
        if self.mode == Mode::Admin {
            return self.ignored("open_admin");
        }
        self.mode = Mode::Admin;
        self.push(ADMIN_PATH.to_string());
        self.mount_admin()
    }

    fn show_section(&mut self, section: AdminSection) -> Vec<Effect> {
        if self.mode != Mode::Admin || !self.admin.is_authenticated() {
            return self.ignored("admin navigation");
        }
        self.admin = self.admin.transition(AdminEvent::Navigate(section));
        self.mount_admin()
    }

    fn push(&mut self, path: String) {
        self.address = path.clone();
        self.pushes.push(path);
    }

    // mounting

    fn next_view_ticket(&mut self) -> Ticket {
        self.view_generation += 1;
        self.confirmation = None;
        self.view_ticket()
    }

    fn view_ticket(&self) -> Ticket {
        Ticket {
            lane: Lane::View,
            generation: self.view_generation,
        }
    }

    fn load_header(&mut self) -> Vec<Effect> {
        if self.header.categories.is_ready() {
            return Vec::new();
        }
        self.header_generation += 1;
        self.header = HeaderView::default();
        let ticket = Ticket {
            lane: Lane::Header,
            generation: self.header_generation,
        };
        vec![Effect::Fetch(ticket, Fetch::Header)]
    }

    fn mount_site(&mut self) -> Vec<Effect> {
        let ticket = self.next_view_ticket();
        let sizes = self.options.page_sizes;

        match (self.public.page, self.public.slug.clone()) {
            (Page::Home, _) => {
                self.view = ActiveView::Home(HomeView::default());
                vec![Effect::Fetch(
                    ticket,
                    Fetch::Home {
                        featured: sizes.home_featured,
                        recent: sizes.home_recent,
                    },
                )]
            }
            (Page::Post, Some(slug)) => {
                self.view = ActiveView::Post(PostView::new(&slug));
                vec![Effect::Fetch(ticket, Fetch::Post { slug })]
            }
            (Page::Post, None) => {
                let mut view = PostView::new("");
                view.post = Loadable::Failed(POST_NOT_FOUND.to_string());
                view.comments = Loadable::Ready(Vec::new());
                self.view = ActiveView::Post(view);
                Vec::new()
            }
            (Page::Category, Some(slug)) => {
                self.view = ActiveView::Category(CategoryView::new(&slug));
                vec![Effect::Fetch(
                    ticket,
                    Fetch::Category {
                        slug,
                        limit: sizes.category_posts,
                    },
                )]
            }
            (Page::Category, None) => {
                let mut view = CategoryView::new("");
                view.posts = Loadable::Ready(Vec::new());
                self.view = ActiveView::Category(view);
                Vec::new()
            }
            (Page::About, _) => {
                self.view = ActiveView::About;
                Vec::new()
            }
        }
    }

    fn mount_admin(&mut self) -> Vec<Effect> {
        let ticket = self.next_view_ticket();

        let section = match &self.admin {
            AdminRoute::Unauthenticated => {
                self.view = ActiveView::Login(LoginView::default());
                return Vec::new();
            }
            AdminRoute::Authenticated(section) => section.clone(),
        };

        let fetch = match section {
            AdminSection::Dashboard => {
                self.view = ActiveView::Dashboard(DashboardView::default());
                Fetch::Dashboard {
                    recent: self.options.page_sizes.dashboard_recent,
                }
            }
            AdminSection::Posts => {
                self.view = ActiveView::Posts(PostsView::default());
                Fetch::Posts
            }
            AdminSection::PostEditor(target) => {
                let post_id = match &target {
                    EditorTarget::New => None,
                    EditorTarget::Existing(id) => Some(id.clone()),
                };
                self.view = ActiveView::Editor(EditorView::new(target, self.options.author_id));
                Fetch::Editor { post_id }
            }
            AdminSection::Categories => {
                self.view = ActiveView::Categories(CategoriesView::default());
                Fetch::Categories
            }
            AdminSection::Comments => {
                self.view = ActiveView::Comments(CommentsView::default());
                Fetch::Comments
            }
        };
        vec![Effect::Fetch(ticket, fetch)]
    }

    // actions

    fn login(&mut self, credentials: Credentials) -> Vec<Effect> {
        let ticket = self.view_ticket();
        let ActiveView::Login(view) = &mut self.view else {
            return self.ignored("login");
        };
        if view.pending {
            return Vec::new();
        }
        view.pending = true;
        view.error = None;
        vec![Effect::Authenticate(ticket, credentials)]
    }

    fn logout(&mut self) -> Vec<Effect> {
        if self.mode != Mode::Admin || !self.admin.is_authenticated() {
            return self.ignored("logout");
        }
        tracing::info!("admin signed out");
        self.admin = self.admin.transition(AdminEvent::Logout);
        self.mount_admin()
    }

    fn submit_comment(&mut self) -> Vec<Effect> {
        let ticket = self.view_ticket();
        let ActiveView::Post(view) = &mut self.view else {
            return self.ignored("submit_comment");
        };
        if view.submitting {
            return Vec::new();
        }
        let Some(post) = view.post.ready() else {
            return Vec::new();
        };

        match view.form.to_new_comment(&post.id) {
            Ok(comment) => {
                view.submitting = true;
                vec![Effect::Write(ticket, Write::SubmitComment(comment))]
            }
            Err(message) => {
                self.notice = Some(Notice::error(message));
                Vec::new()
            }
        }
    }

    fn save_post(&mut self, status: PostStatus) -> Vec<Effect> {
        let ticket = self.view_ticket();
        let ActiveView::Editor(view) = &mut self.view else {
            return self.ignored("save_post");
        };
        if view.saving {
            return Vec::new();
        }
        let Some(draft) = view.draft.ready() else {
            return Vec::new();
        };

        let input = match draft.to_input(status) {
            Ok(input) => input,
            Err(message) => {
                self.notice = Some(Notice::error(message));
                return Vec::new();
            }
        };
        let write = match &view.target {
            EditorTarget::New => Write::CreatePost(input),
            EditorTarget::Existing(id) => Write::UpdatePost(id.clone(), input),
        };
        view.saving = true;
        vec![Effect::Write(ticket, write)]
    }

    fn submit_category(&mut self) -> Vec<Effect> {
        let ticket = self.view_ticket();
        let ActiveView::Categories(view) = &mut self.view else {
            return self.ignored("submit_category");
        };
        let Some(form) = view.form.as_ref() else {
            return Vec::new();
        };

        match form.to_input() {
            Ok(input) => {
                let write = match &form.editing {
                    Some(id) => Write::UpdateCategory(id.clone(), input),
                    None => Write::CreateCategory(input),
                };
                vec![Effect::Write(ticket, write)]
            }
            Err(message) => {
                self.notice = Some(Notice::error(message));
                Vec::new()
            }
        }
    }

    fn request_delete(&mut self, target: DeleteTarget) -> Vec<Effect> {
        let allowed = matches!(
            (&target, &self.view),
            (DeleteTarget::Post(_), ActiveView::Posts(_))
                | (DeleteTarget::Category(_), ActiveView::Categories(_))
                | (DeleteTarget::Comment(_), ActiveView::Comments(_))
        );
        if !allowed {
            return self.ignored("request_delete");
        }
        self.confirmation = Some(Confirmation::new(target));
        Vec::new()
    }

    fn confirm(&mut self) -> Vec<Effect> {
        let Some(confirmation) = self.confirmation.take() else {
            return self.ignored("confirm");
        };
        let write = match confirmation.target {
            DeleteTarget::Post(id) => Write::DeletePost(id),
            DeleteTarget::Category(id) => Write::DeleteCategory(id, self.options.category_delete_policy),
            DeleteTarget::Comment(id) => Write::DeleteComment(id),
        };
        vec![Effect::Write(self.view_ticket(), write)]
    }

    fn ignored(&self, action: &str) -> Vec<Effect> {
        tracing::debug!(view = self.view.name(), mode = ?self.mode, "{} ignored", action);
        Vec::new()
    }

    // outcomes

    fn apply_loaded(&mut self, loaded: Loaded) {
        match (loaded, &mut self.view) {
            (Loaded::Header(categories), _) => {
                self.header.categories = Loadable::settle(categories, "categories");
            }
            (Loaded::Home { featured, recent }, ActiveView::Home(view)) => {
                view.featured = Loadable::settle(featured, "featured posts");
                view.recent = Loadable::settle(recent, "recent posts");
            }
            (Loaded::Post { post, comments }, ActiveView::Post(view)) => {
                view.post = match post {
                    Err(DataError::NotFound { .. }) => Loadable::Failed(POST_NOT_FOUND.to_string()),
                    other => Loadable::settle(other, "post"),
                };
                view.comments = match comments {
                    Some(comments) => Loadable::settle(comments, "comments"),
                    None => Loadable::Ready(Vec::new()),
                };
            }
            (Loaded::Category(posts), ActiveView::Category(view)) => {
                view.posts = Loadable::settle(posts, "posts");
            }
            (
                Loaded::Dashboard {
                    recent,
                    categories,
                    stats,
                },
                ActiveView::Dashboard(view),
            ) => {
                view.recent_posts = Loadable::settle(recent, "recent posts");
                view.categories = Loadable::settle(categories, "categories");
                view.stats = Loadable::settle(stats, "statistics");
            }
            (Loaded::Posts(posts), ActiveView::Posts(view)) => {
                view.posts = Loadable::settle(posts, "posts");
            }
            (Loaded::Editor { categories, post }, ActiveView::Editor(view)) => {
                view.categories = Loadable::settle(categories, "categories");
                if let Some(post) = post {
                    view.draft = match post {
                        Ok(post) => Loadable::Ready(PostDraft::from_post(&post)),
                        Err(e) => Loadable::settle(Err(e), "post"),
                    };
                }
            }
            (Loaded::Categories(categories), ActiveView::Categories(view)) => {
                view.categories = Loadable::settle(categories, "categories");
            }
            (Loaded::Comments(comments), ActiveView::Comments(view)) => {
                view.comments = Loadable::settle(comments, "comments");
            }
            (_, view) => {
                tracing::debug!(view = view.name(), "loaded data does not belong to the current view");
            }
        }
    }

    fn apply_written(&mut self, written: Written) -> Vec<Effect> {
        match written {
            Written::CommentSubmitted(result) => {
                if let ActiveView::Post(view) = &mut self.view {
                    view.submitting = false;
                    if result.is_ok() {
                        view.form = CommentForm::default();
                    }
                }
                match result {
                    Ok(comment) => {
                        tracing::info!(comment = %comment.id, post = %comment.post_id, "comment submitted");
                        self.notice = Some(Notice::info(COMMENT_SUBMITTED));
                    }
                    Err(e) => self.write_failed(e, SUBMIT_COMMENT_FAILED),
                }
                Vec::new()
            }
            Written::PostSaved(result) => match result {
                Ok(post) => {
                    tracing::info!(post = %post.id, status = post.status.as_str(), "post saved");
                    self.show_section(AdminSection::Posts)
                }
                Err(e) => {
                    if let ActiveView::Editor(view) = &mut self.view {
                        view.saving = false;
                    }
                    self.write_failed(e, SAVE_POST_FAILED);
                    Vec::new()
                }
            },
            Written::PostDeleted(id, result) => {
                match result {
                    Ok(()) => {
                        tracing::info!(post = %id, "post deleted");
                        if let ActiveView::Posts(view) = &mut self.view {
                            view.remove(&id);
                        }
                    }
                    Err(e) => self.write_failed(e, DELETE_POST_FAILED),
                }
                Vec::new()
            }
            Written::CategorySaved(result) => {
                match result {
                    Ok(category) => {
                        tracing::info!(category = %category.id, slug = %category.slug, "category saved");
                        if let ActiveView::Categories(view) = &mut self.view {
                            view.save(category);
                            view.form = None;
                        }
                    }
                    Err(e) => self.write_failed(e, SAVE_CATEGORY_FAILED),
                }
                Vec::new()
            }
            Written::CategoryDeleted(id, result) => {
                match result {
                    Ok(()) => {
                        tracing::info!(category = %id, "category deleted");
                        if let ActiveView::Categories(view) = &mut self.view {
                            view.remove(&id);
                        }
                    }
                    Err(e @ DataError::Conflict(_)) => self.write_failed(e, CATEGORY_IN_USE),
                    Err(e) => self.write_failed(e, DELETE_CATEGORY_FAILED),
                }
                Vec::new()
            }
            Written::CommentModerated(result) => {
                match result {
                    Ok(comment) => {
                        tracing::info!(comment = %comment.id, status = comment.status.as_str(), "comment moderated");
                        if let ActiveView::Comments(view) = &mut self.view {
                            view.replace(comment);
                        }
                    }
                    Err(e) => self.write_failed(e, MODERATE_COMMENT_FAILED),
                }
                Vec::new()
            }
            Written::CommentDeleted(id, result) => {
                match result {
                    Ok(()) => {
                        tracing::info!(comment = %id, "comment deleted");
                        if let ActiveView::Comments(view) = &mut self.view {
                            view.remove(&id);
                        }
                    }
                    Err(e) => self.write_failed(e, DELETE_COMMENT_FAILED),
                }
                Vec::new()
            }
        }
    }

    fn apply_login(&mut self, result: Result<bool, anyhow::Error>) -> Vec<Effect> {
        let accepted = result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "credential check failed");
            false
        });

        if accepted {
            tracing::info!("admin signed in");
            self.admin = self.admin.transition(AdminEvent::LoginSucceeded);
            return self.mount_admin();
        }

        tracing::info!("admin login rejected");
        self.admin = self.admin.transition(AdminEvent::LoginFailed);
        if let ActiveView::Login(view) = &mut self.view {
            view.pending = false;
            view.error = Some(INVALID_LOGIN.to_string());
        }
        Vec::new()
    }

    fn write_failed(&mut self, error: DataError, message: &'static str) {
        tracing::error!(error = %error, "{}", message);
        self.notice = Some(Notice::error(message));
    }
}

/// Serializable picture of the application, as returned to the shell.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub address: &'a str,
    pub route: RouteSnapshot<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<&'a HeaderView>,
    pub view: ViewSnapshot<'a>,
    pub notice: Option<&'a Notice>,
    pub confirmation: Option<&'a Confirmation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSnapshot<'a> {
    Site(&'a PublicRoute),
    Admin(&'a AdminRoute),
}

#[derive(Debug, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ViewSnapshot<'a> {
    Home(&'a HomeView),
    Post(&'a PostView),
    Category {
        heading: String,
        #[serde(flatten)]
        view: &'a CategoryView,
    },
    About,
    Login(&'a LoginView),
    Dashboard(&'a DashboardView),
    Posts {
        visible: Vec<&'a Post>,
        #[serde(flatten)]
        view: &'a PostsView,
    },
    Editor(&'a EditorView),
    Categories(&'a CategoriesView),
    Comments {
        visible: Vec<&'a ModeratedComment>,
        #[serde(flatten)]
        view: &'a CommentsView,
    },
}
