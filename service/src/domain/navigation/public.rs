use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Post,
    Category,
    About,
}

/// Current page of the public site. `slug` belongs to the post or category
/// page and is left as is when another page is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicRoute {
    pub page: Page,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicEvent {
    /// Show `page`; without a slug the previous one is kept.
    Navigate { page: Page, slug: Option<String> },
    OpenPost { slug: String },
    Back,
}

impl PublicRoute {
    pub fn home() -> Self {
        Self::default()
    }

    pub fn new(page: Page, slug: Option<String>) -> Self {
        Self { page, slug }
    }

    pub fn transition(&self, event: PublicEvent) -> PublicRoute {
        match event {
            PublicEvent::Navigate { page, slug: Some(slug) } => PublicRoute::new(page, Some(slug)),
            PublicEvent::Navigate { page, slug: None } => PublicRoute::new(page, self.slug.clone()),
            PublicEvent::OpenPost { slug } => PublicRoute::new(Page::Post, Some(slug)),
            PublicEvent::Back => PublicRoute::home(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home_without_slug() {
        assert_eq!(PublicRoute::home(), PublicRoute::new(Page::Home, None));
    }

    #[test]
    fn open_post_sets_page_and_slug() {
        let route = PublicRoute::home().transition(PublicEvent::OpenPost {
            slug: "hello-rust".into(),
        });

        assert_eq!(route, PublicRoute::new(Page::Post, Some("hello-rust".into())));
    }

    #[test]
    fn navigate_without_slug_keeps_previous_slug() {
        let route = PublicRoute::new(Page::Category, Some("tech".into()));

        let about = route.transition(PublicEvent::Navigate {
            page: Page::About,
            slug: None,
        });

        assert_eq!(about.page, Page::About);
        assert_eq!(about.slug.as_deref(), Some("tech"));
    }

    #[test]
    fn back_returns_home_and_clears_slug() {
        let route = PublicRoute::new(Page::Post, Some("hello-rust".into()));

        assert_eq!(route.transition(PublicEvent::Back), PublicRoute::home());
    }
}
