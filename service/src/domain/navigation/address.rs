use serde::{Deserialize, Serialize};

use super::public::{Page, PublicRoute};

pub const SITE_PATH: &str = "/";
pub const ADMIN_PATH: &str = "/admin";

/// Which public pages are mirrored into the address bar.
///
/// Switching between the site and the admin console always updates the
/// address. For the pages of the site it happens only when their flag is on,
/// and only an enabled page is recognised from the start address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSync {
    pub home: bool,
    pub post: bool,
    pub category: bool,
    pub about: bool,
}

/// Where the application starts, as read from the start address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLocation {
    Site(PublicRoute),
    Admin,
}

pub fn is_admin_path(path: &str) -> bool {
    let path = strip_query(path);
    path == ADMIN_PATH || path.starts_with("/admin/")
}

impl AddressSync {
    /// Every page mirrored.
    pub fn all() -> Self {
        Self {
            home: true,
            post: true,
            category: true,
            about: true,
        }
    }

    fn enabled(&self, page: Page) -> bool {
        match page {
            Page::Home => self.home,
            Page::Post => self.post,
            Page::Category => self.category,
            Page::About => self.about,
        }
    }

    /// Address to push after the site moved to `route`, if that page is mirrored.
    pub fn push_for(&self, route: &PublicRoute) -> Option<String> {
        self.enabled(route.page).then(|| path_for(route))
    }

    pub fn restore(&self, path: &str) -> StartLocation {
        if is_admin_path(path) {
            return StartLocation::Admin;
        }

        let segments: Vec<&str> = strip_query(path)
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let route = match segments.as_slice() {
            ["post", slug] if self.post => slug_route(Page::Post, slug),
            ["category", slug] if self.category => slug_route(Page::Category, slug),
            ["about"] if self.about => PublicRoute::new(Page::About, None),
            _ => PublicRoute::home(),
        };
        StartLocation::Site(route)
    }
}

pub fn path_for(route: &PublicRoute) -> String {
    match (route.page, route.slug.as_deref()) {
        (Page::Home, _) => SITE_PATH.to_string(),
        (Page::Post, Some(slug)) => format!("/post/{}", urlencoding::encode(slug)),
        (Page::Category, Some(slug)) => format!("/category/{}", urlencoding::encode(slug)),
        (Page::Post, None) => "/post".to_string(),
        (Page::Category, None) => "/category".to_string(),
        (Page::About, _) => "/about".to_string(),
    }
}

/// A slug segment that is not valid percent-encoded UTF-8 falls back to home.
fn slug_route(page: Page, segment: &str) -> PublicRoute {
    match urlencoding::decode(segment) {
        Ok(slug) => PublicRoute::new(page, Some(slug.into_owned())),
        Err(_) => PublicRoute::home(),
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_prefix_starts_console() {
        let sync = AddressSync::default();

        assert_eq!(sync.restore("/admin"), StartLocation::Admin);
        assert_eq!(sync.restore("/admin/posts?x=1"), StartLocation::Admin);
        assert!(!is_admin_path("/administrator"));
    }

    #[test]
    fn admin_only_variant_ignores_site_paths() {
        let sync = AddressSync::default();

        assert_eq!(sync.restore("/post/hello-rust"), StartLocation::Site(PublicRoute::home()));
        assert_eq!(sync.push_for(&PublicRoute::new(Page::About, None)), None);
    }

    #[test]
    fn uniform_variant_restores_and_pushes_every_page() {
        let sync = AddressSync::all();

        assert_eq!(
            sync.restore("/category/tech/"),
            StartLocation::Site(PublicRoute::new(Page::Category, Some("tech".into())))
        );
        assert_eq!(
            sync.push_for(&PublicRoute::new(Page::Post, Some("hello-rust".into()))),
            Some("/post/hello-rust".to_string())
        );
        assert_eq!(sync.push_for(&PublicRoute::home()), Some("/".to_string()));
    }

    #[test]
    fn reserved_characters_in_slugs_survive_the_address() {
        let sync = AddressSync::all();
        let route = PublicRoute::new(Page::Post, Some("a/b?c#d".into()));

        let pushed = sync.push_for(&route).unwrap();

        assert_eq!(pushed, "/post/a%2Fb%3Fc%23d");
        assert_eq!(sync.restore(&pushed), StartLocation::Site(route));
    }

    #[test]
    fn undecodable_slug_falls_back_to_home() {
        let sync = AddressSync::all();

        assert_eq!(sync.restore("/category/%FF"), StartLocation::Site(PublicRoute::home()));
    }

    #[test]
    fn flags_are_independent() {
        let sync = AddressSync {
            post: true,
            ..AddressSync::default()
        };

        assert_eq!(sync.restore("/about"), StartLocation::Site(PublicRoute::home()));
        assert_eq!(
            sync.restore("/post/async-in-practice"),
            StartLocation::Site(PublicRoute::new(Page::Post, Some("async-in-practice".into())))
        );
        assert_eq!(sync.push_for(&PublicRoute::new(Page::Category, Some("tech".into()))), None);
    }
}
