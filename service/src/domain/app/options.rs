use quire_common::entities::AuthorId;
use serde::Deserialize;

use crate::domain::admin::CategoryDeletePolicy;
use crate::domain::navigation::AddressSync;

/// Behaviour switches of the application, read from the `site` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub address_sync: AddressSync,
    pub category_delete_policy: CategoryDeletePolicy,
    /// Author of posts created in the editor.
    pub author_id: AuthorId,
    pub page_sizes: PageSizes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub home_featured: u64,
    pub home_recent: u64,
    pub category_posts: u64,
    pub dashboard_recent: u64,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            home_featured: 3,
            home_recent: 6,
            category_posts: 10,
            dashboard_recent: 5,
        }
    }
}
