use quire_common::entities::PostId;
use serde::Serialize;

/// Post the editor works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTarget {
    New,
    Existing(PostId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminSection {
    #[default]
    Dashboard,
    Posts,
    PostEditor(EditorTarget),
    Categories,
    Comments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRoute {
    #[default]
    Unauthenticated,
    Authenticated(AdminSection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminEvent {
    LoginSucceeded,
    LoginFailed,
    Logout,
    Navigate(AdminSection),
}

impl AdminRoute {
    pub fn transition(&self, event: AdminEvent) -> AdminRoute {
        use AdminEvent::*;
        use AdminRoute::*;

        match (self, event) {
            (_, LoginSucceeded) => Authenticated(AdminSection::Dashboard),
            (route, LoginFailed) => route.clone(),
            (_, Logout) => Unauthenticated,
            (Authenticated(_), Navigate(section)) => Authenticated(section),
            (Unauthenticated, Navigate(_)) => Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AdminRoute::Authenticated(_))
    }

    pub fn section(&self) -> Option<&AdminSection> {
        match self {
            AdminRoute::Authenticated(section) => Some(section),
            AdminRoute::Unauthenticated => None,
        }
    }
}
