use quire_common::data::DataService;

use crate::domain::app::AppOptions;
use crate::domain::auth::CredentialVerifier;
use crate::domain::session::SessionStore;

pub mod admin;
pub mod app;
pub mod auth;
pub mod blog;
pub mod navigation;
pub mod session;
pub mod views;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type D: DataService;
    type V: CredentialVerifier;

    fn data(&self) -> &Self::D;
    fn verifier(&self) -> &Self::V;
    fn sessions(&self) -> &SessionStore;
    fn options(&self) -> &AppOptions;
}
