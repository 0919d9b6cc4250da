use quire_common::data::DataService;

use crate::domain::AppState;
use crate::domain::app::AppOptions;
use crate::domain::auth::CredentialVerifier;
use crate::domain::session::SessionStore;

pub mod auth;
pub mod http;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<D, V> {
    data: D,
    verifier: V,
    sessions: SessionStore,
    options: AppOptions,
}

impl<D: DataService, V: CredentialVerifier> AppStateImpl<D, V> {
    pub fn new(data: D, verifier: V, options: AppOptions) -> Self {
        Self {
            data,
            verifier,
            sessions: SessionStore::new(),
            options,
        }
    }
}

impl<D: DataService, V: CredentialVerifier> AppState for AppStateImpl<D, V> {
    type D = D;
    type V = V;

    fn data(&self) -> &Self::D {
        &self.data
    }

    fn verifier(&self) -> &Self::V {
        &self.verifier
    }

    fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn options(&self) -> &AppOptions {
        &self.options
    }
}
