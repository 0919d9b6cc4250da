use std::fmt;
use std::future::Future;

use serde::Deserialize;

/// Username and password as typed into the login form.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decides whether a login attempt succeeds.
///
/// `Ok(false)` is a rejected attempt; `Err` means the check itself could not
/// be carried out.
pub trait CredentialVerifier: Clone + Send + Sync + 'static {
    fn verify(&self, credentials: &Credentials) -> impl Future<Output = Result<bool, anyhow::Error>> + Send;
}
