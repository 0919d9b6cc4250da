use crate::domain::auth::{CredentialVerifier, Credentials};
use crate::infrastructure::settings::AdminSettings;

/// Accepts exactly one configured username and password pair.
#[derive(Clone)]
pub struct FixedCredentialVerifier {
    expected: Credentials,
}

impl FixedCredentialVerifier {
    pub fn new(settings: &AdminSettings) -> Self {
        Self {
            expected: Credentials::new(&settings.username, &settings.password),
        }
    }
}

impl CredentialVerifier for FixedCredentialVerifier {
    async fn verify(&self, credentials: &Credentials) -> Result<bool, anyhow::Error> {
        let accepted = *credentials == self.expected;
        if !accepted {
            tracing::info!(username = %credentials.username, "login rejected");
        }
        Ok(accepted)
    }
}
