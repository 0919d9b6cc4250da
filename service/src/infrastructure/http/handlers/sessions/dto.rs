use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::app::BlogApp;
use crate::domain::navigation::SITE_PATH;
use crate::domain::session::SessionId;
use crate::infrastructure::http::api::ApiError;

#[derive(Deserialize, Debug)]
pub struct CreateSessionRequest {
    /// Address the browser was opened at.
    #[serde(default = "site_path")]
    pub path: String,
}

fn site_path() -> String {
    SITE_PATH.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResponse {
    session_id: SessionId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pushes: Vec<String>,
    snapshot: Value,
}

impl SessionResponse {
    /// Current state plus every address pushed since the previous response.
    pub async fn after_update(session_id: SessionId, app: &Mutex<BlogApp>) -> Result<Self, ApiError> {
        let mut app = app.lock().await;
        let pushes = app.take_pushes();
        let snapshot = serde_json::to_value(app.snapshot())?;
        Ok(Self {
            session_id,
            pushes,
            snapshot,
        })
    }

    /// Current state only; pending pushes stay for the next update.
    pub async fn current(session_id: SessionId, app: &Mutex<BlogApp>) -> Result<Self, ApiError> {
        let snapshot = serde_json::to_value(app.lock().await.snapshot())?;
        Ok(Self {
            session_id,
            pushes: Vec::new(),
            snapshot,
        })
    }
}
