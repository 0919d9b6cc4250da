use futures::future::join_all;
use quire_common::data::DataService;
use tokio::sync::Mutex;

use crate::domain::auth::CredentialVerifier;

use super::{BlogApp, Command, Effect};

/// Run `command` against the application behind `app` until every effect it
/// triggered, directly or through follow-ups, has been applied.
///
/// The lock is only held while the state changes; effects run without it, so
/// another command may interleave and make their outcomes stale.
pub async fn dispatch<D, V>(app: &Mutex<BlogApp>, data: &D, verifier: &V, command: Command)
where
    D: DataService,
    V: CredentialVerifier,
{
    let effects = app.lock().await.handle(command);
    run_effects(app, data, verifier, effects).await;
}

/// Start the application at `path`.
pub async fn start<D, V>(app: &Mutex<BlogApp>, data: &D, verifier: &V, path: &str)
where
    D: DataService,
    V: CredentialVerifier,
{
    let effects = app.lock().await.start(path);
    run_effects(app, data, verifier, effects).await;
}

async fn run_effects<D, V>(app: &Mutex<BlogApp>, data: &D, verifier: &V, mut effects: Vec<Effect>)
where
    D: DataService,
    V: CredentialVerifier,
{
    while !effects.is_empty() {
        let outcomes = join_all(effects.into_iter().map(|effect| effect.run(data, verifier))).await;

        let mut app = app.lock().await;
        effects = outcomes
            .into_iter()
            .flat_map(|outcome| app.apply(outcome))
            .collect();
    }
}
