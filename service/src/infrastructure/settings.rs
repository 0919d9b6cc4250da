use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, anyhow};
use config::{Config, Environment, File};
use dotenvy::dotenv;
use quire_common::database::DatabaseSettings;
use serde::Deserialize;

use crate::domain::app::AppOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub storage: StorageSettings,
    pub admin: AdminSettings,
    #[serde(default)]
    pub site: AppOptions,
    #[serde(default)]
    pub sessions: SessionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

/// Where blog data lives; `database` is only read for the postgres backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database: Option<DatabaseSettings>,
}

impl StorageSettings {
    pub fn database(&self) -> anyhow::Result<&DatabaseSettings> {
        self.database
            .as_ref()
            .ok_or_else(|| anyhow!("storage.database is required for the postgres backend"))
    }
}

#[derive(Clone, Deserialize)]
pub struct AdminSettings {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub idle_minutes: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { idle_minutes: 30 }
    }
}

impl SessionSettings {
    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.idle_minutes * 60)
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use crate::domain::admin::CategoryDeletePolicy;

    use super::*;

    fn parse(yaml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn site_options_fall_back_to_defaults() {
        let settings = parse(
            r#"
server_port: "3000"
storage:
  backend: memory
admin:
  username: admin
  password: admin123
"#,
        );

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.site, AppOptions::default());
        assert_eq!(settings.sessions.max_idle(), Duration::from_secs(30 * 60));
        assert!(settings.storage.database().is_err());
    }

    #[test]
    fn postgres_storage_and_site_options_are_read() {
        let settings = parse(
            r#"
server_port: "8080"
storage:
  backend: postgres
  database:
    host: localhost
    db: blog
    schema: public
    credentials:
      username: blog
      password: secret
    connection:
      min_connections: 1
      max_connections: 5
      acquire_timeout_seconds: 3
admin:
  username: editor
  password: s3cret
site:
  category_delete_policy: detach
  address_sync:
    post: true
  page_sizes:
    home_recent: 4
"#,
        );

        let database = settings.storage.database().unwrap();
        assert_eq!(database.port, 5432);
        assert_eq!(settings.site.category_delete_policy, CategoryDeletePolicy::Detach);
        assert!(settings.site.address_sync.post);
        assert!(!settings.site.address_sync.home);
        assert_eq!(settings.site.page_sizes.home_recent, 4);
        assert_eq!(settings.site.page_sizes.home_featured, 3);
        assert!(!format!("{:?}", settings.admin).contains("s3cret"));
    }
}
