use std::{path::PathBuf, time::Duration};

pub struct Settings {
    pub lookup_url: String,
    pub persist_url: String,
    pub request_timeout: Duration,
    pub reset_acknowledged: bool,
    pub storage: StorageSettings,
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookup_url: "http://localhost:3001/api/state".to_string(),
            persist_url: "http://localhost:3001/graphql".to_string(),
            request_timeout: Duration::from_secs(30),
            reset_acknowledged: false,
            storage: StorageSettings::default(),
            token: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("lookup_url", &self.lookup_url)
            .field("persist_url", &self.persist_url)
            .field("request_timeout", &self.request_timeout)
            .field("reset_acknowledged", &self.reset_acknowledged)
            .field("storage", &self.storage)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum StorageSettings {
    #[default]
    Cache,
    File(PathBuf),
    Memory,
}
