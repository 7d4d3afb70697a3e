use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{
    error::{AppError, SaveError, SearchError},
    init::acknowledged::{CsvStorage, MemoryStorage},
    model::{acknowledged::Acknowledged, region::RegionStatistics},
    settings::{Settings, StorageSettings},
};

pub use self::{
    auth::{SessionToken, Token},
    lookup::HttpLookup,
    persist::GraphQlPersistence,
};

mod auth;
mod lookup;
mod persist;
#[cfg(test)]
mod stub;

pub trait LookupService: Send + Sync {
    /// Resolves statistics for an already normalized region name.
    fn lookup<'a>(
        &'a self,
        region_name: &'a str,
    ) -> BoxFuture<'a, Result<RegionStatistics, SearchError>>;
}

pub trait PersistenceService: Send + Sync {
    fn persist<'a>(
        &'a self,
        record: &'a RegionStatistics,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<(), SaveError>>;
}

pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn token(&self) -> Option<Token>;
}

pub trait AcknowledgedStorage: Send + Sync {
    fn load(&self) -> Result<Acknowledged, AppError>;
    fn save(&self, acknowledged: &Acknowledged) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct Services {
    pub lookup: Arc<dyn LookupService>,
    pub persistence: Arc<dyn PersistenceService>,
    pub storage: Arc<dyn AcknowledgedStorage>,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let storage: Arc<dyn AcknowledgedStorage> = match &settings.storage {
            StorageSettings::Cache => Arc::new(CsvStorage::in_cache_dir()?),
            StorageSettings::File(path) => Arc::new(CsvStorage::new(path.clone())),
            StorageSettings::Memory => Arc::new(MemoryStorage::default()),
        };

        Ok(Self {
            lookup: Arc::new(HttpLookup::new(
                &settings.lookup_url,
                settings.request_timeout,
            )?),
            persistence: Arc::new(GraphQlPersistence::new(
                &settings.persist_url,
                settings.request_timeout,
            )?),
            storage,
        })
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Services")
    }
}
