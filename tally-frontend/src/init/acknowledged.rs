use std::{
    fs::{self, File, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use crate::{error::AppError, model::acknowledged::Acknowledged, service::AcknowledgedStorage};

/// Csv file with one region identifier per record.
#[derive(Debug)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_cache_dir() -> Result<Self, AppError> {
        Ok(Self::new(get_acknowledged_cache_path()?))
    }
}

impl AcknowledgedStorage for CsvStorage {
    #[tracing::instrument]
    fn load(&self) -> Result<Acknowledged, AppError> {
        let mut acknowledged = Acknowledged::default();
        if !self.path.exists() {
            tracing::debug!("acknowledged file does not exist on path {:?}", self.path);

            return Ok(acknowledged);
        }

        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(_) => return Err(AppError::LoadAcknowledgedFailed),
            };

            if let Some(region_id) = record.get(0) {
                acknowledged.insert(region_id);
            }
        }

        tracing::trace!("acknowledged file read");

        Ok(acknowledged)
    }

    #[tracing::instrument(skip(acknowledged))]
    fn save(&self, acknowledged: &Acknowledged) -> Result<(), AppError> {
        let directory = match self.path.parent() {
            Some(path) => path,
            None => return Err(AppError::SaveAcknowledgedFailed),
        };

        fs::create_dir_all(directory)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = csv::Writer::from_writer(file);
        for region_id in acknowledged.entries.iter() {
            if let Err(error) = writer.write_record([region_id]) {
                tracing::error!("writing acknowledged region failed: {:?}", error);
            }
        }

        writer.flush()?;

        tracing::trace!("acknowledged file written");

        Ok(())
    }
}

/// Keeps the acknowledged set in memory only, used with `--no-cache`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Acknowledged>,
}

impl MemoryStorage {
    pub fn new(acknowledged: Acknowledged) -> Self {
        Self {
            entries: Mutex::new(acknowledged),
        }
    }
}

impl AcknowledgedStorage for MemoryStorage {
    fn load(&self) -> Result<Acknowledged, AppError> {
        match self.entries.lock() {
            Ok(entries) => Ok(entries.clone()),
            Err(_) => Err(AppError::LoadAcknowledgedFailed),
        }
    }

    fn save(&self, acknowledged: &Acknowledged) -> Result<(), AppError> {
        match self.entries.lock() {
            Ok(mut entries) => {
                *entries = acknowledged.clone();
                Ok(())
            }
            Err(_) => Err(AppError::SaveAcknowledgedFailed),
        }
    }
}

fn get_acknowledged_cache_path() -> Result<PathBuf, AppError> {
    match dirs::cache_dir() {
        Some(cache_dir) => Ok(cache_dir.join("tally").join("acknowledged")),
        None => Err(AppError::LoadAcknowledgedFailed),
    }
}
