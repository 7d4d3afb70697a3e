use thiserror::Error;

use crate::event::Envelope;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sending message failed")]
    ActionSendFailed(#[from] tokio::sync::mpsc::error::SendError<Envelope>),
    #[error("Error aggregation")]
    Aggregate(Vec<AppError>),
    #[error("File operation failed")]
    FileOperationFailed(#[from] std::io::Error),
    #[error("Http client error")]
    Http(#[from] reqwest::Error),
    #[error("Loading acknowledged regions failed")]
    LoadAcknowledgedFailed,
    #[error("Saving acknowledged regions failed")]
    SaveAcknowledgedFailed,
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
    #[error("Terminal not initialized")]
    TerminalNotInitialized,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SearchError {
    #[error("search input is empty")]
    EmptyInput,
    #[error("lookup service failed: {0}")]
    UpstreamFailure(String),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SaveError {
    #[error("region is already saved")]
    AlreadySaved,
    #[error("a save is already running")]
    InFlight,
    #[error("view state is inconsistent: {0}")]
    Inconsistent(String),
    #[error("no search result to save")]
    NothingToSave,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("persistence service failed: {0}")]
    PersistFailure(String),
}
