use std::time::Duration;

use futures::{future::BoxFuture, FutureExt};
use reqwest::{header::AUTHORIZATION, Client, Url};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, SaveError},
    model::region::RegionStatistics,
};

use super::{PersistenceService, Token};

const SAVE_STATE: &str = "mutation saveState($input: StateInput!) {
  saveState(input: $input) {
    _id
  }
}";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
struct Variables<'a> {
    input: StateInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateInput<'a> {
    confirmed: u64,
    deaths: u64,
    new_confirmed: u64,
    new_deaths: u64,
    last_update: &'a str,
    name: &'a str,
    state_id: &'a str,
}

impl<'a> From<&'a RegionStatistics> for StateInput<'a> {
    fn from(record: &'a RegionStatistics) -> Self {
        Self {
            confirmed: record.confirmed_total,
            deaths: record.deaths_total,
            new_confirmed: record.new_confirmed,
            new_deaths: record.new_deaths,
            last_update: &record.last_updated,
            name: &record.region_name,
            state_id: &record.region_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

pub struct GraphQlPersistence {
    client: Client,
    endpoint: Url,
}

impl GraphQlPersistence {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SaveError::PersistFailure(format!("invalid persist url: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    async fn send(&self, record: &RegionStatistics, token: &Token) -> Result<(), SaveError> {
        tracing::debug!("saving region {} to {}", record.region_id, self.endpoint);

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .json(&request_body(record))
            .send()
            .await
            .map_err(|e| SaveError::PersistFailure(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SaveError::PersistFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(SaveError::PersistFailure(format!(
                "persist HTTP {} : {}",
                status, text
            )));
        }

        check_response(&text)
    }
}

impl PersistenceService for GraphQlPersistence {
    fn persist<'a>(
        &'a self,
        record: &'a RegionStatistics,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<(), SaveError>> {
        self.send(record, token).boxed()
    }
}

fn request_body(record: &RegionStatistics) -> GraphQlRequest<'_> {
    GraphQlRequest {
        query: SAVE_STATE,
        variables: Variables {
            input: StateInput::from(record),
        },
    }
}

fn check_response(body: &str) -> Result<(), SaveError> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| SaveError::PersistFailure(format!("malformed persist body: {e}")))?;

    let errors = response.errors.unwrap_or_default();
    if errors.is_empty() {
        return Ok(());
    }

    let messages = errors
        .into_iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ");

    Err(SaveError::PersistFailure(messages))
}
