use std::time::Duration;

use futures::{future::BoxFuture, FutureExt};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    error::{AppError, SearchError},
    model::region::RegionStatistics,
};

use super::LookupService;

// Every field is required, a partial body is an upstream failure.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "Confirmed")]
    confirmed: u64,
    #[serde(rename = "Deaths")]
    deaths: u64,
    #[serde(rename = "NewConfirmed")]
    new_confirmed: u64,
    #[serde(rename = "NewDeaths")]
    new_deaths: u64,
    #[serde(rename = "Last_Update")]
    last_update: String,
    #[serde(rename = "Slug_State")]
    slug_state: String,
}

pub struct HttpLookup {
    base: Url,
    client: Client,
}

impl HttpLookup {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base = Url::parse(base_url)
            .map_err(|e| SearchError::UpstreamFailure(format!("invalid lookup url: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base, client })
    }

    fn url(&self, region_name: &str) -> Result<Url, SearchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::UpstreamFailure("lookup url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(region_name);

        Ok(url)
    }

    async fn fetch(&self, region_name: &str) -> Result<RegionStatistics, SearchError> {
        let url = self.url(region_name)?;

        tracing::debug!("looking up region: {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::UpstreamFailure(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SearchError::UpstreamFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(SearchError::UpstreamFailure(format!(
                "lookup HTTP {} : {}",
                status, text
            )));
        }

        parse_response(region_name, &text)
    }
}

impl LookupService for HttpLookup {
    fn lookup<'a>(
        &'a self,
        region_name: &'a str,
    ) -> BoxFuture<'a, Result<RegionStatistics, SearchError>> {
        self.fetch(region_name).boxed()
    }
}

pub fn parse_response(region_name: &str, body: &str) -> Result<RegionStatistics, SearchError> {
    let response: LookupResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::UpstreamFailure(format!("malformed lookup body: {e}")))?;

    if response.slug_state.trim().is_empty() {
        return Err(SearchError::UpstreamFailure(
            "malformed lookup body: blank Slug_State".to_string(),
        ));
    }

    Ok(RegionStatistics {
        confirmed_total: response.confirmed,
        deaths_total: response.deaths,
        new_confirmed: response.new_confirmed,
        new_deaths: response.new_deaths,
        last_updated: response.last_update,
        region_name: region_name.to_owned(),
        region_id: response.slug_state,
    })
}
