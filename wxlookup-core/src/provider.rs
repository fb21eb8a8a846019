use crate::{
    Config, LocationQuery, WeatherSnapshot,
    error::{LookupError, Result},
    provider::openmeteo::OpenMeteoLookup,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub mod ipapi;
pub mod openmeteo;

/// Turns a location query into a weather snapshot for the current hour.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    /// Run the pipeline with `now` as the caller's local wall-clock time.
    async fn resolve_at(
        &self,
        query: &LocationQuery,
        now: NaiveDateTime,
    ) -> Result<WeatherSnapshot>;

    async fn resolve(&self, query: &LocationQuery) -> Result<WeatherSnapshot> {
        self.resolve_at(query, Local::now().naive_local()).await
    }
}

/// Construct the default lookup pipeline from config.
pub fn lookup_from_config(config: &Config) -> Result<Box<dyn WeatherLookup>> {
    let lookup = OpenMeteoLookup::new(config.clone())?;
    Ok(Box::new(lookup))
}

/// Send a prepared GET and return status plus body. Only transport failures are errors here;
/// status handling differs per stage.
pub(crate) async fn send(
    request: RequestBuilder,
    stage: &'static str,
) -> Result<(StatusCode, String)> {
    let res = request
        .send()
        .await
        .map_err(|e| LookupError::network(stage, format!("request failed: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| LookupError::network(stage, format!("failed to read response body: {e}")))?;

    tracing::debug!(stage, %status, bytes = body.len(), "received response");
    Ok((status, body))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, stage: &'static str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| LookupError::parse(stage, e.to_string()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
