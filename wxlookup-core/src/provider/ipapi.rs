use reqwest::Client;
use serde::Deserialize;

use crate::error::{LookupError, Result};

use super::{parse_json, send, truncate_body};

const STAGE: &str = "ip location";
const FIELDS: &str = "status,message,country,regionName,city,query";

/// Client for the ip-api.com JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    http: Client,
    url: String,
}

impl IpApiLocator {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    /// City behind the caller's public IP address.
    pub async fn current_city(&self) -> Result<String> {
        let request = self.http.get(&self.url).query(&[("fields", FIELDS)]);
        let (status, body) = send(request, STAGE).await?;

        if !status.is_success() {
            return Err(LookupError::network(
                STAGE,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        let parsed: IpApiResponse = parse_json(&body, STAGE)?;

        if parsed.status.as_deref().is_some_and(|s| s != "success") {
            let reason = parsed.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(LookupError::LocationNotFound(format!(
                "could not locate caller IP: {reason}"
            )));
        }

        let city = parsed
            .city
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                LookupError::LocationNotFound("IP location response has no city".to_string())
            })?;

        tracing::info!(
            %city,
            region = ?parsed.region_name,
            country = ?parsed.country,
            ip = ?parsed.query,
            "resolved caller location from IP"
        );

        Ok(city)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    country: Option<String>,
    region_name: Option<String>,
    city: Option<String>,
    query: Option<String>,
}
