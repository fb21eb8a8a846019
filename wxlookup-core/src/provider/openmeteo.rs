use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config, LocationQuery, WeatherSnapshot,
    condition::Condition,
    error::{LookupError, Result},
    hourly::HourlySeries,
    model::GeocodeResult,
};

use super::{WeatherLookup, ipapi::IpApiLocator, parse_json, send, truncate_body};

const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Pipeline backed by Open-Meteo geocoding and forecast APIs, with ip-api.com for
/// "where am I" queries.
#[derive(Debug, Clone)]
pub struct OpenMeteoLookup {
    http: Client,
    config: Config,
    ip_locator: IpApiLocator,
}

impl OpenMeteoLookup {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: Config) -> Result<Self> {
        config.validate()?;

        let ip_locator = IpApiLocator::new(http.clone(), config.endpoints.ip_api_url.clone());

        Ok(Self { http, config, ip_locator })
    }

    /// Place name to geocode: the query text itself, or the city behind the caller's IP.
    async fn place_name(&self, query: &LocationQuery) -> Result<String> {
        match query {
            LocationQuery::Place(name) => Ok(name.clone()),
            LocationQuery::FromIp => self.ip_locator.current_city().await,
        }
    }

    /// First geocoding candidate for `place`.
    pub async fn geocode(&self, place: &str) -> Result<GeocodeResult> {
        const STAGE: &str = "geocoding";

        let count = self.config.candidate_count.to_string();
        let request = self.http.get(&self.config.endpoints.geocoding_url).query(&[
            ("name", place),
            ("count", count.as_str()),
            ("language", self.config.language.as_str()),
            ("format", "json"),
        ]);

        let (status, body) = send(request, STAGE).await?;

        if !status.is_success() {
            return Err(LookupError::LocationNotFound(format!(
                "geocoding '{}' failed with status {}: {}",
                place,
                status,
                truncate_body(&body),
            )));
        }

        let parsed: GeoSearchResponse = parse_json(&body, STAGE)?;
        tracing::debug!(place, candidates = parsed.results.len(), "geocoding results");

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::LocationNotFound(format!("no match for '{place}'")))?;

        Ok(GeocodeResult {
            latitude: first.latitude,
            longitude: first.longitude,
            city_name: first.name,
            country_name: first.country,
        })
    }

    /// Hourly series for the coordinates, in the configured timezone.
    pub async fn fetch_hourly(&self, latitude: f64, longitude: f64) -> Result<HourlySeries> {
        const STAGE: &str = "forecast";

        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let request = self.http.get(&self.config.endpoints.forecast_url).query(&[
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("hourly", HOURLY_FIELDS),
            ("timezone", self.config.timezone.as_str()),
        ]);

        let (status, body) = send(request, STAGE).await?;

        if !status.is_success() {
            return Err(LookupError::network(
                STAGE,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        let parsed: ForecastResponse = parse_json(&body, STAGE)?;
        let hourly = parsed.hourly;

        HourlySeries::new(
            hourly.time,
            hourly.temperature_2m,
            hourly.relative_humidity_2m,
            hourly.weather_code,
            hourly.wind_speed_10m,
        )
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteoLookup {
    async fn resolve_at(
        &self,
        query: &LocationQuery,
        now: NaiveDateTime,
    ) -> Result<WeatherSnapshot> {
        tracing::info!(%query, "looking up weather");

        let place = self.place_name(query).await?;
        let location = self.geocode(&place).await?;
        tracing::info!(
            city = %location.city_name,
            latitude = location.latitude,
            longitude = location.longitude,
            "geocoded location"
        );

        let series = self.fetch_hourly(location.latitude, location.longitude).await?;
        let hour = series.select(now, self.config.hour_fallback)?;

        Ok(WeatherSnapshot {
            temperature_c: hour.temperature_c,
            condition: Condition::from_code(hour.weather_code),
            humidity_pct: hour.humidity_pct.round().clamp(0.0, 100.0) as u8,
            wind_speed_kmh: hour.wind_speed_kmh,
            display_location: location.display_location(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

/// `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Vec<GeoCandidate>,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<i64>>,
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyData,
}
