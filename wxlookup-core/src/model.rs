use serde::Serialize;

use crate::condition::Condition;

/// Where to look up weather for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// Resolve the place from the caller's public IP address.
    FromIp,
    /// Free-text place name, trimmed with inner whitespace collapsed. Never empty.
    Place(String),
}

impl LocationQuery {
    /// Build a query from raw user input. Blank input means "use my IP".
    pub fn from_input(input: &str) -> Self {
        let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            LocationQuery::FromIp
        } else {
            LocationQuery::Place(normalized)
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::FromIp => f.write_str("<caller IP>"),
            LocationQuery::Place(name) => f.write_str(name),
        }
    }
}

/// First candidate returned by the geocoding search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    pub country_name: Option<String>,
}

impl GeocodeResult {
    /// `"City, Country"`, or just `"City"` when the country is unknown.
    pub fn display_location(&self) -> String {
        match &self.country_name {
            Some(country) => format!("{}, {}", self.city_name, country),
            None => self.city_name.clone(),
        }
    }
}

/// Weather at the current hour for one location. This is the only thing the pipeline returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub condition: Condition,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub display_location: String,
}
