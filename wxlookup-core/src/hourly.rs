use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Result};

/// Format used by the forecast provider for hourly timestamps, truncated to the hour.
pub const HOUR_KEY_FORMAT: &str = "%Y-%m-%dT%H:00";

/// What to do when the forecast has no entry for the caller's current hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourFallback {
    /// Use the first hour of the series. Tolerates clock/timezone mismatch.
    #[default]
    First,
    /// Fail the lookup with `LookupError::HourNotFound`.
    Fail,
}

impl HourFallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourFallback::First => "first",
            HourFallback::Fail => "fail",
        }
    }

    pub const fn all() -> &'static [HourFallback] {
        &[HourFallback::First, HourFallback::Fail]
    }
}

impl std::fmt::Display for HourFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of one hour, taken at the same index from every series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourValues {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub weather_code: i64,
    pub wind_speed_kmh: f64,
}

/// Index-aligned hourly series. Values may be `null` upstream for hours the model
/// does not cover.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    time: Vec<String>,
    temperature_c: Vec<Option<f64>>,
    humidity_pct: Vec<Option<f64>>,
    weather_code: Vec<Option<i64>>,
    wind_speed_kmh: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn new(
        time: Vec<String>,
        temperature_c: Vec<Option<f64>>,
        humidity_pct: Vec<Option<f64>>,
        weather_code: Vec<Option<i64>>,
        wind_speed_kmh: Vec<Option<f64>>,
    ) -> Result<Self> {
        if time.is_empty() {
            return Err(LookupError::parse("forecast", "hourly time series is empty"));
        }

        let len = time.len();
        let lengths = [
            ("temperature_2m", temperature_c.len()),
            ("relative_humidity_2m", humidity_pct.len()),
            ("weather_code", weather_code.len()),
            ("wind_speed_10m", wind_speed_kmh.len()),
        ];

        for (name, actual) in lengths {
            if actual != len {
                return Err(LookupError::parse(
                    "forecast",
                    format!("hourly series '{name}' has {actual} entries, expected {len}"),
                ));
            }
        }

        Ok(Self { time, temperature_c, humidity_pct, weather_code, wind_speed_kmh })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Pick the index for `now` and read all four values from it.
    pub fn select(&self, now: NaiveDateTime, fallback: HourFallback) -> Result<HourValues> {
        let key = current_hour_key(now);

        let index = match find_hour_index(&self.time, &key) {
            Some(i) => i,
            None => match fallback {
                HourFallback::First => {
                    tracing::warn!(hour = %key, "current hour not in forecast, using first entry");
                    0
                }
                HourFallback::Fail => return Err(LookupError::HourNotFound(key)),
            },
        };

        self.values_at(index)
    }

    /// Values at `index`. Errors if the index is out of range or any value there is `null`.
    pub fn values_at(&self, index: usize) -> Result<HourValues> {
        if index >= self.len() {
            return Err(LookupError::parse(
                "forecast",
                format!("hour index {index} out of range (len {})", self.len()),
            ));
        }

        Ok(HourValues {
            temperature_c: required(self.temperature_c[index], "temperature_2m", index)?,
            humidity_pct: required(self.humidity_pct[index], "relative_humidity_2m", index)?,
            weather_code: required(self.weather_code[index], "weather_code", index)?,
            wind_speed_kmh: required(self.wind_speed_kmh[index], "wind_speed_10m", index)?,
        })
    }
}

/// `now` truncated to the hour, in the provider's timestamp format (e.g. `2024-09-02T13:00`).
pub fn current_hour_key(now: NaiveDateTime) -> String {
    now.format(HOUR_KEY_FORMAT).to_string()
}

/// Position of the first timestamp equal to `key`, ignoring ASCII case.
pub fn find_hour_index(times: &[String], key: &str) -> Option<usize> {
    times.iter().position(|t| t.eq_ignore_ascii_case(key))
}

fn required<T>(value: Option<T>, name: &str, index: usize) -> Result<T> {
    value.ok_or_else(|| {
        LookupError::parse("forecast", format!("'{name}' has no value at hour index {index}"))
    })
}
