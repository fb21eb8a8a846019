use serde::Serialize;

/// Sky/precipitation state derived from the forecast provider's weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Clear,
    Cloudy,
    Rainy,
    Snow,
    Unknown,
}

impl Condition {
    /// Classify a WMO weather code. Rules are checked in order; the first match wins.
    ///
    /// - `0` → Clear
    /// - `1..=3` → Cloudy
    /// - `51..=67` or `80..=99` → Rainy
    /// - `71..=77` → Snow
    /// - anything else (fog, unassigned codes, negatives) → Unknown
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Condition::Clear,
            1..=3 => Condition::Cloudy,
            51..=67 | 80..=99 => Condition::Rainy,
            71..=77 => Condition::Snow,
            _ => Condition::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Snow => "Snow",
            Condition::Unknown => "Unknown",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Cloudy,
            Condition::Rainy,
            Condition::Snow,
            Condition::Unknown,
        ]
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
