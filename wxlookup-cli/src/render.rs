use wxlookup_core::{Condition, WeatherSnapshot};

const SUNNY: &str = r"    \   /
     .-.
  - (   ) -
     `-'
    /   \";

const CLOUDY: &str = r"     .--.
  .-(    ).
 (___.__)__)";

const RAINY: &str = r"     .-.
    (   ).
   (___(__)
    ' ' ' '
   ' ' ' '";

const SNOW: &str = r"     .-.
    (   ).
   (___(__)
    *  *  *
   *  *  *";

/// Icon for a condition. `Unknown` has none.
pub fn icon(condition: Condition) -> Option<&'static str> {
    match condition {
        Condition::Clear => Some(SUNNY),
        Condition::Cloudy => Some(CLOUDY),
        Condition::Rainy => Some(RAINY),
        Condition::Snow => Some(SNOW),
        Condition::Unknown => None,
    }
}

/// Location, icon, temperature, condition, humidity and wind speed, one block per line.
pub fn render(snapshot: &WeatherSnapshot) -> String {
    let mut lines = vec![snapshot.display_location.clone()];

    if let Some(art) = icon(snapshot.condition) {
        lines.push(art.to_string());
    }

    lines.push(format!("{:.1} C", snapshot.temperature_c));
    lines.push(snapshot.condition.to_string());
    lines.push(format!("Humidity {}%", snapshot.humidity_pct));
    lines.push(format!("Wind Speed {:.1}km/h", snapshot.wind_speed_kmh));

    lines.join("\n")
}

pub fn render_json(snapshot: &WeatherSnapshot) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
