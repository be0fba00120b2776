//! Aggregated player statistics.

use serde::{Deserialize, Serialize, Serializer};

use super::PlayerKey;

/// Country shown when the source has no location for a player.
pub const UNKNOWN_COUNTRY: &str = "🌐";

/// One player's aggregated results across the fetched tournaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    /// Derived from the display name
    pub id: PlayerKey,

    pub name: String,

    /// Best effort; `UNKNOWN_COUNTRY` when the source has none
    pub country: String,

    /// Games the player placed in, first-seen order
    pub games: Vec<String>,

    pub tournaments: u32,

    pub wins: u32,

    /// Percentage in [0, 100], one decimal. Serialized as a string ("66.7").
    #[serde(serialize_with = "serialize_one_decimal", deserialize_with = "deserialize_rate")]
    pub win_rate: f64,

    /// At most three unique labels
    pub achievements: Vec<String>,

    /// Synthetic figure computed from wins and appearances. Not prize data.
    pub estimated_earnings: u64,
}

fn serialize_one_decimal<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.1}", value))
}

fn deserialize_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Rate {
        Number(f64),
        Text(String),
    }
    match Rate::deserialize(deserializer)? {
        Rate::Number(n) => Ok(n),
        Rate::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
