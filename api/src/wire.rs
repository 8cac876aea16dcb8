/// Gameday raw wire types: serde shapes for the few fixed-path objects.
/// Everything else in a boxscore is located with `tree` instead.
use crate::HomeAway;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Boxscore team summary  (data.boxscore)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreResponse {
    pub data: Option<BoxscoreData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreData {
    pub boxscore: Option<TeamSummary>,
}

/// Team-level facts for both sides of one game. Win/loss counters are kept
/// as the source formats them.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct TeamSummary {
    #[serde(default, deserialize_with = "string_or_number")]
    pub game_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub home_fname: String,
    #[serde(deserialize_with = "string_or_number")]
    pub away_fname: String,
    #[serde(deserialize_with = "string_or_number")]
    pub home_wins: String,
    #[serde(deserialize_with = "string_or_number")]
    pub home_loss: String,
    #[serde(deserialize_with = "string_or_number")]
    pub away_wins: String,
    #[serde(deserialize_with = "string_or_number")]
    pub away_loss: String,
}

impl TeamSummary {
    pub fn full_name(&self, side: HomeAway) -> &str {
        match side {
            HomeAway::Home => &self.home_fname,
            HomeAway::Away => &self.away_fname,
        }
    }

    /// Season record as "W-L".
    pub fn record(&self, side: HomeAway) -> String {
        match side {
            HomeAway::Home => format!("{}-{}", self.home_wins, self.home_loss),
            HomeAway::Away => format!("{}-{}", self.away_wins, self.away_loss),
        }
    }

    /// "vs Toronto Blue Jays" for the home side, "at Arizona Diamondbacks" for the away side.
    pub fn opponent(&self, side: HomeAway) -> String {
        format!("{} {}", side.opponent_prefix(), self.full_name(side.opposite()))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
