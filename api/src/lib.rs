pub mod boxscore;
pub mod client;
pub mod live;
pub mod schedule;
pub mod stats;
pub mod tree;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types: the persisted schedule and master documents
// ---------------------------------------------------------------------------

/// One game on one day, as written to `schedule_YYYYMMDD.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub directory: String,
    pub home_code: String,
    pub away_code: String,
    #[serde(default)]
    pub home_short: String,
    #[serde(default)]
    pub away_short: String,
    #[serde(default)]
    pub game_time: String,
}

impl ScheduleEntry {
    pub fn code(&self, side: HomeAway) -> &str {
        match side {
            HomeAway::Home => &self.home_code,
            HomeAway::Away => &self.away_code,
        }
    }

    pub fn short_name(&self, side: HomeAway) -> &str {
        match side {
            HomeAway::Home => &self.home_short,
            HomeAway::Away => &self.away_short,
        }
    }
}

/// Game id -> entry. Sorted so game 1 of a doubleheader precedes game 2.
pub type Schedule = BTreeMap<String, ScheduleEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    pub const BOTH: [HomeAway; 2] = [HomeAway::Home, HomeAway::Away];

    pub fn opposite(self) -> Self {
        match self {
            HomeAway::Home => HomeAway::Away,
            HomeAway::Away => HomeAway::Home,
        }
    }

    /// Direction qualifier used in the opponent description ("vs X" / "at X").
    pub fn opponent_prefix(&self) -> &'static str {
        match self {
            HomeAway::Home => "vs",
            HomeAway::Away => "at",
        }
    }

    /// Boxscore `team_flag` values.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "home" => Some(HomeAway::Home),
            "away" => Some(HomeAway::Away),
            _ => None,
        }
    }

    /// Recover the side from a stored opponent description.
    pub fn from_opponent(description: &str) -> Option<Self> {
        let description = description.trim_start();
        if description.starts_with("vs ") {
            Some(HomeAway::Home)
        } else if description.starts_with("at ") {
            Some(HomeAway::Away)
        } else {
            None
        }
    }
}

/// Which game of the day a schedule id refers to. The last character of the
/// id carries the marker: `..._1` for a single game or game 1, `..._2` for the
/// second game of a doubleheader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameNumber {
    First,
    Second,
}

impl GameNumber {
    pub fn from_game_id(game_id: &str) -> Option<Self> {
        if game_id.ends_with('1') {
            Some(GameNumber::First)
        } else if game_id.ends_with('2') {
            Some(GameNumber::Second)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionType {
    #[serde(rename = "P")]
    Pitcher,
    #[default]
    #[serde(rename = "B")]
    Batter,
}

impl PositionType {
    pub fn from_position(position: &str) -> Self {
        if position.trim() == "P" {
            PositionType::Pitcher
        } else {
            PositionType::Batter
        }
    }
}

/// The boxscore section a player line was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatSection {
    Batting,
    Pitching,
}

impl StatSection {
    /// Section names as they appear as keys in the boxscore tree.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "batter" => Some(StatSection::Batting),
            "pitcher" => Some(StatSection::Pitching),
            _ => None,
        }
    }
}

/// Season-to-date batting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingStats {
    pub hits: u32,
    pub walks: u32,
    pub hr: u32,
    pub rbi: u32,
    pub runs: u32,
    /// Pre-formatted by the source (".287"); never parsed.
    pub avg: String,
}

impl Default for BattingStats {
    fn default() -> Self {
        Self { hits: 0, walks: 0, hr: 0, rbi: 0, runs: 0, avg: ".000".into() }
    }
}

/// Season-to-date pitching line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchingStats {
    pub wins: u32,
    pub so: u32,
    pub era: f64,
    /// Set when the source reported an undefined (infinite) ERA; `era` is then
    /// a defaulted 0 rather than a real one.
    #[serde(default, skip_serializing_if = "is_false")]
    pub era_undefined: bool,
    pub walks: u32,
    pub hits: u32,
    pub ip: f64,
    pub er: u32,
    pub saves: u32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One normalized stat line, tagged by the section it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionStats {
    Batting(BattingStats),
    Pitching(PitchingStats),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub full_name: String,
    pub club_code: String,
    pub position: String,
    pub pos_type: PositionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_batting: Option<BattingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_pitching: Option<PitchingStats>,
}

impl PlayerRecord {
    /// Replace the sub-record of the given kind, leaving the other untouched.
    pub fn apply(&mut self, stats: SectionStats) {
        match stats {
            SectionStats::Batting(batting) => self.stats_batting = Some(batting),
            SectionStats::Pitching(pitching) => self.stats_pitching = Some(pitching),
        }
    }

    /// Fold a newer sighting of the same player into this record: identity
    /// fields follow the newer sighting, and only the sub-records it carries
    /// are replaced.
    pub fn absorb(&mut self, newer: PlayerRecord) {
        self.full_name = newer.full_name;
        self.club_code = newer.club_code;
        self.position = newer.position;
        self.pos_type = newer.pos_type;
        if let Some(batting) = newer.stats_batting {
            self.stats_batting = Some(batting);
        }
        if let Some(pitching) = newer.stats_pitching {
            self.stats_pitching = Some(pitching);
        }
    }
}

/// Player code -> record.
pub type PlayerMaster = BTreeMap<String, PlayerRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub club_name: String,
    pub club_short: String,
    pub record: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_home_away: Option<HomeAway>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_opp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_1_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_2_time: Option<String>,
    /// Every game played this season: game id -> game directory. Only grows.
    #[serde(default)]
    pub schedule: BTreeMap<String, String>,
}

impl TeamRecord {
    /// Drop the ephemeral "today" fields; history and record are kept.
    pub fn clear_today(&mut self) {
        self.today_home_away = None;
        self.today_opp = None;
        self.today_1 = None;
        self.today_1_time = None;
        self.today_2 = None;
        self.today_2_time = None;
    }

    pub fn plays_today(&self) -> bool {
        self.today_1.is_some() || self.today_2.is_some()
    }

    /// Today's game directories in game order.
    pub fn today_games(&self) -> impl Iterator<Item = &str> {
        self.today_1.iter().chain(self.today_2.iter()).map(String::as_str)
    }
}

/// Team code -> record.
pub type TeamMaster = BTreeMap<String, TeamRecord>;
