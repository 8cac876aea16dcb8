//! Master scoreboard -> the day's schedule.
use crate::stats::field_str;
use crate::tree::{self, Record};
use crate::{Schedule, ScheduleEntry};
use log::{debug, warn};
use serde_json::Value;

/// Presence of this key marks a per-game record in the scoreboard.
pub const GAME_DIRECTORY_KEY: &str = "game_data_directory";

/// Game ids are the fixed-length tail of the game directory:
/// `YYYY_MM_DD_awymlb_hommlb_N`.
pub const GAME_ID_LEN: usize = 26;

pub fn extract_schedule(scoreboard: &Value) -> Schedule {
    tree::search(scoreboard, GAME_DIRECTORY_KEY, schedule_entry)
}

pub fn game_id_from_directory(directory: &str) -> String {
    let directory = directory.trim_end_matches('/');
    let len = directory.chars().count();
    directory.chars().skip(len.saturating_sub(GAME_ID_LEN)).collect()
}

fn schedule_entry(record: &Record) -> Option<(String, ScheduleEntry)> {
    let directory = field_str(record, GAME_DIRECTORY_KEY)?;
    let game_id = game_id_from_directory(directory);

    let (Some(home_code), Some(away_code)) =
        (field_str(record, "home_code"), field_str(record, "away_code"))
    else {
        warn!("{game_id} has no team codes, left out of schedule");
        return None;
    };

    let text = |key: &str| field_str(record, key).unwrap_or_default();
    let entry = ScheduleEntry {
        directory: format!("{}/", directory.trim_end_matches('/')),
        home_code: home_code.to_owned(),
        away_code: away_code.to_owned(),
        home_short: text("home_team_name").to_owned(),
        away_short: text("away_team_name").to_owned(),
        game_time: format!("{}{}", text("home_time"), text("home_ampm")),
    };

    debug!("{game_id} entry added to schedule");
    Some((game_id, entry))
}
