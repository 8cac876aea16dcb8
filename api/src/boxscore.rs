//! Player and team extraction from a single game's boxscore.
//!
//! A player line does not say whether it is a batting or pitching line, nor
//! which team it belongs to. Both come from where it sits in the tree: the
//! nearest ancestor carrying a `team_flag`, and the key of the section that
//! encloses it (`batter` / `pitcher`).
use crate::live::GameLine;
use crate::stats::{field_str, section_stats};
use crate::tree::{self, Record, Scope};
use crate::wire::{BoxscoreResponse, TeamSummary};
use crate::{HomeAway, PlayerMaster, PlayerRecord, PositionType, StatSection};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::btree_map::Entry;

/// Presence of this key marks a player line.
pub const PLAYER_KEY: &str = "name";
pub const TEAM_FLAG_KEY: &str = "team_flag";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineScope {
    pub side: Option<HomeAway>,
    pub section: Option<StatSection>,
}

impl Scope for LineScope {
    fn enter_record(&self, record: &Record) -> Self {
        match field_str(record, TEAM_FLAG_KEY).and_then(HomeAway::from_flag) {
            Some(side) => Self { side: Some(side), ..*self },
            None => *self,
        }
    }

    fn enter_key(&self, key: &str) -> Self {
        Self { section: StatSection::from_key(key), ..*self }
    }
}

/// Every player line in the boxscore, one record per player code. A player
/// listed under both batting and pitching gets both sub-records.
pub fn extract_players(boxscore: &Value, home_code: &str, away_code: &str) -> PlayerMaster {
    let mut players = PlayerMaster::new();

    let mut visit = |scope: &LineScope, line: &Record| {
        let (Some(side), Some(section)) = (scope.side, scope.section) else {
            return;
        };
        let Some(code) = field_str(line, PLAYER_KEY) else {
            return;
        };
        let stats = section_stats(section, line);

        match players.entry(code.to_owned()) {
            Entry::Occupied(mut existing) => {
                debug!("{code} updating player with {section:?} line");
                existing.get_mut().apply(stats);
            }
            Entry::Vacant(slot) => {
                debug!("{code} adding player");
                let position = field_str(line, "pos").unwrap_or_default();
                let club_code = match side {
                    HomeAway::Home => home_code,
                    HomeAway::Away => away_code,
                };
                let mut player = PlayerRecord {
                    full_name: field_str(line, "name_display_first_last")
                        .unwrap_or(code)
                        .to_owned(),
                    club_code: club_code.to_owned(),
                    position: position.to_owned(),
                    pos_type: PositionType::from_position(position),
                    stats_batting: None,
                    stats_pitching: None,
                };
                player.apply(stats);
                slot.insert(player);
            }
        }
    };
    tree::walk(boxscore, PLAYER_KEY, &LineScope::default(), &mut visit);

    players
}

/// The fixed-path team summary (`data.boxscore`), if the boxscore has one.
pub fn extract_team_summary(boxscore: &Value) -> Option<TeamSummary> {
    BoxscoreResponse::deserialize(boxscore)
        .ok()?
        .data?
        .boxscore
}

/// One player's raw batting and pitching lines for the given side of a game.
pub fn find_player_line(boxscore: &Value, side: HomeAway, player_code: &str) -> GameLine {
    let mut line = GameLine::default();

    let mut visit = |scope: &LineScope, record: &Record| {
        if scope.side != Some(side) || field_str(record, PLAYER_KEY) != Some(player_code) {
            return;
        }
        match scope.section {
            Some(StatSection::Batting) => line.batting = Some(record.clone()),
            Some(StatSection::Pitching) => line.pitching = Some(record.clone()),
            None => {}
        }
    };
    tree::walk(boxscore, PLAYER_KEY, &LineScope::default(), &mut visit);

    line
}
