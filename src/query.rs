//! Read-only projections over the team and player masters, shaped as the
//! rows the web front end displays. Nothing here writes.
use anyhow::{Context, Result};
use gameday_api::boxscore::find_player_line;
use gameday_api::client::GamedaySource;
use gameday_api::live::{GameLine, TodayBatting, TodayPitching, aggregate};
use gameday_api::{
    BattingStats, HomeAway, PitchingStats, PlayerMaster, PlayerRecord, PositionType, TeamMaster,
    TeamRecord,
};
use log::debug;
use serde::Serialize;

/// Shown in the ERA column when there is no ERA to show.
pub const NO_ERA: &str = "-.--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRow {
    pub code: String,
    pub club: String,
    pub short: String,
    pub record: String,
    pub opponent: String,
    pub time: String,
}

/// For today's stats `avg` holds at-bats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattingRow {
    pub code: String,
    pub name: String,
    pub team: String,
    pub pos: String,
    pub avg: String,
    pub hits: u32,
    pub hr: u32,
    pub rbi: u32,
    pub runs: u32,
    pub walks: u32,
}

/// For today's stats `ip` holds outs recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchingRow {
    pub code: String,
    pub name: String,
    pub team: String,
    pub wins: u32,
    pub era: String,
    pub er: u32,
    pub ip: f64,
    pub hits: u32,
    pub so: u32,
    pub walks: u32,
    pub saves: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerRows {
    pub batters: Vec<BattingRow>,
    pub pitchers: Vec<PitchingRow>,
}

impl BattingRow {
    fn season(code: &str, player: &PlayerRecord, team: &str, stats: &BattingStats) -> Self {
        Self {
            code: code.to_owned(),
            name: player.full_name.clone(),
            team: team.to_owned(),
            pos: player.position.clone(),
            avg: stats.avg.clone(),
            hits: stats.hits,
            hr: stats.hr,
            rbi: stats.rbi,
            runs: stats.runs,
            walks: stats.walks,
        }
    }

    fn today(code: &str, player: &PlayerRecord, team: &str, stats: &TodayBatting) -> Self {
        Self {
            code: code.to_owned(),
            name: player.full_name.clone(),
            team: team.to_owned(),
            pos: player.position.clone(),
            avg: stats.at_bats.to_string(),
            hits: stats.hits,
            hr: stats.hr,
            rbi: stats.rbi,
            runs: stats.runs,
            walks: stats.walks,
        }
    }
}

impl PitchingRow {
    fn season(code: &str, player: &PlayerRecord, team: &str, stats: &PitchingStats) -> Self {
        let era = if stats.era_undefined {
            NO_ERA.to_owned()
        } else {
            format!("{:.2}", stats.era)
        };
        Self {
            code: code.to_owned(),
            name: player.full_name.clone(),
            team: team.to_owned(),
            wins: stats.wins,
            era,
            er: stats.er,
            ip: stats.ip,
            hits: stats.hits,
            so: stats.so,
            walks: stats.walks,
            saves: stats.saves,
        }
    }

    fn today(code: &str, player: &PlayerRecord, team: &str, stats: &TodayPitching) -> Self {
        Self {
            code: code.to_owned(),
            name: player.full_name.clone(),
            team: team.to_owned(),
            wins: stats.wins,
            era: stats.era.clone().unwrap_or_else(|| NO_ERA.to_owned()),
            er: stats.er,
            ip: f64::from(stats.outs),
            hits: stats.hits,
            so: stats.so,
            walks: stats.walks,
            saves: stats.saves,
        }
    }
}

/// One row per team, ordered by full club name. Doubleheaders show both
/// start times as "t1 / t2".
pub fn all_teams(teams: &TeamMaster) -> Vec<TeamRow> {
    let mut rows: Vec<TeamRow> = teams
        .iter()
        .map(|(code, team)| TeamRow {
            code: code.clone(),
            club: team.club_name.clone(),
            short: team.club_short.clone(),
            record: team.record.clone(),
            opponent: team.today_opp.clone().unwrap_or_default(),
            time: game_times(team),
        })
        .collect();
    rows.sort_by(|a, b| a.club.cmp(&b.club));
    rows
}

fn game_times(team: &TeamRecord) -> String {
    match (&team.today_1_time, &team.today_2_time) {
        (Some(first), Some(second)) => format!("{first} / {second}"),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => String::new(),
    }
}

/// Every player on a team. Rows carry no team name.
pub fn team_players(players: &PlayerMaster, team_code: &str) -> PlayerRows {
    project(
        players.iter().filter(|(_, player)| player.club_code == team_code),
        |_| String::new(),
    )
}

/// Players whose code starts with `prefix`, ignoring case and surrounding
/// whitespace. Rows carry the team's short name.
pub fn players_by_last_name(players: &PlayerMaster, teams: &TeamMaster, prefix: &str) -> PlayerRows {
    let prefix = prefix.trim().to_lowercase();
    project(
        players
            .iter()
            .filter(|(code, _)| code.trim().to_lowercase().starts_with(&prefix)),
        |player| short_name(teams, player),
    )
}

/// Today's combined line for one player, fetched live from the boxscores
/// of the games their team has today. A game without a boxscore yet counts
/// as not played.
pub fn today_stats(
    players: &PlayerMaster,
    teams: &TeamMaster,
    source: &impl GamedaySource,
    player_code: &str,
) -> Result<PlayerRows> {
    let player = players
        .get(player_code)
        .with_context(|| format!("no player with code {player_code}"))?;

    let Some(team) = teams.get(&player.club_code) else {
        debug!("{player_code} team {} not on file", player.club_code);
        return Ok(PlayerRows::default());
    };
    let Some(side) = team
        .today_home_away
        .or_else(|| team.today_opp.as_deref().and_then(HomeAway::from_opponent))
    else {
        debug!("{player_code} {} has no game today", player.club_code);
        return Ok(PlayerRows::default());
    };

    let games: Vec<GameLine> = team
        .today_games()
        .map(|directory| match source.boxscore(directory) {
            Ok(boxscore) => find_player_line(&boxscore, side, player_code),
            Err(e) => {
                debug!("{player_code} boxscore {directory} not available yet: {e}");
                GameLine::default()
            }
        })
        .collect();
    let today = aggregate(&games);
    if !today.played() {
        debug!("{player_code} has no stats in today's games yet");
    }

    let mut rows = PlayerRows::default();
    if let Some(batting) = &today.batting {
        rows.batters.push(BattingRow::today(player_code, player, &team.club_short, batting));
    }
    if let Some(pitching) = &today.pitching {
        rows.pitchers.push(PitchingRow::today(player_code, player, &team.club_short, pitching));
    }
    Ok(rows)
}

fn short_name(teams: &TeamMaster, player: &PlayerRecord) -> String {
    teams
        .get(&player.club_code)
        .map(|team| team.club_short.clone())
        .unwrap_or_default()
}

/// Position players always get a batting row; pitchers only once they have
/// a hit.
fn shows_batting(player: &PlayerRecord, stats: &BattingStats) -> bool {
    player.pos_type == PositionType::Batter || stats.avg.as_str() > ".000"
}

fn project<'a>(
    players: impl Iterator<Item = (&'a String, &'a PlayerRecord)>,
    team_name: impl Fn(&PlayerRecord) -> String,
) -> PlayerRows {
    let mut rows = PlayerRows::default();
    for (code, player) in players {
        let team = team_name(player);
        if let Some(batting) = &player.stats_batting
            && shows_batting(player, batting)
        {
            rows.batters.push(BattingRow::season(code, player, &team, batting));
        }
        if let Some(pitching) = &player.stats_pitching {
            rows.pitchers.push(PitchingRow::season(code, player, &team, pitching));
        }
    }
    rows
}
