//! Team master merge.
//!
//! `today_*` fields are rebuilt from scratch every run; the season schedule
//! map only ever gains entries.
use crate::context::RunContext;
use gameday_api::wire::TeamSummary;
use gameday_api::{GameNumber, HomeAway, ScheduleEntry, TeamMaster, TeamRecord};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Remove every team's today pointers so teams without a game today carry
/// nothing stale forward.
pub fn reset_today(master: &mut TeamMaster) {
    for record in master.values_mut() {
        record.clear_today();
    }
}

/// Fold one game into today's team entries.
///
/// `today` holds the entries built so far this run; `before` is the master
/// as loaded, used to seed each team's season schedule. Game 2 of a
/// doubleheader patches the entry game 1 built; if game 1 was not processed
/// the game 2 entry is built as the team's only game of the day.
pub fn apply_game(
    ctx: &RunContext,
    today: &mut TeamMaster,
    before: &TeamMaster,
    game_id: &str,
    entry: &ScheduleEntry,
    summary: &TeamSummary,
) {
    let Some(number) = GameNumber::from_game_id(game_id) else {
        warn!("{ctx} {game_id} has no game number marker, teams not updated");
        return;
    };

    for side in HomeAway::BOTH {
        let code = entry.code(side);

        if number == GameNumber::Second {
            if let Some(existing) = today.get_mut(code) {
                debug!("{ctx} {code} doubleheader game 2: {game_id}");
                second_game(existing, side, game_id, entry, summary);
                continue;
            }
            debug!("{ctx} {code} has no game 1 today, {game_id} taken as its only game");
        }

        let history = today
            .get(code)
            .or_else(|| before.get(code))
            .map(|team| team.schedule.clone())
            .unwrap_or_default();
        debug!("{ctx} {code} today: {game_id}");
        today.insert(code.to_owned(), first_game(side, game_id, entry, summary, history));
    }
}

/// Today's entries replace the master's entries for the teams that played.
pub fn merge_into(master: &mut TeamMaster, today: TeamMaster) {
    master.extend(today);
}

fn first_game(
    side: HomeAway,
    game_id: &str,
    entry: &ScheduleEntry,
    summary: &TeamSummary,
    mut schedule: BTreeMap<String, String>,
) -> TeamRecord {
    schedule.insert(game_id.to_owned(), entry.directory.clone());

    TeamRecord {
        club_name: summary.full_name(side).to_owned(),
        club_short: entry.short_name(side).to_owned(),
        record: summary.record(side),
        today_home_away: Some(side),
        today_opp: Some(summary.opponent(side)),
        today_1: Some(entry.directory.clone()),
        today_1_time: Some(entry.game_time.clone()),
        today_2: None,
        today_2_time: None,
        schedule,
    }
}

fn second_game(
    team: &mut TeamRecord,
    side: HomeAway,
    game_id: &str,
    entry: &ScheduleEntry,
    summary: &TeamSummary,
) {
    team.record = summary.record(side);
    team.today_2 = Some(entry.directory.clone());
    team.today_2_time = Some(entry.game_time.clone());
    team.schedule.insert(game_id.to_owned(), entry.directory.clone());
}
