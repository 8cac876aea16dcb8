//! Per-date reconciliation of the team and player masters.
//!
//! One date is one pass: load the schedule and both masters, reset today's
//! team pointers, fold in every game whose boxscore can be fetched, then
//! publish both masters. Both snapshots are written before either canonical
//! file is replaced.
pub mod player;
pub mod team;

use crate::context::RunContext;
use crate::store::{DataStore, MasterKind};
use anyhow::Result;
use gameday_api::boxscore::{extract_players, extract_team_summary};
use gameday_api::client::GamedaySource;
use gameday_api::{PlayerMaster, Schedule, TeamMaster};
use log::{info, warn};
use std::path::PathBuf;

/// What a date's games produced before it is merged into the masters.
#[derive(Debug, Default)]
pub struct DailyUpdate {
    pub teams: TeamMaster,
    pub players: PlayerMaster,
    pub games_processed: usize,
    pub games_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub games_processed: usize,
    pub games_skipped: usize,
    pub team_master: PathBuf,
    pub player_master: PathBuf,
}

/// Fetch each scheduled game's boxscore once, in game id order, and extract
/// today's team entries and player sightings. A game whose boxscore cannot
/// be fetched is skipped; the rest of the day carries on.
pub fn collect_day(
    ctx: &RunContext,
    schedule: &Schedule,
    source: &impl GamedaySource,
    teams_before: &TeamMaster,
) -> DailyUpdate {
    let mut update = DailyUpdate::default();

    for (game_id, entry) in schedule {
        let boxscore = match source.boxscore(&entry.directory) {
            Ok(boxscore) => boxscore,
            Err(e) => {
                warn!("{ctx} Boxscore not available for {game_id}, skipping: {e}");
                update.games_skipped += 1;
                continue;
            }
        };
        info!("{ctx} Processing boxscore for {game_id}");

        match extract_team_summary(&boxscore) {
            Some(summary) => {
                team::apply_game(ctx, &mut update.teams, teams_before, game_id, entry, &summary)
            }
            None => warn!("{ctx} {game_id} has no team summary, teams not updated"),
        }

        let sightings = extract_players(&boxscore, &entry.home_code, &entry.away_code);
        player::merge_into(&mut update.players, sightings);
        update.games_processed += 1;
    }

    update
}

/// Reconcile one date into both masters and publish them.
///
/// Fails with [`crate::store::ScheduleUnavailable`] when the date has no
/// schedule file; the masters are not touched in that case.
pub fn reconcile_date(
    ctx: &RunContext,
    source: &impl GamedaySource,
    store: &DataStore,
) -> Result<DayOutcome> {
    let schedule = store.load_schedule(ctx)?;
    let mut teams: TeamMaster = store.load_master(MasterKind::Team)?;
    let mut players: PlayerMaster = store.load_master(MasterKind::Player)?;
    info!(
        "{ctx} {} games scheduled, {} teams and {} players on file",
        schedule.len(),
        teams.len(),
        players.len()
    );

    team::reset_today(&mut teams);
    let update = collect_day(ctx, &schedule, source, &teams);

    team::merge_into(&mut teams, update.teams);
    let playing = teams.values().filter(|team| team.plays_today()).count();
    let counts = player::merge_into(&mut players, update.players);
    info!(
        "{ctx} {playing} teams played, {} players added, {} updated",
        counts.added, counts.updated
    );

    let team_snapshot = store.write_snapshot(MasterKind::Team, ctx, &teams)?;
    let player_snapshot = store.write_snapshot(MasterKind::Player, ctx, &players)?;
    store.promote_all(&[team_snapshot, player_snapshot])?;

    Ok(DayOutcome {
        games_processed: update.games_processed,
        games_skipped: update.games_skipped,
        team_master: store.master_path(MasterKind::Team),
        player_master: store.master_path(MasterKind::Player),
    })
}
