use crate::context::RunContext;
use crate::daily::build_schedule;
use crate::reconcile::reconcile_date;
use crate::store::{DataStore, ScheduleUnavailable};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gameday_api::client::GamedaySource;
use log::{info, warn};
use std::thread;
use std::time::Duration;

/// Games that end after midnight still count for the day they started.
const DAY_ROLLOVER_HOURS: i64 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The source has not published the date's schedule yet.
    ScheduleUnavailable,
}

pub fn default_game_date(now: NaiveDateTime) -> NaiveDate {
    (now - TimeDelta::hours(DAY_ROLLOVER_HOURS)).date()
}

/// Every date from `start` through `end`. A start after the end is run on
/// its own.
pub fn dates_through(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return vec![start];
    }
    start.iter_days().take_while(|date| *date <= end).collect()
}

/// Build the date's schedule, then reconcile it into the masters.
pub fn run_date(
    ctx: &RunContext,
    source: &impl GamedaySource,
    store: &DataStore,
) -> Result<RunStatus> {
    info!("{ctx} Starting run, data directory {}", store.root().display());

    let result = build_schedule(ctx, source, store).and_then(|_| reconcile_date(ctx, source, store));
    match result {
        Ok(outcome) => {
            info!(
                "{ctx} Done: {} games processed, {} skipped, published {} and {}",
                outcome.games_processed,
                outcome.games_skipped,
                outcome.team_master.display(),
                outcome.player_master.display()
            );
            Ok(RunStatus::Completed)
        }
        Err(e) if e.is::<ScheduleUnavailable>() => {
            warn!("{e}, nothing to do");
            Ok(RunStatus::ScheduleUnavailable)
        }
        Err(e) => Err(e),
    }
}

/// Run each date in turn, pausing between dates but not after the last.
/// The status reported is the last date's; a hard failure stops the sweep
/// with the dates already run left published.
pub fn sweep(
    dates: &[NaiveDate],
    delay: Duration,
    source: &impl GamedaySource,
    store: &DataStore,
) -> Result<RunStatus> {
    let mut status = RunStatus::Completed;

    for (i, date) in dates.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            info!("Waiting {}s before the next date", delay.as_secs());
            thread::sleep(delay);
        }
        status = run_date(&RunContext::new(*date), source, store)?;
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::tests::MemorySource;
    use crate::store::{MasterKind, tmp_dir};
    use gameday_api::TeamMaster;
    use serde_json::{Value, json};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, m, d).unwrap()
    }

    fn scoreboard(day: u32) -> Value {
        json!({ "data": { "games": { "game": {
            "game_data_directory": format!("/components/game/mlb/year_2017/month_06/day_{day:02}/gid_2017_06_{day:02}_tbjmlb_arimlb_1"),
            "home_code": "ari", "away_code": "tor",
            "home_team_name": "Diamondbacks", "away_team_name": "Blue Jays",
            "home_time": "6:40", "home_ampm": "PM"
        } } } })
    }

    fn boxscore(wins: u32) -> Value {
        json!({ "data": { "boxscore": {
            "home_fname": "Arizona Diamondbacks", "home_wins": wins, "home_loss": 23,
            "away_fname": "Toronto Blue Jays", "away_wins": 30, "away_loss": 31
        } } })
    }

    fn directory(day: u32) -> String {
        format!("/components/game/mlb/year_2017/month_06/day_{day:02}/gid_2017_06_{day:02}_tbjmlb_arimlb_1/")
    }

    #[test]
    fn late_night_runs_count_for_the_previous_day() {
        let just_after_midnight = date(6, 16).and_hms_opt(1, 30, 0).unwrap();
        assert_eq!(default_game_date(just_after_midnight), date(6, 15));

        let afternoon = date(6, 16).and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(default_game_date(afternoon), date(6, 16));
    }

    #[test]
    fn date_range_is_inclusive() {
        assert_eq!(dates_through(date(6, 14), date(6, 16)), vec![date(6, 14), date(6, 15), date(6, 16)]);
        assert_eq!(dates_through(date(6, 16), date(6, 16)), vec![date(6, 16)]);
        assert_eq!(dates_through(date(6, 18), date(6, 16)), vec![date(6, 18)]);
    }

    #[test]
    fn sweep_runs_every_date_in_order() {
        let store = DataStore::open(tmp_dir("runner_sweep")).unwrap();
        let mut source = MemorySource::default();
        for (day, wins) in [(14, 36), (15, 37)] {
            source.scoreboards.insert(date(6, day), scoreboard(day));
            source.boxscores.insert(directory(day), boxscore(wins));
        }

        let status = sweep(&[date(6, 14), date(6, 15)], Duration::ZERO, &source, &store).unwrap();
        assert_eq!(status, RunStatus::Completed);

        let teams: TeamMaster = store.load_master(MasterKind::Team).unwrap();
        let ari = &teams["ari"];
        assert_eq!(ari.record, "37-23");
        assert_eq!(ari.today_1.as_deref(), Some(directory(15).as_str()));
        assert_eq!(ari.schedule.len(), 2);
        assert!(store.snapshot_path(MasterKind::Team, &RunContext::new(date(6, 14))).exists());
    }

    #[test]
    fn unpublished_date_is_skipped_not_failed() {
        let store = DataStore::open(tmp_dir("runner_unpublished")).unwrap();
        let mut source = MemorySource::default();
        source.scoreboards.insert(date(6, 14), scoreboard(14));
        source.boxscores.insert(directory(14), boxscore(36));

        let status = sweep(&[date(6, 14), date(6, 15)], Duration::ZERO, &source, &store).unwrap();
        assert_eq!(status, RunStatus::ScheduleUnavailable);
        assert!(!store.snapshot_path(MasterKind::Team, &RunContext::new(date(6, 15))).exists());

        let status = sweep(&[date(6, 15), date(6, 14)], Duration::ZERO, &source, &store).unwrap();
        assert_eq!(status, RunStatus::Completed);
    }

    #[test]
    fn corrupt_master_stops_the_sweep() {
        let store = DataStore::open(tmp_dir("runner_corrupt")).unwrap();
        std::fs::write(store.master_path(MasterKind::Team), "nope").unwrap();
        let mut source = MemorySource::default();
        source.scoreboards.insert(date(6, 14), scoreboard(14));

        assert!(sweep(&[date(6, 14)], Duration::ZERO, &source, &store).is_err());
    }
}
