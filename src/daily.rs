use crate::context::RunContext;
use crate::store::{DataStore, ScheduleUnavailable};
use anyhow::Result;
use gameday_api::Schedule;
use gameday_api::client::GamedaySource;
use gameday_api::schedule::extract_schedule;
use log::{info, warn};

/// Fetch the date's master scoreboard and write `schedule_YYYYMMDD.json`.
///
/// A scoreboard that is missing or unparseable fails with
/// [`ScheduleUnavailable`]; nothing is written in that case.
pub fn build_schedule(
    ctx: &RunContext,
    source: &impl GamedaySource,
    store: &DataStore,
) -> Result<Schedule> {
    let scoreboard = source.scoreboard(ctx.date).map_err(|e| {
        warn!("{ctx} Master scoreboard not available: {e}");
        ScheduleUnavailable { ctx: *ctx, reason: e.to_string() }
    })?;

    let schedule = extract_schedule(&scoreboard);
    info!("{ctx} {} games scheduled", schedule.len());
    store.save_schedule(ctx, &schedule)?;
    Ok(schedule)
}
