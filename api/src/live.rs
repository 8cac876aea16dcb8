//! Today's combined stats for one player across zero, one or two games.
//!
//! Per-game lines are summed field by field. ERA is derived from the summed
//! outs and earned runs rather than taken from the source. A role whose
//! summed fields are all zero counts as "did not play" for display, which
//! also hides a genuine 0-for-N appearance.
use crate::stats::{field_flag, field_u32};
use crate::tree::Record;
use serde::Serialize;

/// One player's raw lines from a single game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameLine {
    pub batting: Option<Record>,
    pub pitching: Option<Record>,
}

/// Today's batting. At-bats stand in for the season average column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodayBatting {
    pub at_bats: u32,
    pub hits: u32,
    pub hr: u32,
    pub rbi: u32,
    pub runs: u32,
    pub walks: u32,
}

impl TodayBatting {
    fn add(&mut self, line: &Record) {
        bump(&mut self.hits, field_u32(line, "h"));
        bump(&mut self.walks, field_u32(line, "bb"));
        bump(&mut self.hr, field_u32(line, "hr"));
        bump(&mut self.rbi, field_u32(line, "rbi"));
        bump(&mut self.runs, field_u32(line, "r"));
        bump(&mut self.at_bats, field_u32(line, "ab"));
    }

    fn total(&self) -> u64 {
        [self.at_bats, self.hits, self.hr, self.rbi, self.runs, self.walks]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

/// Today's pitching. Outs stand in for the innings pitched column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodayPitching {
    pub wins: u32,
    pub so: u32,
    pub walks: u32,
    pub hits: u32,
    pub outs: u32,
    pub er: u32,
    pub saves: u32,
    /// `None` when no outs were recorded.
    pub era: Option<String>,
}

impl TodayPitching {
    fn add(&mut self, line: &Record) {
        bump(&mut self.wins, Some(u32::from(field_flag(line, "win"))));
        bump(&mut self.saves, Some(u32::from(field_flag(line, "save"))));
        bump(&mut self.so, field_u32(line, "so"));
        bump(&mut self.walks, field_u32(line, "bb"));
        bump(&mut self.hits, field_u32(line, "h"));
        bump(&mut self.outs, field_u32(line, "out"));
        bump(&mut self.er, field_u32(line, "er"));
    }

    fn total(&self) -> u64 {
        [self.wins, self.so, self.walks, self.hits, self.outs, self.er, self.saves]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

/// Counts come from untrusted boxscores; they pin at `u32::MAX`.
fn bump(counter: &mut u32, value: Option<u32>) {
    *counter = counter.saturating_add(value.unwrap_or(0));
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodayStats {
    pub batting: Option<TodayBatting>,
    pub pitching: Option<TodayPitching>,
}

impl TodayStats {
    pub fn played(&self) -> bool {
        self.batting.is_some() || self.pitching.is_some()
    }
}

/// Nine innings' worth of outs.
const OUTS_PER_GAME: f64 = 27.0;

pub fn earned_run_average(outs: u32, earned_runs: u32) -> Option<String> {
    (outs > 0).then(|| format!("{:.2}", OUTS_PER_GAME / f64::from(outs) * f64::from(earned_runs)))
}

pub fn aggregate(games: &[GameLine]) -> TodayStats {
    let mut batting = TodayBatting::default();
    let mut pitching = TodayPitching::default();

    for game in games {
        if let Some(line) = &game.batting {
            batting.add(line);
        }
        if let Some(line) = &game.pitching {
            pitching.add(line);
        }
    }
    pitching.era = earned_run_average(pitching.outs, pitching.er);

    TodayStats {
        batting: (batting.total() > 0).then_some(batting),
        pitching: (pitching.total() > 0).then_some(pitching),
    }
}
