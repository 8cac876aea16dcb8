//! Raw boxscore fields -> fixed-shape stat records.
//!
//! Source values arrive as strings or numbers and any of them may be absent.
//! Every output field has a default, so consumers never branch on a missing
//! key.
use crate::tree::Record;
use crate::{BattingStats, PitchingStats, SectionStats, StatSection};
use serde_json::Value;

/// An ERA string containing this marks an undefined (infinite) ERA, e.g. "-.--".
pub const UNDEFINED_ERA_MARKER: char = '-';

pub fn batting_stats(record: &Record) -> BattingStats {
    let defaults = BattingStats::default();
    BattingStats {
        hits: field_u32(record, "s_h").unwrap_or(defaults.hits),
        walks: field_u32(record, "s_bb").unwrap_or(defaults.walks),
        hr: field_u32(record, "s_hr").unwrap_or(defaults.hr),
        rbi: field_u32(record, "s_rbi").unwrap_or(defaults.rbi),
        runs: field_u32(record, "s_r").unwrap_or(defaults.runs),
        avg: field_average(record, "avg").unwrap_or(defaults.avg),
    }
}

pub fn pitching_stats(record: &Record) -> PitchingStats {
    let (era, era_undefined) = era(record);
    PitchingStats {
        wins: field_u32(record, "w").unwrap_or(0),
        so: field_u32(record, "s_so").unwrap_or(0),
        era,
        era_undefined,
        walks: field_u32(record, "s_bb").unwrap_or(0),
        hits: field_u32(record, "s_h").unwrap_or(0),
        ip: field_f64(record, "s_ip").unwrap_or(0.0),
        er: field_u32(record, "s_er").unwrap_or(0),
        saves: field_u32(record, "sv").unwrap_or(0),
    }
}

pub fn section_stats(section: StatSection, record: &Record) -> SectionStats {
    match section {
        StatSection::Batting => SectionStats::Batting(batting_stats(record)),
        StatSection::Pitching => SectionStats::Pitching(pitching_stats(record)),
    }
}

fn era(record: &Record) -> (f64, bool) {
    match record.get("era") {
        Some(Value::String(s)) if s.contains(UNDEFINED_ERA_MARKER) => (0.0, true),
        Some(_) => (field_f64(record, "era").unwrap_or(0.0), false),
        None => (0.0, false),
    }
}

pub(crate) fn field_str<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key)?.as_str()
}

pub(crate) fn field_u32(record: &Record, key: &str) -> Option<u32> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn field_f64(record: &Record, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Live boxscores mark decisions as `true`, `"true"` or `"Y"`.
pub(crate) fn field_flag(record: &Record, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim(), "true" | "True" | "Y" | "y" | "1"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn field_average(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(|avg| {
            let formatted = format!("{avg:.3}");
            formatted.strip_prefix('0').map(str::to_owned).unwrap_or(formatted)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    #[test]
    fn batting_reads_season_columns() {
        let raw = record(json!({
            "name": "Bryant", "h": "0", "s_h": "71", "s_bb": "47", "s_hr": "17",
            "s_rbi": "40", "s_r": "57", "avg": ".262", "bo": "200"
        }));
        let stats = batting_stats(&raw);
        assert_eq!(
            stats,
            BattingStats { hits: 71, walks: 47, hr: 17, rbi: 40, runs: 57, avg: ".262".into() }
        );
    }

    #[test]
    fn batting_defaults_missing_fields() {
        let stats = batting_stats(&record(json!({ "name": "Nobody" })));
        assert_eq!(stats, BattingStats::default());
        assert_eq!(stats.avg, ".000");
    }

    #[test]
    fn pitching_parses_numbers_and_strings() {
        let raw = record(json!({
            "w": 8, "s_so": "102", "era": "2.87", "s_bb": "21", "s_h": 80,
            "s_ip": "97.1", "s_er": "31", "sv": "0"
        }));
        let stats = pitching_stats(&raw);
        assert_eq!(stats.wins, 8);
        assert_eq!(stats.so, 102);
        assert!((stats.era - 2.87).abs() < 1e-9);
        assert!(!stats.era_undefined);
        assert_eq!(stats.hits, 80);
        assert!((stats.ip - 97.1).abs() < 1e-9);
        assert_eq!(stats.er, 31);
    }

    #[test]
    fn undefined_era_defaults_to_zero_and_is_flagged() {
        let stats = pitching_stats(&record(json!({ "era": "-.--", "s_ip": "0.0" })));
        assert_eq!(stats.era, 0.0);
        assert!(stats.era_undefined);
    }

    #[test]
    fn unparseable_values_take_defaults() {
        let stats = pitching_stats(&record(json!({ "w": "n/a", "era": "abc", "s_ip": null })));
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.era, 0.0);
        assert!(!stats.era_undefined);
        assert_eq!(stats.ip, 0.0);
    }

    #[test]
    fn numeric_average_is_formatted_like_the_source() {
        let stats = batting_stats(&record(json!({ "avg": 0.3 })));
        assert_eq!(stats.avg, ".300");
    }

    #[test]
    fn flags_accept_bools_and_strings() {
        let raw = record(json!({ "win": true, "save": "false", "hold": "Y" }));
        assert!(field_flag(&raw, "win"));
        assert!(!field_flag(&raw, "save"));
        assert!(field_flag(&raw, "hold"));
        assert!(!field_flag(&raw, "loss"));
    }
}
