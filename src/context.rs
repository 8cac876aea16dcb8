use chrono::NaiveDate;
use std::fmt;

/// Calendar format used on the command line and in log lines.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

/// One date's run. Built once per date by the runner and handed to every
/// step of that date, so all of a run's log lines carry the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub date: NaiveDate,
}

impl RunContext {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// `YYYYMMDD`, the stamp used in dated file names.
    pub fn stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.date.format(DATE_FORMAT))
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_and_tag() {
        let ctx = RunContext::new(NaiveDate::from_ymd_opt(2017, 6, 5).unwrap());
        assert_eq!(ctx.stamp(), "20170605");
        assert_eq!(ctx.to_string(), "[06-05-2017]");
    }

    #[test]
    fn parses_command_line_dates() {
        assert_eq!(parse_date("06-15-2017"), NaiveDate::from_ymd_opt(2017, 6, 15));
        assert_eq!(parse_date("2017-06-15"), None);
        assert_eq!(parse_date("13-01-2017"), None);
    }
}
