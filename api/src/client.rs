use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const GAMEDAY_BASE: &str = "http://gd2.mlb.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the reconciliation engine gets its documents from. A failure of any
/// kind means "not available yet": the caller skips that unit of work.
pub trait GamedaySource {
    /// The master scoreboard for a date.
    fn scoreboard(&self, date: NaiveDate) -> ApiResult<Value>;
    /// The boxscore stored under a game directory from the schedule.
    fn boxscore(&self, directory: &str) -> ApiResult<Value>;
}

/// Blocking client for the MLB gameday data server.
#[derive(Debug, Clone)]
pub struct GamedayApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for GamedayApi {
    fn default() -> Self {
        Self::with_base_url(GAMEDAY_BASE, DEFAULT_TIMEOUT)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl GamedayApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("sandlot/0.1 (gameday ingest)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout,
        }
    }

    /// `{base}/components/game/mlb/year_YYYY/month_MM/day_DD/master_scoreboard.json`
    pub fn scoreboard_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/components/game/mlb/year_{:04}/month_{:02}/day_{:02}/master_scoreboard.json",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }

    /// `{base}{directory}boxscore.json`; schedule directories carry their own
    /// leading and trailing slashes.
    pub fn boxscore_url(&self, directory: &str) -> String {
        let directory = directory.trim_matches('/');
        format!("{}/{directory}/boxscore.json", self.base_url)
    }

    fn get(&self, url: &str) -> ApiResult<Value> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<Value>()
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

impl GamedaySource for GamedayApi {
    fn scoreboard(&self, date: NaiveDate) -> ApiResult<Value> {
        self.get(&self.scoreboard_url(date))
    }

    fn boxscore(&self, directory: &str) -> ApiResult<Value> {
        self.get(&self.boxscore_url(directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, 15).unwrap()
    }

    #[test]
    fn scoreboard_url_pads_month_and_day() {
        let api = GamedayApi::with_base_url("http://gd2.mlb.com/", DEFAULT_TIMEOUT);
        assert_eq!(
            api.scoreboard_url(june_15()),
            "http://gd2.mlb.com/components/game/mlb/year_2017/month_06/day_15/master_scoreboard.json"
        );
    }

    #[test]
    fn boxscore_url_joins_directory_once() {
        let api = GamedayApi::new();
        assert_eq!(
            api.boxscore_url("/components/game/mlb/year_2017/gid_2017_06_15_tbjmlb_arimlb_1/"),
            "http://gd2.mlb.com/components/game/mlb/year_2017/gid_2017_06_15_tbjmlb_arimlb_1/boxscore.json"
        );
    }

    #[test]
    fn fetches_and_parses_boxscore() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/components/game/mlb/gid_1/boxscore.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"boxscore":{"game_id":"2017/06/15/tbjmlb-arimlb-1"}}}"#)
            .create();

        let api = GamedayApi::with_base_url(server.url(), DEFAULT_TIMEOUT);
        let boxscore = api.boxscore("/components/game/mlb/gid_1/").expect("boxscore");
        assert_eq!(boxscore["data"]["boxscore"]["game_id"], "2017/06/15/tbjmlb-arimlb-1");
        mock.assert();
    }

    #[test]
    fn missing_scoreboard_is_not_found() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/components/game/mlb/year_2017/month_06/day_15/master_scoreboard.json")
            .with_status(404)
            .create();

        let api = GamedayApi::with_base_url(server.url(), DEFAULT_TIMEOUT);
        let err = api.scoreboard(june_15()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got {err}");
    }

    #[test]
    fn unparseable_body_is_a_parse_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/gid_2/boxscore.json")
            .with_status(200)
            .with_body("<html>not yet</html>")
            .create();

        let api = GamedayApi::with_base_url(server.url(), DEFAULT_TIMEOUT);
        let err = api.boxscore("gid_2").unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
    }

    #[test]
    fn server_error_is_an_api_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/gid_3/boxscore.json").with_status(503).create();

        let api = GamedayApi::with_base_url(server.url(), DEFAULT_TIMEOUT);
        let err = api.boxscore("/gid_3/").unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }
}
