mod context;
mod daily;
mod query;
mod reconcile;
mod runner;
mod settings;
mod store;

use crate::context::parse_date;
use crate::runner::RunStatus;
use crate::settings::Settings;
use crate::store::{DataStore, MasterKind, to_pretty_json};
use chrono::{Local, NaiveDate};
use gameday_api::client::GamedayApi;
use gameday_api::{PlayerMaster, TeamMaster};
use log::{LevelFilter, error, warn};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_BAD_ARGUMENT: u8 = 3;
const EXIT_RUN_FAILED: u8 = 4;
const EXIT_SCHEDULE_UNAVAILABLE: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliAction {
    Help,
    Version,
    Execute(Cli),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cli {
    command: Command,
    config_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Nightly run; with a start date, every date from it through today.
    Run { from: Option<NaiveDate> },
    Teams,
    Team(String),
    LastName(String),
    Today(String),
}

fn main() -> ExitCode {
    better_panic::install();

    let cli = match handle_cli_args(std::env::args().skip(1)) {
        Ok(CliAction::Execute(cli)) => cli,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version) => {
            println!("sandlot {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            return ExitCode::from(EXIT_BAD_ARGUMENT);
        }
    };

    let settings = match Settings::load(&cli.config_dir) {
        Ok(settings) => settings,
        Err(e) => {
            init_logger(None);
            error!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };
    init_logger(settings.log_level);
    if let Some(level) = &settings.ignored_log_level {
        warn!("Unknown log_level {level} in {}, using info", crate::settings::CONFIG_FILE);
    }

    match execute(cli.command, &settings) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_RUN_FAILED)
        }
    }
}

fn init_logger(level: Option<LevelFilter>) {
    env_logger::Builder::new()
        .filter_level(level.unwrap_or(LevelFilter::Info))
        .parse_default_env()
        .init();
}

fn handle_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliAction, String> {
    let mut args = args.into_iter();
    let mut from = None;
    let mut config_dir = PathBuf::from(".");
    let mut words: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "-d" | "--date" => {
                let value = args.next().ok_or("Missing value for -d")?;
                from = Some(
                    parse_date(&value)
                        .ok_or_else(|| format!("Invalid date {value}, expected MM-DD-YYYY"))?,
                );
            }
            "-p" | "--path" => {
                config_dir = PathBuf::from(args.next().ok_or("Missing value for -p")?);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown argument: {flag}")),
            _ => words.push(arg),
        }
    }

    let command = match words.as_slice() {
        [] => Command::Run { from },
        [cmd] if cmd == "teams" => Command::Teams,
        [cmd, code] if cmd == "team" => Command::Team(code.clone()),
        [cmd, prefix] if cmd == "lastname" => Command::LastName(prefix.clone()),
        [cmd, code] if cmd == "today" => Command::Today(code.clone()),
        [cmd] if matches!(cmd.as_str(), "team" | "lastname" | "today") => {
            return Err(format!("{cmd} needs an argument"));
        }
        [cmd, ..] if matches!(cmd.as_str(), "teams" | "team" | "lastname" | "today") => {
            return Err(format!("Too many arguments for {cmd}"));
        }
        _ => return Err(format!("Unknown command: {}", words.join(" "))),
    };

    if from.is_some() && !matches!(command, Command::Run { .. }) {
        return Err("-d only applies to the nightly run".to_string());
    }

    Ok(CliAction::Execute(Cli { command, config_dir }))
}

fn usage_text() -> &'static str {
    "sandlot - nightly MLB gameday ingest

Usage:
  sandlot [-d MM-DD-YYYY] [-p DIR]   update the masters for today, or for
                                     every date from -d through today
  sandlot teams [-p DIR]             all teams with today's games
  sandlot team <code> [-p DIR]       players of one team
  sandlot lastname <prefix> [-p DIR] players by last name prefix
  sandlot today <player> [-p DIR]    one player's stats in today's games
  sandlot --help
  sandlot --version

Options:
  -d, --date   first game date of a catch-up run
  -p, --path   directory holding sandlot.json (default .)

Environment:
  SANDLOT_DATA_PATH     Overrides data_path from sandlot.json
  SANDLOT_GAMEDAY_URL   Overrides gameday_base_url (default http://gd2.mlb.com)
  RUST_LOG              Log filter, overrides log_level

Exit codes:
  0 ok, 1 config file unreadable, 2 config key missing, 3 bad argument,
  4 run failed, 20 schedule not yet available"
}

/// Run a parsed command; returns the process exit code.
fn execute(command: Command, settings: &Settings) -> anyhow::Result<u8> {
    let api = GamedayApi::with_base_url(settings.gameday_base_url.clone(), settings.request_timeout);

    match command {
        Command::Run { from } => {
            let store = DataStore::open(&settings.data_path)?;
            let today = runner::default_game_date(Local::now().naive_local());
            let dates = match from {
                Some(start) => runner::dates_through(start, today),
                None => vec![today],
            };
            match runner::sweep(&dates, settings.catchup_delay, &api, &store)? {
                RunStatus::Completed => Ok(0),
                RunStatus::ScheduleUnavailable => Ok(EXIT_SCHEDULE_UNAVAILABLE),
            }
        }
        Command::Teams => {
            let store = DataStore::existing(&settings.data_path);
            let teams: TeamMaster = store.load_master(MasterKind::Team)?;
            print_json(&query::all_teams(&teams))
        }
        Command::Team(code) => {
            let store = DataStore::existing(&settings.data_path);
            let players: PlayerMaster = store.load_master(MasterKind::Player)?;
            print_json(&query::team_players(&players, &code))
        }
        Command::LastName(prefix) => {
            let store = DataStore::existing(&settings.data_path);
            let teams: TeamMaster = store.load_master(MasterKind::Team)?;
            let players: PlayerMaster = store.load_master(MasterKind::Player)?;
            print_json(&query::players_by_last_name(&players, &teams, &prefix))
        }
        Command::Today(code) => {
            let store = DataStore::existing(&settings.data_path);
            let teams: TeamMaster = store.load_master(MasterKind::Team)?;
            let players: PlayerMaster = store.load_master(MasterKind::Player)?;
            print_json(&query::today_stats(&players, &teams, &api, &code)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<u8> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&to_pretty_json(value)?)?;
    stdout.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tmp_dir;
    use gameday_api::TeamRecord;

    fn parse(args: &[&str]) -> Result<CliAction, String> {
        handle_cli_args(args.iter().map(|a| a.to_string()))
    }

    fn command(args: &[&str]) -> Command {
        match parse(args) {
            Ok(CliAction::Execute(cli)) => cli.command,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn no_arguments_is_todays_run() {
        assert_eq!(
            parse(&[]),
            Ok(CliAction::Execute(Cli { command: Command::Run { from: None }, config_dir: PathBuf::from(".") }))
        );
    }

    #[test]
    fn date_and_path_flags() {
        let parsed = parse(&["-d", "06-15-2017", "-p", "/etc/sandlot"]);
        assert_eq!(
            parsed,
            Ok(CliAction::Execute(Cli {
                command: Command::Run { from: NaiveDate::from_ymd_opt(2017, 6, 15) },
                config_dir: PathBuf::from("/etc/sandlot"),
            }))
        );
    }

    #[test]
    fn query_commands() {
        assert_eq!(command(&["teams"]), Command::Teams);
        assert_eq!(command(&["team", "lan"]), Command::Team("lan".into()));
        assert_eq!(command(&["lastname", "kers", "-p", "cfg"]), Command::LastName("kers".into()));
        assert_eq!(command(&["today", "Kershaw"]), Command::Today("Kershaw".into()));
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(parse(&["teams", "--help"]), Ok(CliAction::Help));
        assert_eq!(parse(&["-V"]), Ok(CliAction::Version));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["-d", "2017-06-15"]).unwrap_err().contains("Invalid date"));
        assert!(parse(&["-d"]).is_err());
        assert!(parse(&["--verbose"]).unwrap_err().contains("Unknown argument"));
        assert!(parse(&["standings"]).unwrap_err().contains("Unknown command"));
        assert!(parse(&["team"]).unwrap_err().contains("needs an argument"));
        assert!(parse(&["teams", "extra"]).unwrap_err().contains("Too many arguments"));
        assert!(parse(&["teams", "-d", "06-15-2017"]).unwrap_err().contains("-d only applies"));
    }

    #[test]
    fn team_query_reads_the_master() {
        let data = tmp_dir("main_query");
        let store = DataStore::open(&data).unwrap();
        let teams = TeamMaster::from([(
            "ari".to_string(),
            TeamRecord { club_name: "Arizona Diamondbacks".into(), ..Default::default() },
        )]);
        let ctx = context::RunContext::new(NaiveDate::from_ymd_opt(2017, 6, 15).unwrap());
        let snapshot = store.write_snapshot(MasterKind::Team, &ctx, &teams).unwrap();
        store.promote_all(&[snapshot]).unwrap();

        let settings = Settings::for_data_path(data);
        assert_eq!(execute(Command::Teams, &settings).unwrap(), 0);
    }

    #[test]
    fn query_against_corrupt_master_fails() {
        let data = tmp_dir("main_corrupt");
        std::fs::write(data.join("playerMaster.json"), "{").unwrap();
        let settings = Settings::for_data_path(data);
        assert!(execute(Command::Team("ari".into()), &settings).is_err());
    }
}
