use std::fmt;
use std::path::PathBuf;

use chrono::DateTime;
use services::{AppServices, Clock, QuizState};
use tracing::debug;

mod logging;
mod terminal;

const DEFAULT_DB_URL: &str = "sqlite://daily-quiz.sqlite3";
const DEFAULT_WORDS_PATH: &str = "data/words.csv";
const DEFAULT_HISTORY_LIMIT: u32 = 14;
const DEFAULT_KEEP_DAYS: u32 = 30;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC 3339): {raw}")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_number(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<u32, ArgsError> {
    let value = require_value(args, flag)?;
    value
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: value })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  daily-quiz [play]              [options]");
    eprintln!("  daily-quiz status [--watch]    [options]");
    eprintln!("  daily-quiz history [--limit N] [options]");
    eprintln!("  daily-quiz prune [--keep-days N] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   default {DEFAULT_DB_URL}");
    eprintln!("  --words <path>      default {DEFAULT_WORDS_PATH}");
    eprintln!("  --now <rfc3339>     pretend the current time is this instant");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_WORDS_PATH, QUIZ_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Status { watch: bool },
    History { limit: u32 },
    Prune { keep_days: u32 },
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "status" => Some(Self::Status { watch: false }),
            "history" => Some(Self::History {
                limit: DEFAULT_HISTORY_LIMIT,
            }),
            "prune" => Some(Self::Prune {
                keep_days: DEFAULT_KEEP_DAYS,
            }),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: String,
    words_path: PathBuf,
    clock: Clock,
}

impl Args {
    fn parse(
        mut command: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut words_path = std::env::var("QUIZ_WORDS_PATH")
            .ok()
            .map_or_else(|| PathBuf::from(DEFAULT_WORDS_PATH), PathBuf::from);
        let mut clock = Clock::system();

        while let Some(arg) = args.next() {
            match (arg.as_str(), &mut command) {
                ("--db", _) => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                ("--words", _) => words_path = PathBuf::from(require_value(args, "--words")?),
                ("--now", _) => {
                    let value = require_value(args, "--now")?;
                    let now = DateTime::parse_from_rfc3339(value.trim())
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?;
                    clock = Clock::fixed(now);
                }
                ("--watch", Command::Status { watch }) => *watch = true,
                ("--limit", Command::History { limit }) => {
                    *limit = require_number(args, "--limit")?;
                }
                ("--keep-days", Command::Prune { keep_days }) => {
                    *keep_days = require_number(args, "--keep-days")?;
                }
                ("--help" | "-h", _) => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command,
            db_url,
            words_path,
            clock,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn parse_command_line(argv: Vec<String>) -> Result<Args, ArgsError> {
    let mut iter = argv.into_iter().peekable();
    // No subcommand means play.
    let command = match iter.peek().map(String::as_str) {
        None => Command::Play,
        Some(first) if first.starts_with('-') => Command::Play,
        Some(first) => {
            let command =
                Command::from_arg(first).ok_or_else(|| ArgsError::UnknownArg(first.to_string()))?;
            iter.next();
            command
        }
    };
    Args::parse(command, &mut iter)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let parsed = parse_command_line(argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    debug!(?parsed, "parsed arguments");

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, &parsed.words_path, parsed.clock).await?;
    let quiz = services.quiz();

    match parsed.command {
        Command::Play => terminal::play(&quiz).await,
        Command::Status { watch } => match quiz.state().await? {
            QuizState::Completed { result, countdown } => {
                print!("{}", terminal::render_completed(&result, countdown));
                if watch {
                    terminal::watch_countdown(&quiz).await?;
                }
                Ok(())
            }
            _ => {
                println!("📝 Today's quiz ({}) is waiting for you.", quiz.today());
                Ok(())
            }
        },
        Command::History { limit } => {
            let rows = quiz.history(limit).await?;
            print!("{}", terminal::render_history(&rows));
            Ok(())
        }
        Command::Prune { keep_days } => {
            let removed = quiz.prune_stale_results(keep_days).await?;
            println!("Removed {removed} stored result(s) older than {keep_days} day(s).");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
