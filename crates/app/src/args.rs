use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use culturo_core::model::{Activity, Region};

pub const DEFAULT_DATA_FILE: &str = "data/stars.json";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8500";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidAddr { raw: String },
    InvalidDataPath { raw: String },
    InvalidStars { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}> argument"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidAddr { raw } => write!(f, "invalid --addr value: {raw}"),
            ArgsError::InvalidDataPath { raw } => write!(f, "invalid --data value: {raw:?}"),
            ArgsError::InvalidStars { raw } => write!(f, "invalid <stars> value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Show(Option<Region>),
    Total(Option<Region>),
    Stats,
    Progress(Region),
    Set {
        region: Region,
        activity: Activity,
        stars: i64,
    },
    Reset,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub data_path: PathBuf,
    pub addr: SocketAddr,
    pub fresh: bool,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  culturo [serve] [--data <path>] [--addr <host:port>] [--fresh]");
    eprintln!("  culturo show [<region>]       [--data <path>]");
    eprintln!("  culturo total [<region>]      [--data <path>]");
    eprintln!("  culturo stats                 [--data <path>]");
    eprintln!("  culturo progress <region>     [--data <path>]");
    eprintln!("  culturo set <region> <activity> <stars> [--data <path>]");
    eprintln!("  culturo reset                 [--data <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data {DEFAULT_DATA_FILE}");
    eprintln!("  --addr {DEFAULT_ADDR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CULTURO_DATA_FILE, CULTURO_ADDR, CULTURO_FRESH_START=1, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_addr(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidAddr { raw })
}

fn parse_data_path(raw: String) -> Result<PathBuf, ArgsError> {
    if raw.trim().is_empty() {
        return Err(ArgsError::InvalidDataPath { raw });
    }
    Ok(PathBuf::from(raw))
}

fn parse_stars(raw: String) -> Result<i64, ArgsError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ArgsError::InvalidStars { raw })
}

impl Args {
    /// Parse `argv` (without the program name), reading defaults through `env`.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut data_path = env("CULTURO_DATA_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from);
        let mut addr = match env("CULTURO_ADDR") {
            Some(raw) => parse_addr(raw)?,
            None => parse_addr(DEFAULT_ADDR.to_string())?,
        };
        let mut fresh = env("CULTURO_FRESH_START").is_some_and(|value| value == "1");

        let mut positionals = Vec::new();
        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => data_path = parse_data_path(require_value(&mut args, "--data")?)?,
                "--addr" => addr = parse_addr(require_value(&mut args, "--addr")?)?,
                "--fresh" => fresh = true,
                "--help" | "-h" => positionals.insert(0, "help".to_string()),
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positionals.push(arg),
            }
        }

        let command = parse_command(positionals)?;
        Ok(Self {
            command,
            data_path,
            addr,
            fresh,
        })
    }

    /// Whether to discard stored progress on startup. Only `serve` honors
    /// `--fresh`; the other commands always read the existing document.
    pub fn starts_fresh(&self) -> bool {
        self.fresh && self.command == Command::Serve
    }
}

fn parse_command(positionals: Vec<String>) -> Result<Command, ArgsError> {
    let mut rest = positionals.into_iter();
    let Some(name) = rest.next() else {
        // Default behavior: serve when no subcommand is provided.
        return Ok(Command::Serve);
    };

    let command = match name.as_str() {
        "serve" => Command::Serve,
        "help" => return Ok(Command::Help),
        "show" => Command::Show(rest.next().map(Region::from)),
        "total" => Command::Total(rest.next().map(Region::from)),
        "stats" => Command::Stats,
        "progress" => {
            let region = rest
                .next()
                .ok_or(ArgsError::MissingArgument { name: "region" })?;
            Command::Progress(Region::from(region))
        }
        "set" => {
            let region = rest
                .next()
                .ok_or(ArgsError::MissingArgument { name: "region" })?;
            let activity = rest
                .next()
                .ok_or(ArgsError::MissingArgument { name: "activity" })?;
            let stars = rest
                .next()
                .ok_or(ArgsError::MissingArgument { name: "stars" })?;
            Command::Set {
                region: Region::from(region),
                activity: Activity::from(activity),
                stars: parse_stars(stars)?,
            }
        }
        "reset" => Command::Reset,
        _ => return Err(ArgsError::UnknownCommand(name)),
    };

    if let Some(extra) = rest.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(command)
}
