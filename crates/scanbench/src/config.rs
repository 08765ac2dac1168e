//! Command-line configuration.

use scancore::{EngineConfig, Registry};
use std::ffi::OsString;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: scanbench [OPTIONS] <pattern> <input file>

Runs every scan strategy over <input file> looking for <pattern> and prints
one line per strategy with its hit count and elapsed time.

Options:
      --json                     Print the report as JSON
      --parallel                 Run the strategies concurrently
      --only <name>[,<name>...]  Run only the named strategies
      --cache-capacity <bytes>   Regex engine scratch capacity
      --max-cache-clears <n>     Fail the regex engine after <n> scratch clears
  -h, --help                     Print this help

Strategies: byte-scan, engine-scan, naive-scan, vectorized-scan, null-scan
Log level is read from RUST_LOG (default: info).";

/// Errors in the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required argument <{0}>")]
    MissingArgument(&'static str),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' requires a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for '{option}': {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("empty search pattern")]
    EmptyPattern,

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(BenchConfig),
    Help,
}

/// Settings for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Raw pattern bytes, taken from the command line unchanged.
    pub pattern: Vec<u8>,
    /// Input path or `file://` URL.
    pub input: OsString,
    pub json: bool,
    pub parallel: bool,
    /// Subset of strategies to run, by name. `None` runs all of them.
    pub only: Option<Vec<String>>,
    pub engine: EngineConfig,
}

impl BenchConfig {
    /// Parse arguments (without the program name).
    ///
    /// Arguments need not be valid UTF-8. Options are matched by name, the
    /// pattern keeps its raw bytes and the input keeps its raw path.
    pub fn parse<I, S>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut positional: Vec<OsString> = Vec::new();
        let mut json = false;
        let mut parallel = false;
        let mut only = None;
        let mut engine = EngineConfig::default();

        while let Some(arg) = args.next() {
            let Some(flag) = arg.to_str() else {
                positional.push(arg);
                continue;
            };
            match flag {
                "-h" | "--help" => return Ok(Command::Help),
                "--json" => json = true,
                "--parallel" => parallel = true,
                "--only" => {
                    let value = required_value(flag, args.next())?;
                    only = Some(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect(),
                    );
                }
                "--cache-capacity" => {
                    let value = required_value(flag, args.next())?;
                    engine.cache_capacity = parse_number(flag, &value)?;
                }
                "--max-cache-clears" => {
                    let value = required_value(flag, args.next())?;
                    engine.max_cache_clears = Some(parse_number(flag, &value)?);
                }
                "--" => {
                    positional.extend(args.by_ref());
                }
                s if s.starts_with('-') && s.len() > 1 => {
                    return Err(ConfigError::UnknownOption(s.to_string()));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let pattern = positional
            .next()
            .ok_or(ConfigError::MissingArgument("pattern"))?;
        let input = positional
            .next()
            .ok_or(ConfigError::MissingArgument("input file"))?;
        if let Some(extra) = positional.next() {
            return Err(ConfigError::UnexpectedArgument(
                extra.to_string_lossy().into_owned(),
            ));
        }
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }

        Ok(Command::Run(BenchConfig {
            pattern: os_into_bytes(pattern),
            input,
            json,
            parallel,
            only,
            engine,
        }))
    }

    /// Build the strategy registry this configuration selects.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::standard(self.engine);
        if let Some(only) = &self.only {
            if let Some(unknown) = only.iter().find(|name| !registry.contains(name)) {
                return Err(ConfigError::UnknownStrategy(unknown.clone()));
            }
            registry.retain(|name| only.iter().any(|o| o == name));
        }
        Ok(registry)
    }
}

#[cfg(unix)]
fn os_into_bytes(s: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    s.into_vec()
}

#[cfg(not(unix))]
fn os_into_bytes(s: OsString) -> Vec<u8> {
    s.to_string_lossy().into_owned().into_bytes()
}

fn required_value(option: &str, value: Option<OsString>) -> Result<String, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingValue(option.to_string()))?;
    value.into_string().map_err(|v| ConfigError::InvalidValue {
        option: option.to_string(),
        value: v.to_string_lossy().into_owned(),
        reason: "not valid UTF-8".to_string(),
    })
}

fn parse_number(option: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
