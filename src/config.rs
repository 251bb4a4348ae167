//! Front-end configuration.
//!
//! Resolved once at startup from the command line and the environment:
//!  1. A single positional argument selects file mode; none starts the REPL
//!  2. `MONKEY_LOG` sets the log level (`off`, `error`, ... `trace`), default `warn`
//!  3. `MONKEY_PROMPT` overrides the REPL prompt, default `>> `
//!  4. `USER` (or `USERNAME`) names the user in the greeting

use std::{env, path::PathBuf};

use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOG_LEVEL_ENV: &str = "MONKEY_LOG";
const PROMPT_ENV: &str = "MONKEY_PROMPT";
const DEFAULT_PROMPT: &str = ">> ";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("usage: monkey [FILE]")]
    TooManyArguments,
    #[error("invalid MONKEY_LOG value {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Source file to parse; `None` runs the interactive loop
    pub file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub prompt: String,
    pub user: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::resolve(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Builds a config from explicit arguments (program name excluded) and an
    /// environment lookup.
    pub fn resolve<I, F>(args: I, lookup: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let file = args.next().map(PathBuf::from);
        if args.next().is_some() {
            return Err(ConfigError::TooManyArguments);
        }

        let log_level = match non_empty(lookup(LOG_LEVEL_ENV)) {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(raw))?,
            None => DEFAULT_LOG_LEVEL,
        };

        let prompt = lookup(PROMPT_ENV).unwrap_or_else(|| String::from(DEFAULT_PROMPT));

        let user = non_empty(lookup("USER"))
            .or_else(|| non_empty(lookup("USERNAME")))
            .unwrap_or_else(|| String::from("there"));

        Ok(Config {
            file,
            log_level,
            prompt,
            user,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
