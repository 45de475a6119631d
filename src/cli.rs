//! Command-line interface for grocefy.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Directory holding the stored session.
    pub data_dir: Option<PathBuf>,
    /// Keep the session in memory only.
    pub in_memory: bool,
    /// Logging-out window in milliseconds.
    pub logout_window_ms: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            config: None,
            data_dir: None,
            in_memory: false,
            logout_window_ms: None,
            log_level: None,
            version: false,
            help: false,
        }
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('d') | Long("data-dir") => {
                result.data_dir = Some(parser.value()?.parse()?);
            }
            Long("in-memory") => {
                result.in_memory = true;
            }
            Short('w') | Long("logout-window") => {
                let value: String = parser.value()?.parse()?;
                result.logout_window_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("logout-window", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"grocefy {version}
Session store and route guard service for the Grocefy household tracker

USAGE:
    grocefy [OPTIONS]

OPTIONS:
    -H, --host <ADDR>           Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>           Port to listen on [default: 3000]
    -c, --config <FILE>         Path to configuration file (JSON)
    -d, --data-dir <DIR>        Directory for the stored session [default: .grocefy]
        --in-memory             Do not persist the session
    -w, --logout-window <MS>    Redirect suppression after logout [default: 400]
    -l, --log-level <LVL>       Log level (error, warn, info, debug, trace)
    -h, --help                  Print help
    -V, --version               Print version

ENVIRONMENT VARIABLES:
    GROCEFY_HOST                Host address (overrides config)
    GROCEFY_PORT                Port number (overrides config)
    GROCEFY_DATA_DIR            Data directory (overrides config)
    GROCEFY_LOGOUT_WINDOW_MS    Logging-out window (overrides config)
    GROCEFY_LOG_LEVEL           Log level (overrides config)
    RUST_LOG                    Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:3000, session stored in ./.grocefy)
    grocefy

    # Listen on all interfaces with a custom data directory
    grocefy -H 0.0.0.0 -p 8080 -d /var/lib/grocefy

    # Throwaway session for front-end development
    grocefy --in-memory -l debug
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("grocefy {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
