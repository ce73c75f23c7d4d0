use markview_config::ConfigError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can stop the CLI. The engine itself never fails.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Read { path: PathBuf, source: io::Error },
    Stdin(io::Error),
    Write(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(err) => write!(f, "Invalid configuration: {}", err),
            CliError::Read { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            CliError::Stdin(err) => write!(f, "Cannot read standard input: {}", err),
            CliError::Write(err) => write!(f, "Cannot write output: {}", err),
            CliError::Json(err) => write!(f, "Cannot encode JSON: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(err) => Some(err),
            CliError::Read { source, .. } => Some(source),
            CliError::Stdin(err) | CliError::Write(err) => Some(err),
            CliError::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}
