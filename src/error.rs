use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid chart row at line {line}: {reason}")]
    InvalidChartRow { line: usize, reason: String },

    #[error("chart is empty")]
    EmptyChart,

    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("invalid replay: {0}")]
    Replay(#[from] serde_json::Error),

    #[error("replay was recorded on chart {expected}, got {actual}")]
    ReplayChartMismatch { expected: String, actual: String },

    #[error("unknown key code: {0}")]
    UnknownKey(String),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
