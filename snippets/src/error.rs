use std::path::PathBuf;

use thiserror::Error;

pub type SnippetResult<T, E = SnippetError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("I/O error for {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path:?} is not valid UTF-8")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("top level of {path:?} is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("failed to serialize snippet for {path:?}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path:?} has no file name")]
    NoFileName { path: PathBuf },

    #[error("invalid config file {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl SnippetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// The file the error was raised for.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Encoding { path, .. }
            | Self::NotAMapping { path }
            | Self::Serialize { path, .. }
            | Self::NoFileName { path }
            | Self::Config { path, .. } => path.as_path(),
        }
    }

    /// True for errors caused by the content of an input file rather than
    /// by the filesystem.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Encoding { .. } | Self::NotAMapping { .. }
        )
    }
}
