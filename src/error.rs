use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FbError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("failed to parse {what} response: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("auth_key contains characters that cannot be sent in an HTTP header")]
    InvalidAuthKey,

    #[error("REST prefix not found in response")]
    MissingRestPrefix,

    #[error("config file not found at {}\n\n{}", path.display(), crate::config::first_run_message(path))]
    ConfigMissing { path: PathBuf },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML syntax error in configuration file {}: {source}\n\n{}", path.display(), crate::config::YAML_HINTS)]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is required in config file")]
    MissingField(&'static str),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to write state file at {path}: {source}")]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clear checkout at {path}: {source}")]
    StateClear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bin not found: {0}")]
    BinNotFound(String),

    #[error("board not found: {0}")]
    BoardNotFound(String),

    #[error(
        "ticket already checked out: {ticket_name} [{ticket_id}]\n{}",
        if *force_allowed { "Use 'fb clear' or 'fb checkout --force'" } else { "Use 'fb clear' first" }
    )]
    AlreadyCheckedOut {
        ticket_id: String,
        ticket_name: String,
        force_allowed: bool,
    },

    #[error("ticket {0} not found among tickets assigned to you")]
    TicketNotFound(String),

    #[error("ticket {0} exists but is not assigned to you")]
    TicketNotAssigned(String),

    #[error("no bin context found. Use 'fb checkout --bin \"Bin Name\"' first")]
    NoBinContext,

    #[error("no ticket checked out. Use 'fb checkout' first")]
    NothingCheckedOut,

    #[error("operation cancelled")]
    SelectionCancelled,

    #[error("comment cannot be empty")]
    EmptyComment,

    #[error("failed to generate comment ID: {0}")]
    Random(#[from] getrandom::Error),

    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<FbError>,
    },
}

impl FbError {
    /// Innermost error beneath any `Context` wrappers.
    #[cfg(test)]
    pub fn root(&self) -> &FbError {
        match self {
            FbError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FbError>;

/// Wraps an error with the operation that was being attempted.
pub trait ResultExt<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E: Into<FbError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| FbError::Context {
            context,
            source: Box::new(e.into()),
        })
    }
}
