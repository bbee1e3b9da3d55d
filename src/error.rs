use thiserror::Error;

/// Failure fetching or decoding a payload. This is the only error state the
/// core surfaces; lookup misses and malformed records degrade to empty
/// results instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch payload '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse payload '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The payload file the failure belongs to, for retry affordances.
    pub fn payload_name(&self) -> &str {
        match self {
            LoadError::Fetch { name, .. } => name,
            LoadError::Parse { name, .. } => name,
        }
    }
}
