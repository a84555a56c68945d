// Error handling for BCI signal retrieval

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BciError>;

#[derive(Error, Debug)]
pub enum BciError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Retrieval failed ({context}): {source}")]
    Retrieval {
        context: String,
        #[source]
        source: RetrievalCause,
    },

    #[error("Empty window: no samples in [{start}, {end}] s (record spans [{first}, {last}] s)")]
    EmptyWindow {
        start: f64,
        end: f64,
        first: f64,
        last: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BciError {
    pub fn retrieval(context: impl Into<String>, source: RetrievalCause) -> Self {
        BciError::Retrieval {
            context: context.into(),
            source,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        BciError::InvalidArgument(msg.into())
    }
}

/// Underlying cause of a failed remote read.
#[derive(Error, Debug)]
pub enum RetrievalCause {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("shot {0} not found")]
    UnknownShot(i32),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("malformed node {node}: {reason}")]
    MalformedNode { node: String, reason: String },

    #[error("correction trace has {correction} samples, primary has {primary} (tolerance {tolerance})")]
    CorrectionMismatch {
        primary: usize,
        correction: usize,
        tolerance: usize,
    },

    #[error("correction trace misses the primary time range by {overhang} samples (tolerance {tolerance})")]
    CorrectionMisaligned { overhang: f64, tolerance: usize },
}

impl RetrievalCause {
    pub fn malformed(node: &str, reason: impl Into<String>) -> Self {
        RetrievalCause::MalformedNode {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}
