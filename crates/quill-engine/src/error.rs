//! Error types

use std::fmt;

use quill_dom::{DomError, SelectorError};
use quill_net::ServiceError;

/// Which page control a flow could not find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingControl {
    /// The item's native reply action
    ReplyAction,
    /// An editable inside a visible reply dialog
    Editable,
}

impl fmt::Display for MissingControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReplyAction => "reply action",
            Self::Editable => "editable control in reply dialog",
        })
    }
}

/// Why a reply flow did not complete
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No visible reply dialog after {waited_ms}ms")]
    SurfaceNotFound { waited_ms: u64 },

    #[error("Control not found: {0}")]
    ControlNotFound(MissingControl),

    #[error("Injected text did not stick (observed {observed:?})")]
    InjectionUnverified { observed: String },

    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[from] ServiceError),

    #[error("Host error: {0}")]
    Host(#[from] DomError),
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid selector for {field}: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}
