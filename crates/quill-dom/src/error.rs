//! DOM errors

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found")]
    NotFound,

    #[error("Hierarchy request error")]
    HierarchyRequest,

    #[error("Node is not a child")]
    NotAChild,

    #[error("Clipboard write denied")]
    ClipboardDenied,

    #[error("Observer target is not an element or document")]
    InvalidObserverTarget,
}

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("Unterminated attribute selector")]
    UnterminatedAttribute,

    #[error("Combinators are not supported: {0}")]
    Unsupported(String),
}
