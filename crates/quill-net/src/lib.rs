//! Quill Networking
//!
//! The content service the engine asks for reply text, its wire types, and
//! the locally persisted requester identity sent with every request.

mod client;
mod identity;
mod wire;

pub use client::HttpContentService;
pub use identity::RequesterId;
pub use wire::{decode_reply, FeedbackRequest, FeedbackTag, Reply, ReplyRequest};
pub use url::Url;

/// Source of reply text for a content item.
///
/// Transport, auth and retry policy belong to the implementation; callers
/// only see a reply or a `ServiceError`.
#[allow(async_fn_in_trait)]
pub trait ContentService {
    /// Produce a reply for one item
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply, ServiceError>;

    /// Report how a reply was received. Fire-and-forget for callers.
    async fn feedback(&self, feedback: &FeedbackRequest) -> Result<(), ServiceError> {
        let _ = feedback;
        Ok(())
    }
}

/// Content service error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned status {status}")]
    Status { status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
