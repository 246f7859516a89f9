//! Canned content service for running without a backend

use quill_engine::net::{ContentService, FeedbackRequest, Reply, ReplyRequest, ServiceError};

const OPENERS: &[&str] = &["Well put.", "Strong agree.", "Saving this one."];

/// Answers every request locally
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedService;

impl ContentService for CannedService {
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply, ServiceError> {
        let opener = OPENERS[request.item_text.len() % OPENERS.len()];
        let mut reply = Reply::new(&format!("{opener} {}", summary(&request.item_text)));
        reply.quality_score = Some(50.0);
        Ok(reply)
    }

    async fn feedback(&self, feedback: &FeedbackRequest) -> Result<(), ServiceError> {
        tracing::info!(tag = ?feedback.tag, "offline feedback recorded");
        Ok(())
    }
}

/// First few words of the item
fn summary(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(5).collect();
    format!("\"{}...\" is exactly it.", words.join(" "))
}
