//! Wire types
//!
//! Field names follow the service's JSON schema; the Rust names describe
//! what the fields mean to the engine.

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Request for a reply to one content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    #[serde(rename = "user_id")]
    pub requester_id: String,
    #[serde(rename = "tweet_url")]
    pub item_url: Option<String>,
    #[serde(rename = "tweet_text")]
    pub item_text: String,
    pub helper_text: String,
}

/// Generated reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "reply")]
    pub reply_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_feedback: Option<String>,
}

impl Reply {
    pub fn new(reply_text: &str) -> Self {
        Self {
            reply_text: reply_text.to_string(),
            quality_score: None,
            quality_feedback: None,
        }
    }
}

/// How the user judged a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTag {
    Good,
    Bad,
    TooFormal,
    TooCasual,
}

/// Feedback about a previously generated reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(rename = "user_id")]
    pub requester_id: String,
    #[serde(rename = "tweet_text")]
    pub item_text: String,
    #[serde(rename = "ai_reply")]
    pub reply_text: String,
    #[serde(rename = "feedback")]
    pub tag: FeedbackTag,
}

/// Decode a service response.
///
/// Non-2xx statuses, undecodable bodies and blank replies are all errors.
pub fn decode_reply(status: u16, body: &[u8]) -> Result<Reply, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Status { status });
    }
    let reply: Reply = serde_json::from_slice(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    if reply.reply_text.trim().is_empty() {
        return Err(ServiceError::Malformed("empty reply".to_string()));
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_service_field_names() {
        let request = ReplyRequest {
            requester_id: "user_abc123xyz".into(),
            item_url: None,
            item_text: "abc".into(),
            helper_text: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_id"], "user_abc123xyz");
        assert!(json["tweet_url"].is_null());
        assert_eq!(json["tweet_text"], "abc");
        assert_eq!(json["helper_text"], "");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let body = br#"{"reply":"same here","question_id":"q1","quality_score":72.5,"quality_feedback":"ok"}"#;
        let reply = decode_reply(200, body).unwrap();
        assert_eq!(reply.reply_text, "same here");
        assert_eq!(reply.quality_score, Some(72.5));
        assert_eq!(reply.quality_feedback.as_deref(), Some("ok"));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_reply(500, b"{}"), Err(ServiceError::Status { status: 500 })));
        assert!(matches!(decode_reply(200, b"not json"), Err(ServiceError::Malformed(_))));
        assert!(matches!(decode_reply(200, br#"{"score":1}"#), Err(ServiceError::Malformed(_))));
        assert!(matches!(decode_reply(200, br#"{"reply":"   "}"#), Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_feedback_tag_wire_names() {
        let feedback = FeedbackRequest {
            requester_id: "u".into(),
            item_text: "t".into(),
            reply_text: "r".into(),
            tag: FeedbackTag::TooFormal,
        };
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["feedback"], "too_formal");
        assert_eq!(json["ai_reply"], "r");
    }
}
