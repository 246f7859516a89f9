//! HTTP content service
//!
//! Uses the blocking reqwest client on smol's blocking pool, so the engine's
//! single-threaded executor keeps running while a request is in flight.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::{decode_reply, ContentService, FeedbackRequest, Reply, ReplyRequest, ServiceError};

/// Content service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpContentService {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl HttpContentService {
    pub const GENERATE_PATH: &'static str = "api/analyze_tweet";
    pub const FEEDBACK_PATH: &'static str = "api/feedback";

    /// Create a client for the service rooted at `endpoint`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { endpoint, client })
    }

    /// Base URL every request path is joined onto
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.endpoint.join(path)?)
    }

    async fn post_json<T>(&self, url: Url, body: T) -> Result<(u16, Vec<u8>), ServiceError>
    where
        T: Serialize + Send + 'static,
    {
        let client = self.client.clone();
        smol::unblock(move || -> Result<(u16, Vec<u8>), ServiceError> {
            let response = client.post(url).json(&body).send()?;
            let status = response.status().as_u16();
            let bytes = response.bytes()?;
            Ok((status, bytes.to_vec()))
        })
        .await
    }
}

impl ContentService for HttpContentService {
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply, ServiceError> {
        let url = self.url(Self::GENERATE_PATH)?;
        tracing::info!(url = %url, item_url = ?request.item_url, "requesting reply");

        let (status, body) = self.post_json(url, request.clone()).await?;
        let reply = decode_reply(status, &body)?;

        tracing::debug!(status, quality_score = ?reply.quality_score, "reply received");
        Ok(reply)
    }

    async fn feedback(&self, feedback: &FeedbackRequest) -> Result<(), ServiceError> {
        let url = self.url(Self::FEEDBACK_PATH)?;
        tracing::debug!(url = %url, tag = ?feedback.tag, "sending feedback");

        let (status, _) = self.post_json(url, feedback.clone()).await?;
        if !(200..300).contains(&status) {
            return Err(ServiceError::Status { status });
        }
        Ok(())
    }
}
