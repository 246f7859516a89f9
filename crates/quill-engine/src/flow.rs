//! Reply flow
//!
//! One sequential coroutine per trigger: generate a reply, open the host's
//! reply dialog, inject, verify. Every run ends in exactly one notice.

use std::rc::Rc;
use std::time::{Duration, Instant};

use quill_dom::{NodeId, Selector};
use quill_net::{ContentService, FeedbackRequest, FeedbackTag, RequesterId, ReplyRequest};

use crate::notify::{COPIED, FILLED, NOTHING_TO_COPY};
use crate::{
    sleep, ContentItem, EngineConfig, EngineError, HostPage, MissingControl, Notice, Notifier, PollPolicy,
    SharedSession, SurfaceLocator, TextInjector,
};

/// Drives reply generation and injection for one page
pub struct ReplyFlow<H, S, N> {
    host: H,
    service: Rc<S>,
    notifier: N,
    session: SharedSession,
    requester: RequesterId,
    locator: SurfaceLocator,
    injector: TextInjector,
    poll: PollPolicy,
    focus_delay: Duration,
    reply_action: Selector,
}

impl<H: Clone, S, N: Clone> Clone for ReplyFlow<H, S, N> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            service: self.service.clone(),
            notifier: self.notifier.clone(),
            session: self.session.clone(),
            requester: self.requester.clone(),
            locator: self.locator.clone(),
            injector: self.injector,
            poll: self.poll,
            focus_delay: self.focus_delay,
            reply_action: self.reply_action.clone(),
        }
    }
}

impl<H, S, N> ReplyFlow<H, S, N>
where
    H: HostPage,
    S: ContentService,
    N: Notifier,
{
    pub fn new(
        host: H,
        service: Rc<S>,
        notifier: N,
        session: SharedSession,
        requester: RequesterId,
        config: &EngineConfig,
    ) -> Result<Self, crate::ConfigError> {
        Ok(Self {
            host,
            service,
            notifier,
            session,
            requester,
            locator: SurfaceLocator::default(),
            injector: TextInjector::new(config.settle()),
            poll: config.poll_policy(),
            focus_delay: config.focus_delay(),
            reply_action: config.selectors.reply_action_selector()?,
        })
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Selector of an item's native reply action
    pub fn reply_action(&self) -> &Selector {
        &self.reply_action
    }

    /// Generate a reply for `item` and fill it into the host's reply dialog
    pub async fn generate_and_fill(&self, item: &ContentItem, helper_text: &str) -> Notice {
        let outcome = match self.generate(item, helper_text).await {
            Ok(reply) => self.fill(item, &reply).await,
            Err(e) => Err(e),
        };
        self.report(outcome)
    }

    /// Ask the content service for a reply and remember it
    pub async fn generate(&self, item: &ContentItem, helper_text: &str) -> Result<String, EngineError> {
        let request = ReplyRequest {
            requester_id: self.requester.as_str().to_string(),
            item_url: item.url.clone(),
            item_text: item.text.clone(),
            helper_text: helper_text.to_string(),
        };
        tracing::info!(node = ?item.node, url = ?item.url, "generating reply");

        let reply = self.service.generate(&request).await?;

        let mut session = self.session.borrow_mut();
        session.select(item.clone());
        session.set_last_reply(&reply.reply_text);
        Ok(reply.reply_text)
    }

    /// Open the item's reply dialog and inject `reply_text` into it.
    ///
    /// The reply is copied to the clipboard first so the user can paste it by
    /// hand if any later step fails.
    pub async fn fill(&self, item: &ContentItem, reply_text: &str) -> Result<(), EngineError> {
        if let Err(e) = self.host.write_clipboard(reply_text) {
            tracing::warn!(error = %e, "could not copy reply to clipboard");
        }

        let action = self
            .host
            .query(item.node, &self.reply_action)
            .ok_or(EngineError::ControlNotFound(MissingControl::ReplyAction))?;
        self.host.click(action)?;

        let started = Instant::now();
        let Some(surface) = self.locator.locate(&self.host, self.poll).await else {
            return Err(self.locator.classify_missing(&self.host, started.elapsed()));
        };

        self.host.focus(surface.editable)?;
        self.host.click(surface.editable)?;
        sleep(self.focus_delay).await;

        let result = self.injector.inject(&self.host, surface.editable, reply_text).await;
        if !result.succeeded {
            return Err(EngineError::InjectionUnverified {
                observed: result.observed_content,
            });
        }
        Ok(())
    }

    /// Run the flow for the item an augmentation control belongs to.
    ///
    /// Returns `None` for controls the session does not know.
    pub async fn trigger_from_control(&self, control: NodeId) -> Option<Notice> {
        let (item, helper_text) = {
            let session = self.session.borrow();
            let item = session.item_for_control(control).cloned();
            (item, session.helper_text().to_string())
        };
        let Some(item) = item else {
            tracing::warn!(?control, "click on unknown control");
            return None;
        };
        self.session.borrow_mut().select(item.clone());
        Some(self.generate_and_fill(&item, &helper_text).await)
    }

    /// Run the flow for the currently selected item
    pub async fn trigger_selected(&self) -> Option<Notice> {
        let (item, helper_text) = {
            let session = self.session.borrow();
            (session.selected().cloned(), session.helper_text().to_string())
        };
        let item = item?;
        Some(self.generate_and_fill(&item, &helper_text).await)
    }

    /// Copy the last reply to the clipboard
    pub fn copy_reply(&self) -> Notice {
        let reply = self.session.borrow().last_reply().map(str::to_string);
        let notice = match reply {
            Some(reply) => match self.host.write_clipboard(&reply) {
                Ok(()) => Notice::success(COPIED),
                Err(e) => Notice::failure(&format!("Could not copy reply: {e}")),
            },
            None => Notice::failure(NOTHING_TO_COPY),
        };
        self.notifier.notify(notice.clone());
        notice
    }

    /// Tell the service how the last reply landed. Failures are only logged.
    pub async fn send_feedback(&self, tag: FeedbackTag) {
        let request = {
            let session = self.session.borrow();
            match (session.selected(), session.last_reply()) {
                (Some(item), Some(reply)) => FeedbackRequest {
                    requester_id: self.requester.as_str().to_string(),
                    item_text: item.text.clone(),
                    reply_text: reply.to_string(),
                    tag,
                },
                _ => {
                    tracing::debug!(?tag, "no reply to give feedback on");
                    return;
                }
            }
        };

        match self.service.feedback(&request).await {
            Ok(()) => tracing::debug!(?tag, "feedback sent"),
            Err(e) => tracing::warn!(?tag, error = %e, "feedback failed"),
        }
    }

    fn report(&self, outcome: Result<(), EngineError>) -> Notice {
        let notice = match outcome {
            Ok(()) => {
                tracing::info!("reply filled");
                Notice::success(FILLED)
            }
            Err(e) => {
                tracing::warn!(error = %e, "reply flow failed");
                Notice::from_error(&e)
            }
        };
        self.notifier.notify(notice.clone());
        notice
    }
}
