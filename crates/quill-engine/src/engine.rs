//! Engine - wires the watcher, augmentation and reply flows to one page

use std::rc::Rc;

use quill_dom::{HostEvent, NodeId};
use quill_net::{ContentService, RequesterId};
use smol::{LocalExecutor, Task};

use crate::{
    Augmenter, ConfigError, EngineConfig, EngineError, HostPage, ItemWatcher, Notice, Notifier, ReplyFlow,
    SelectorMatcher, Session, SharedSession,
};

/// Quill engine attached to one host page
pub struct Engine<H: HostPage, S, N> {
    host: H,
    executor: Rc<LocalExecutor<'static>>,
    session: SharedSession,
    matcher: SelectorMatcher,
    flow: ReplyFlow<H, S, N>,
    watcher: Option<ItemWatcher<H>>,
    clicks: Option<Task<()>>,
}

impl<H, S, N> Engine<H, S, N>
where
    H: HostPage,
    S: ContentService + 'static,
    N: Notifier + Clone + 'static,
{
    /// Create an engine; nothing touches the page until `start`
    pub fn new(
        host: H,
        executor: Rc<LocalExecutor<'static>>,
        config: &EngineConfig,
        service: S,
        notifier: N,
        requester: RequesterId,
    ) -> Result<Self, ConfigError> {
        let session = Session::new().into_shared();
        let matcher = SelectorMatcher::from_config(&config.selectors)?;
        let flow = ReplyFlow::new(
            host.clone(),
            Rc::new(service),
            notifier,
            session.clone(),
            requester,
            config,
        )?;
        Ok(Self {
            host,
            executor,
            session,
            matcher,
            flow,
            watcher: None,
            clicks: None,
        })
    }

    /// Augment current and future items and answer clicks on their controls
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_running() {
            return Ok(());
        }
        let augmenter = Augmenter::new(
            self.host.clone(),
            self.session.clone(),
            self.flow.reply_action().clone(),
        );
        let watcher = ItemWatcher::start(
            self.host.clone(),
            &self.executor,
            self.host.root(),
            self.matcher.clone(),
            augmenter.into_handler(),
        )?;
        self.watcher = Some(watcher);
        self.clicks = Some(self.spawn_click_listener());
        tracing::info!(url = %self.host.url(), "engine started");
        Ok(())
    }

    /// Stop watching and listening. Flows already running finish on their own.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
        if self.clicks.take().is_some() {
            tracing::info!("engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.watcher.as_ref().is_some_and(ItemWatcher::is_running)
    }

    pub fn flow(&self) -> &ReplyFlow<H, S, N> {
        &self.flow
    }

    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }

    /// Run the reply flow for an augmentation control on the executor
    pub fn spawn_control_click(&self, control: NodeId) -> Task<Option<Notice>> {
        let flow = self.flow.clone();
        self.executor
            .spawn(async move { flow.trigger_from_control(control).await })
    }

    fn spawn_click_listener(&self) -> Task<()> {
        let events = self.host.events();
        let host = self.host.clone();
        let flow = self.flow.clone();
        let executor = Rc::downgrade(&self.executor);
        let control = Augmenter::<H>::control_selector();

        self.executor.spawn(async move {
            while let Ok(dispatched) = events.recv().await {
                if dispatched.event != HostEvent::Click || !host.matches(dispatched.target, &control) {
                    continue;
                }
                let Some(executor) = executor.upgrade() else {
                    break;
                };
                tracing::debug!(control = ?dispatched.target, "reply control clicked");
                let flow = flow.clone();
                executor
                    .spawn(async move {
                        flow.trigger_from_control(dispatched.target).await;
                    })
                    .detach();
            }
        })
    }
}

impl<H: HostPage, S, N> Drop for Engine<H, S, N> {
    fn drop(&mut self) {
        drop(self.watcher.take());
        drop(self.clicks.take());
    }
}
