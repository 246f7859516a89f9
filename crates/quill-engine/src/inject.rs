//! Verified text injection
//!
//! The host's editor keeps its own model of the content and may ignore any
//! single way of writing to the DOM. The injector tries every path in turn,
//! waits for the framework to settle, then reads back what actually stuck.

use std::time::Duration;

use quill_dom::{HostEvent, NodeId};

use crate::{sleep, HostPage};

/// What an injection left in the control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionResult {
    pub succeeded: bool,
    pub observed_content: String,
}

/// Trimmed equality, or containment either way between non-empty strings
pub fn content_matches(observed: &str, expected: &str) -> bool {
    let observed = observed.trim();
    let expected = expected.trim();
    if observed == expected {
        return true;
    }
    if observed.is_empty() || expected.is_empty() {
        return false;
    }
    observed.contains(expected) || expected.contains(observed)
}

/// Multi-strategy writer for framework-controlled editors
#[derive(Debug, Clone, Copy)]
pub struct TextInjector {
    settle: Duration,
}

impl Default for TextInjector {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl TextInjector {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    /// Write `text` into `editable` and verify it. Never fails; host errors
    /// are logged and the next strategy still runs.
    pub async fn inject<H: HostPage>(&self, host: &H, editable: NodeId, text: &str) -> InjectionResult {
        // 1. Clipboard paste
        if let Err(e) = host.write_clipboard(text) {
            tracing::warn!(error = %e, "clipboard write failed before paste");
        }
        match host.dispatch(editable, HostEvent::paste(text)) {
            Ok(true) => tracing::trace!("paste accepted"),
            Ok(false) => tracing::trace!("paste suppressed by editor"),
            Err(e) => tracing::warn!(error = %e, "paste dispatch failed"),
        }

        // 2. Direct replacement plus the events a typing user would produce
        clear(host, editable);
        if let Err(e) = host.set_text_content(editable, text) {
            tracing::warn!(error = %e, "direct text assignment failed");
        }
        let events = [HostEvent::Focus, HostEvent::insert_text(text), HostEvent::Change];
        for event in events {
            let name = event.name();
            if let Err(e) = host.dispatch(editable, event) {
                tracing::warn!(error = %e, event = name, "event dispatch failed");
            }
        }

        // 3. Legacy command, then a bare assignment
        if host.text_content(editable) != text {
            clear(host, editable);
            if !host.exec_insert_text(text) {
                tracing::debug!("insertText command rejected");
                if let Err(e) = host.set_text_content(editable, text) {
                    tracing::warn!(error = %e, "fallback text assignment failed");
                }
            }
        }

        // 4. Settle
        sleep(self.settle).await;

        // 5. Verify
        let observed_content = host.text_content(editable);
        let succeeded = content_matches(&observed_content, text);
        if succeeded {
            tracing::debug!(chars = observed_content.chars().count(), "injection verified");
        } else {
            tracing::warn!(observed = %observed_content, "injection did not stick");
        }
        InjectionResult {
            succeeded,
            observed_content,
        }
    }
}

/// Inject with an explicit settle delay
pub async fn inject_text<H: HostPage>(host: &H, editable: NodeId, text: &str, settle: Duration) -> InjectionResult {
    TextInjector::new(settle).inject(host, editable, text).await
}

/// Remove children one at a time; stops when the editor ignores a removal
fn clear<H: HostPage>(host: &H, editable: NodeId) {
    while let Some(child) = host.first_child(editable) {
        if let Err(e) = host.remove_child(editable, child) {
            tracing::warn!(error = %e, "clearing control failed");
            return;
        }
        if host.first_child(editable) == Some(child) {
            tracing::trace!("editor kept its content");
            return;
        }
    }
}
