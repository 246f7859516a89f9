//! Ephemeral-surface locator
//!
//! Finds the reply dialog the host renders some time after its reply action
//! is clicked, and the editable control inside it.

use std::time::Duration;

use quill_dom::{AttrOp, NodeId, Selector};

use crate::{poll_until, EngineError, HostPage, MissingControl, PollPolicy};

/// A visible dialog and its editable control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralSurface {
    pub surface: NodeId,
    pub editable: NodeId,
}

/// Dialog selector plus editable selectors in priority order
#[derive(Debug, Clone)]
pub struct SurfaceLocator {
    dialog: Selector,
    editables: Vec<Selector>,
}

impl Default for SurfaceLocator {
    fn default() -> Self {
        let contenteditable = Selector::tag("div").and_attr("contenteditable", AttrOp::Equals("true".into()));
        Self::new(
            Selector::attr_equals("role", "dialog"),
            vec![
                Selector::attr_equals("data-testid", "tweetTextarea_0"),
                Selector::attr_equals("data-testid", "tweetTextarea"),
                contenteditable.clone().and_attr("aria-label", AttrOp::Exists),
                contenteditable,
            ],
        )
    }
}

impl SurfaceLocator {
    pub fn new(dialog: Selector, editables: Vec<Selector>) -> Self {
        Self { dialog, editables }
    }

    /// Dialogs currently rendered with a non-zero box, in document order
    pub fn visible_dialogs<H: HostPage>(&self, host: &H) -> Vec<NodeId> {
        host.query_all(host.root(), &self.dialog)
            .into_iter()
            .filter(|&dialog| host.is_visible(dialog))
            .collect()
    }

    /// Single probe: first visible dialog holding a visible editable
    pub fn find<H: HostPage>(&self, host: &H) -> Option<EphemeralSurface> {
        self.visible_dialogs(host).into_iter().find_map(|surface| {
            self.editables.iter().find_map(|selector| {
                host.query_all(surface, selector)
                    .into_iter()
                    .find(|&editable| host.is_visible(editable))
                    .map(|editable| EphemeralSurface { surface, editable })
            })
        })
    }

    /// Poll until an editable surface is visible
    pub async fn locate<H: HostPage>(&self, host: &H, policy: PollPolicy) -> Option<EphemeralSurface> {
        let found = poll_until(|| self.find(host), policy).await;
        if let Some(surface) = &found {
            tracing::debug!(surface = ?surface.surface, editable = ?surface.editable, "located reply surface");
        }
        found
    }

    /// Poll until any dialog is visible
    pub async fn wait_for_dialog<H: HostPage>(&self, host: &H, policy: PollPolicy) -> Option<NodeId> {
        poll_until(|| self.visible_dialogs(host).into_iter().next(), policy).await
    }

    /// Explain a locate timeout: a visible dialog without a usable control is
    /// `ControlNotFound`, no visible dialog at all is `SurfaceNotFound`
    pub fn classify_missing<H: HostPage>(&self, host: &H, waited: Duration) -> EngineError {
        if self.visible_dialogs(host).is_empty() {
            EngineError::SurfaceNotFound {
                waited_ms: waited.as_millis() as u64,
            }
        } else {
            EngineError::ControlNotFound(MissingControl::Editable)
        }
    }
}

/// Locate the reply surface with the default selectors
pub async fn locate_editable_surface<H: HostPage>(host: &H, policy: PollPolicy) -> Option<EphemeralSurface> {
    SurfaceLocator::default().locate(host, policy).await
}

/// Wait for any visible dialog with the default selectors
pub async fn wait_for_visible_dialog<H: HostPage>(host: &H, policy: PollPolicy) -> Option<NodeId> {
    SurfaceLocator::default().wait_for_dialog(host, policy).await
}

/// Classify a locate timeout with the default selectors
pub fn classify_missing_surface<H: HostPage>(host: &H, waited: Duration) -> EngineError {
    SurfaceLocator::default().classify_missing(host, waited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Page;
    use quill_dom::DOMRect;

    fn dialog(page: &Page, rect: DOMRect, editable_attrs: &[(&str, &str)]) -> (NodeId, NodeId) {
        let doc = page.document();
        let mut doc = doc.borrow_mut();
        let body = doc.body();
        let dialog = doc.element("div", &[("role", "dialog")]);
        let editable = doc.element("div", editable_attrs);
        doc.set_rect(dialog, rect).unwrap();
        doc.set_rect(editable, rect).unwrap();
        doc.append_child(dialog, editable).unwrap();
        doc.append_child(body, dialog).unwrap();
        (dialog, editable)
    }

    fn visible() -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, 400.0, 200.0)
    }

    #[test]
    fn test_skips_zero_size_dialog() {
        let page = Page::new("about:blank");
        dialog(&page, DOMRect::new(), &[("data-testid", "tweetTextarea_0")]);
        let (second, editable) = dialog(&page, visible(), &[("data-testid", "tweetTextarea_0")]);

        let found = SurfaceLocator::default().find(&page).unwrap();
        assert_eq!(found, EphemeralSurface { surface: second, editable });
    }

    #[test]
    fn test_editable_priority() {
        let page = Page::new("about:blank");
        let doc = page.document();
        let (surface, generic) = dialog(&page, visible(), &[("contenteditable", "true")]);
        let preferred = doc.borrow_mut().element("div", &[("data-testid", "tweetTextarea")]);
        doc.borrow_mut().set_rect(preferred, visible()).unwrap();
        doc.borrow_mut().append_child(surface, preferred).unwrap();

        let found = SurfaceLocator::default().find(&page).unwrap();
        assert_eq!(found.editable, preferred);
        assert_ne!(found.editable, generic);
    }

    #[test]
    fn test_classify_missing() {
        let page = Page::new("about:blank");
        let waited = Duration::from_millis(120);
        assert!(matches!(
            classify_missing_surface(&page, waited),
            EngineError::SurfaceNotFound { waited_ms: 120 }
        ));

        dialog(&page, visible(), &[("role", "note")]);
        assert!(matches!(
            classify_missing_surface(&page, waited),
            EngineError::ControlNotFound(MissingControl::Editable)
        ));
    }

    #[test]
    fn test_locate_times_out_without_dialog() {
        let page = Page::new("about:blank");
        let found = smol::block_on(locate_editable_surface(&page, PollPolicy::from_millis(5, 30)));
        assert!(found.is_none());
        assert!(smol::block_on(wait_for_visible_dialog(&page, PollPolicy::from_millis(5, 30))).is_none());
    }
}
