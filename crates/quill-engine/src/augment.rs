//! Augmentation - per-item reply controls

use quill_dom::{NodeId, Selector};

use crate::{ContentItem, HostPage, HostResult, SharedSession};

/// Class of the inserted control
pub const CONTROL_CLASS: &str = "quill-reply-btn";

/// Inserts a reply control next to each item's native reply action
#[derive(Clone)]
pub struct Augmenter<H: HostPage> {
    host: H,
    session: SharedSession,
    reply_action: Selector,
}

impl<H: HostPage> Augmenter<H> {
    pub fn new(host: H, session: SharedSession, reply_action: Selector) -> Self {
        Self {
            host,
            session,
            reply_action,
        }
    }

    /// Selector matching the controls this augmenter inserts
    pub fn control_selector() -> Selector {
        Selector::tag("button").and_class(CONTROL_CLASS)
    }

    /// Insert the control before the item's reply action.
    ///
    /// Returns `None` when the item has no reply action to sit next to.
    pub fn augment(&self, item: ContentItem) -> HostResult<Option<NodeId>> {
        let Some(action) = self.host.query(item.node, &self.reply_action) else {
            tracing::debug!(node = ?item.node, "item has no reply action, skipping");
            return Ok(None);
        };
        let Some(container) = self.host.parent(action) else {
            return Ok(None);
        };

        let control = self.host.create_element(
            "button",
            &[
                ("class", CONTROL_CLASS),
                ("type", "button"),
                ("aria-label", "Generate reply"),
                ("title", "Generate reply"),
            ],
        );
        self.host.set_text_content(control, "Reply with Quill")?;
        self.host.insert_before(container, control, Some(action))?;

        tracing::debug!(node = ?item.node, ?control, "augmented item");
        let mut session = self.session.borrow_mut();
        // Feeds recycle items; controls removed with their item are dropped
        let pruned = session.retain_controls(|known| self.host.is_connected(known));
        if pruned > 0 {
            tracing::trace!(pruned, "forgot detached controls");
        }
        session.register_control(control, item);
        Ok(Some(control))
    }

    /// Watcher callback that logs failures instead of returning them
    pub fn into_handler(self) -> impl FnMut(ContentItem) + 'static {
        move |item| {
            let node = item.node;
            if let Err(e) = self.augment(item) {
                tracing::warn!(?node, error = %e, "augmentation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Page, Session};
    use quill_dom::simulate::{build_item, REPLY_TEST_ID};

    #[test]
    fn test_control_sits_before_reply_action() {
        let page = Page::new("https://x.com/home");
        let doc = page.document();
        let node = build_item(&mut doc.borrow_mut(), "abc", None).unwrap();
        page.insert_before(page.body(), node, None).unwrap();

        let session = Session::new().into_shared();
        let augmenter = Augmenter::new(page.clone(), session.clone(), Selector::attr_equals("data-testid", REPLY_TEST_ID));
        let item = ContentItem { node, text: "abc".into(), url: None };
        let control = augmenter.augment(item.clone()).unwrap().unwrap();

        let action = page.query(node, &Selector::attr_equals("data-testid", REPLY_TEST_ID)).unwrap();
        let container = page.parent(action).unwrap();
        assert_eq!(page.first_child(container), Some(control));
        assert!(page.matches(control, &Augmenter::<Page>::control_selector()));
        assert_eq!(session.borrow().item_for_control(control), Some(&item));
    }

    #[test]
    fn test_detached_controls_are_forgotten() {
        let page = Page::new("https://x.com/home");
        let session = Session::new().into_shared();
        let augmenter = Augmenter::new(page.clone(), session.clone(), Selector::attr_equals("data-testid", REPLY_TEST_ID));
        let body = page.body();

        let mut nodes = Vec::new();
        for text in ["one", "two", "three"] {
            let doc = page.document();
            let node = build_item(&mut doc.borrow_mut(), text, None).unwrap();
            page.insert_before(body, node, None).unwrap();
            augmenter.augment(ContentItem { node, text: text.into(), url: None }).unwrap();
            nodes.push(node);
        }
        assert_eq!(session.borrow().control_count(), 3);

        page.remove_child(body, nodes[0]).unwrap();
        page.remove_child(body, nodes[2]).unwrap();

        let doc = page.document();
        let node = build_item(&mut doc.borrow_mut(), "four", None).unwrap();
        page.insert_before(body, node, None).unwrap();
        let control = augmenter.augment(ContentItem { node, text: "four".into(), url: None }).unwrap().unwrap();

        let session = session.borrow();
        assert_eq!(session.control_count(), 2);
        assert_eq!(session.item_for_control(control).map(|item| item.text.as_str()), Some("four"));
    }

    #[test]
    fn test_item_without_reply_action_is_skipped() {
        let page = Page::new("about:blank");
        let node = page.create_element("article", &[("data-testid", "tweet")]);
        page.insert_before(page.body(), node, None).unwrap();

        let session = Session::new().into_shared();
        let augmenter = Augmenter::new(page, session.clone(), Selector::attr_equals("data-testid", REPLY_TEST_ID));
        let item = ContentItem { node, text: "abc".into(), url: None };
        assert_eq!(augmenter.augment(item).unwrap(), None);
        assert_eq!(session.borrow().control_count(), 0);
    }
}
