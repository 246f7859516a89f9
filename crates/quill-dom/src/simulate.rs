//! Host-side simulation
//!
//! Stands in for the page's own scripts when no browser is attached: builds
//! feed items shaped like the target site's markup, and renders the site's
//! reply dialog asynchronously once an item's reply action is clicked.

use std::future::Future;
use std::time::Duration;

use smol::Timer;

use crate::{DOMRect, Document, DomResult, EditingPolicy, HostEvent, NodeId, Selector, SharedDocument};

/// Test id of a feed item
pub const ITEM_TEST_ID: &str = "tweet";
/// Test id of an item's text region
pub const TEXT_TEST_ID: &str = "tweetText";
/// Test id of an item's native reply action
pub const REPLY_TEST_ID: &str = "reply";
/// Test id of the dialog's text box
pub const TEXTAREA_TEST_ID: &str = "tweetTextarea_0";

/// Build a detached feed item:
/// `article[data-testid=tweet] > (div[data-testid=tweetText], a[href], div[role=group] > button[data-testid=reply])`
pub fn build_item(doc: &mut Document, text: &str, href: Option<&str>) -> DomResult<NodeId> {
    let article = doc.element("article", &[("data-testid", ITEM_TEST_ID)]);
    doc.set_rect(article, DOMRect::from_xywh(0.0, 0.0, 600.0, 120.0))?;

    let body = doc.element("div", &[("data-testid", TEXT_TEST_ID), ("lang", "en")]);
    let content = doc.create_text(text);
    doc.append_child(body, content)?;
    doc.append_child(article, body)?;

    if let Some(href) = href {
        let link = doc.element("a", &[("href", href)]);
        let time = doc.create_text("1h");
        doc.append_child(link, time)?;
        doc.append_child(article, link)?;
    }

    let actions = doc.element("div", &[("role", "group")]);
    let reply = doc.element("button", &[("data-testid", REPLY_TEST_ID), ("aria-label", "Reply")]);
    doc.set_rect(reply, DOMRect::from_xywh(0.0, 90.0, 32.0, 32.0))?;
    doc.append_child(actions, reply)?;
    doc.append_child(article, actions)?;
    Ok(article)
}

/// How the simulated host renders its reply dialog
#[derive(Debug, Clone)]
pub struct DialogOptions {
    /// Delay between the click and the dialog entering the DOM
    pub render_delay: Duration,
    /// Delay between insertion and the dialog getting a non-zero box
    pub layout_delay: Duration,
    /// How the dialog's editor treats page-script edits
    pub policy: EditingPolicy,
    /// Content the editor starts with
    pub prefill: String,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            render_delay: Duration::from_millis(300),
            layout_delay: Duration::from_millis(30),
            policy: EditingPolicy::cooperative(),
            prefill: String::new(),
        }
    }
}

/// Nodes of a rendered reply dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDialog {
    pub dialog: NodeId,
    pub editable: NodeId,
}

/// Insert a reply dialog into `<body>`, replacing any open one.
/// The dialog has no box until `lay_out` is called.
pub fn render_reply_dialog(doc: &mut Document, options: &DialogOptions) -> DomResult<ReplyDialog> {
    let body = doc.body();
    for open in doc.query_selector_all(body, &Selector::attr_equals("role", "dialog")) {
        if let Some(parent) = doc.tree().parent(open) {
            doc.remove_child(parent, open)?;
        }
    }

    let dialog = doc.element("div", &[("role", "dialog"), ("aria-modal", "true")]);
    let editable = doc.element(
        "div",
        &[("data-testid", TEXTAREA_TEST_ID), ("aria-label", "Post text"), ("role", "textbox")],
    );
    if !options.prefill.is_empty() {
        let text = doc.create_text(&options.prefill);
        doc.append_child(editable, text)?;
    }
    doc.append_child(dialog, editable)?;
    doc.make_editable(editable, options.policy)?;
    doc.append_child(body, dialog)?;
    Ok(ReplyDialog { dialog, editable })
}

/// Give a rendered dialog and its editor a visible box
pub fn lay_out(doc: &mut Document, rendered: ReplyDialog) -> DomResult<()> {
    doc.set_rect(rendered.dialog, DOMRect::from_xywh(200.0, 50.0, 600.0, 320.0))?;
    doc.set_rect(rendered.editable, DOMRect::from_xywh(220.0, 120.0, 560.0, 96.0))
}

/// Serve reply dialogs for every click on a reply action.
///
/// Subscribes immediately, so clicks dispatched before the returned future
/// is first polled are still served.
pub fn serve_reply_dialogs(doc: SharedDocument, options: DialogOptions) -> impl Future<Output = ()> {
    let events = doc.borrow_mut().subscribe_events();
    async move {
        let reply_action = Selector::attr_equals("data-testid", REPLY_TEST_ID);
        while let Ok(dispatched) = events.recv().await {
            if dispatched.event != HostEvent::Click || !doc.borrow().matches(dispatched.target, &reply_action) {
                continue;
            }

            Timer::after(options.render_delay).await;
            let rendered = match render_reply_dialog(&mut doc.borrow_mut(), &options) {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::warn!(error = %e, "simulated host failed to render dialog");
                    continue;
                }
            };
            tracing::debug!(dialog = ?rendered.dialog, "simulated host rendered reply dialog");

            Timer::after(options.layout_delay).await;
            if let Err(e) = lay_out(&mut doc.borrow_mut(), rendered) {
                tracing::warn!(error = %e, "simulated host failed to lay out dialog");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_item_shape() {
        let mut doc = Document::default();
        let item = build_item(&mut doc, "abc", Some("https://x/1")).unwrap();
        let body = doc.body();
        doc.append_child(body, item).unwrap();

        let text = doc.query_selector(item, &Selector::attr_equals("data-testid", TEXT_TEST_ID)).unwrap();
        assert_eq!(doc.text_content(text), "abc");
        assert!(doc.query_selector(item, &Selector::attr_equals("data-testid", REPLY_TEST_ID)).is_some());
        assert!(doc.query_selector(item, &Selector::tag("a")).is_some());
    }

    #[test]
    fn test_dialog_visible_only_after_layout() {
        let mut doc = Document::default();
        let rendered = render_reply_dialog(&mut doc, &DialogOptions::default()).unwrap();
        assert!(!doc.bounding_client_rect(rendered.dialog).has_area());

        lay_out(&mut doc, rendered).unwrap();
        assert!(doc.bounding_client_rect(rendered.editable).has_area());

        let second = render_reply_dialog(&mut doc, &DialogOptions::default()).unwrap();
        assert!(!doc.tree().is_connected(rendered.dialog));
        assert!(doc.tree().is_connected(second.dialog));
    }
}
