//! Page - the in-memory host page

use quill_dom::{
    DOMRect, DispatchedEvent, Document, EditCommand, HostEvent, MutationObserverInit, MutationSubscription,
    NodeId, ObserverId, Selector, SharedDocument,
};
use smol::channel::Receiver;

use crate::{HostPage, HostResult};

/// A loaded page backed by a shared `quill_dom::Document`
#[derive(Clone)]
pub struct Page {
    document: SharedDocument,
}

impl Page {
    /// Create a new empty page
    pub fn new(url: &str) -> Self {
        Self {
            document: Document::new(url).into_shared(),
        }
    }

    /// Wrap an existing document
    pub fn from_shared(document: SharedDocument) -> Self {
        Self { document }
    }

    /// Shared handle to the underlying document
    pub fn document(&self) -> SharedDocument {
        self.document.clone()
    }

    /// Get the `<body>` element
    pub fn body(&self) -> NodeId {
        self.document.borrow().body()
    }
}

impl HostPage for Page {
    fn root(&self) -> NodeId {
        self.document.borrow().root()
    }

    fn url(&self) -> String {
        self.document.borrow().url().to_string()
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.document.borrow().query_selector_all(scope, selector)
    }

    fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.document.borrow().query_selector(scope, selector)
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.document.borrow().matches(node, selector)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.document.borrow().tree().descendants(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().tree().parent(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().tree().children(node).next().map(|(id, _)| id)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.document.borrow().tree().is_connected(node)
    }

    fn bounding_rect(&self, node: NodeId) -> DOMRect {
        self.document.borrow().bounding_client_rect(node)
    }

    fn text_content(&self, node: NodeId) -> String {
        self.document.borrow().text_content(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document.borrow().attribute(node, name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> HostResult<()> {
        self.document.borrow_mut().set_attribute(node, name, value)
    }

    fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.document.borrow_mut().element(tag, attrs)
    }

    fn insert_before(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> HostResult<()> {
        self.document.borrow_mut().insert_before(parent, child, reference)?;
        Ok(())
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.document.borrow_mut().remove_child(parent, child)?;
        Ok(())
    }

    fn set_text_content(&self, node: NodeId, text: &str) -> HostResult<()> {
        self.document.borrow_mut().set_text_content(node, text)
    }

    fn focus(&self, node: NodeId) -> HostResult<()> {
        self.document.borrow_mut().focus(node)
    }

    fn click(&self, node: NodeId) -> HostResult<()> {
        self.document.borrow_mut().click(node)?;
        Ok(())
    }

    fn dispatch(&self, node: NodeId, event: HostEvent) -> HostResult<bool> {
        self.document.borrow_mut().dispatch_event(node, event)
    }

    fn exec_insert_text(&self, text: &str) -> bool {
        self.document
            .borrow_mut()
            .exec_command(EditCommand::InsertText, Some(text))
    }

    fn events(&self) -> Receiver<DispatchedEvent> {
        self.document.borrow_mut().subscribe_events()
    }

    fn write_clipboard(&self, text: &str) -> HostResult<()> {
        self.document.borrow_mut().write_clipboard(text)
    }

    fn observe(&self, target: NodeId) -> HostResult<MutationSubscription> {
        self.document
            .borrow_mut()
            .observe(target, MutationObserverInit::default())
    }

    fn disconnect(&self, id: ObserverId) {
        self.document.borrow_mut().disconnect(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_handles_share_document() {
        let page = Page::new("https://x.com/home");
        let other = page.clone();

        let div = page.create_element("div", &[("role", "dialog")]);
        page.insert_before(page.body(), div, None).unwrap();

        assert!(other.is_connected(div));
        assert_eq!(other.query(other.root(), &Selector::attr_equals("role", "dialog")), Some(div));
        assert_eq!(other.url(), "https://x.com/home");
    }

    #[test]
    fn test_first_child_and_parent() {
        let page = Page::new("about:blank");
        let body = page.body();
        let a = page.create_element("p", &[]);
        let b = page.create_element("p", &[]);
        page.insert_before(body, b, None).unwrap();
        page.insert_before(body, a, Some(b)).unwrap();

        assert_eq!(page.first_child(body), Some(a));
        assert_eq!(page.parent(b), Some(body));
        page.remove_child(body, a).unwrap();
        assert_eq!(page.first_child(body), Some(b));
    }
}
