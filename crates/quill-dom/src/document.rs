//! Document - High-level document API
//!
//! All structural mutation goes through `Document` so observers see it.
//! Writes that land inside a framework-controlled editor are filtered by
//! that editor's `EditingPolicy`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use smol::channel::{self, Receiver, Sender};

use crate::observer::ObserverRegistry;
use crate::{
    DOMRect, DispatchedEvent, DomError, DomResult, DomTree, EditCommand, EditingPolicy, HostEvent,
    MutationObserverInit, MutationRecord, MutationSubscription, NodeId, ObserverId, Selector,
    SharedDocument,
};

/// HTML Document
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    body_element: NodeId,
    focused: Option<NodeId>,
    clipboard: Option<String>,
    clipboard_allowed: bool,
    editors: HashMap<NodeId, EditingPolicy>,
    observers: ObserverRegistry,
    event_log: Vec<DispatchedEvent>,
    event_listeners: Vec<Sender<DispatchedEvent>>,
}

impl Document {
    /// Create a new document with `<html><head/><body/></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under the root cannot violate hierarchy rules.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            body_element: body,
            focused: None,
            clipboard: None,
            clipboard_allowed: true,
            editors: HashMap::new(),
            observers: ObserverRegistry::default(),
            event_log: Vec::new(),
            event_listeners: Vec::new(),
        }
    }

    /// Wrap in a shared handle
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    // === Construction ===

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached element with attributes
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Some(elem) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            for (name, value) in attrs {
                elem.set_attr(name, value);
            }
        }
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    // === Structure ===

    /// Append a child
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Append several children as one mutation batch
    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> DomResult<()> {
        if children.is_empty() {
            return Ok(());
        }
        if self.rejects_direct_write(parent) {
            return Ok(());
        }
        let previous = self.tree.get(parent).and_then(|n| n.last_child.to_option());
        for &child in children {
            self.detach_with_record(child)?;
            self.tree.append_child(parent, child)?;
        }
        let record = MutationRecord::added(parent, children.to_vec(), previous, None);
        self.observers.notify(&self.tree, &record);
        Ok(())
    }

    /// Insert `child` before `reference` (or at the end)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        if self.rejects_direct_write(parent) {
            tracing::trace!(?parent, "editor ignored direct insert");
            return Ok(child);
        }
        // Validate before detaching so a rejected insert leaves the tree alone
        if child == NodeId::ROOT || self.tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if reference.is_some_and(|r| self.tree.parent(r) != Some(parent)) {
            return Err(DomError::NotAChild);
        }
        if reference == Some(child) {
            return Ok(child);
        }
        self.detach_with_record(child)?;
        self.tree.insert_before(parent, child, reference)?;
        let (prev, next) = self.siblings(child);
        let record = MutationRecord::added(parent, vec![child], prev, next);
        self.observers.notify(&self.tree, &record);
        Ok(child)
    }

    /// Remove a child
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.tree.parent(child) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if self.rejects_direct_write(parent) {
            tracing::trace!(?parent, "editor ignored direct removal");
            return Ok(child);
        }
        self.detach_with_record(child)?;
        Ok(child)
    }

    fn siblings(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        self.tree
            .get(id)
            .map_or((None, None), |n| (n.prev_sibling.to_option(), n.next_sibling.to_option()))
    }

    fn detach_with_record(&mut self, child: NodeId) -> DomResult<()> {
        let Some(parent) = self.tree.parent(child) else {
            return Ok(());
        };
        let (prev, next) = self.siblings(child);
        self.tree.remove_child(parent, child)?;
        if self.focused.is_some_and(|f| self.tree.is_inclusive_ancestor(child, f)) {
            self.focused = None;
        }
        let record = MutationRecord::removed(parent, child, prev, next);
        self.observers.notify(&self.tree, &record);
        Ok(())
    }

    // === Content ===

    /// Concatenated descendant text
    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    /// Replace all children with one text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.tree.get(id).ok_or(DomError::NotFound)?;
        if self.rejects_direct_write(id) {
            tracing::trace!(?id, "editor ignored direct text assignment");
            return Ok(());
        }
        let text = match self.editor_policy(id) {
            Some(policy) => policy.clamp(text).to_string(),
            None => text.to_string(),
        };
        self.replace_text(id, &text)
    }

    fn replace_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        for child in self.tree.child_ids(id) {
            self.detach_with_record(child)?;
        }
        if !text.is_empty() {
            let node = self.tree.create_text(text);
            self.tree.append_child(id, node)?;
            let record = MutationRecord::added(id, vec![node], None, None);
            self.observers.notify(&self.tree, &record);
        }
        Ok(())
    }

    /// Attribute value
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.tree
            .get(id)?
            .as_element()?
            .get_attr(name)
            .map(str::to_string)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(id)
            .and_then(|n| n.as_element_mut())
            .ok_or(DomError::NotFound)?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Add a class to an element
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(id)
            .and_then(|n| n.as_element_mut())
            .ok_or(DomError::NotFound)?;
        elem.add_class(class);
        Ok(())
    }

    // === Query ===

    /// Check if an element matches a selector
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.tree
            .get(id)
            .and_then(|n| n.as_element())
            .is_some_and(|e| selector.matches(e))
    }

    /// Descendants of `scope` matching `selector`, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.tree
            .descendants(scope)
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.tree
            .descendants(scope)
            .into_iter()
            .find(|&id| self.matches(id, selector))
    }

    // === Layout ===

    /// Record the laid-out box of an element
    pub fn set_rect(&mut self, id: NodeId, rect: DOMRect) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(id)
            .and_then(|n| n.as_element_mut())
            .ok_or(DomError::NotFound)?;
        elem.rect = rect;
        Ok(())
    }

    /// getBoundingClientRect: zero when detached or inside a `hidden` subtree
    pub fn bounding_client_rect(&self, id: NodeId) -> DOMRect {
        if !self.tree.is_connected(id) {
            return DOMRect::new();
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if self.attribute(node, "hidden").is_some() {
                return DOMRect::new();
            }
            current = self.tree.parent(node);
        }
        self.tree
            .get(id)
            .and_then(|n| n.as_element())
            .map_or(DOMRect::new(), |e| e.rect)
    }

    // === Editors ===

    /// Turn an element into a framework-controlled contenteditable region
    pub fn make_editable(&mut self, id: NodeId, policy: EditingPolicy) -> DomResult<()> {
        self.set_attribute(id, "contenteditable", "true")?;
        self.editors.insert(id, policy);
        Ok(())
    }

    /// Nearest editor owning `id`
    fn editor_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.editors.contains_key(&node) {
                return Some(node);
            }
            current = self.tree.parent(node);
        }
        None
    }

    /// Policy of the editor owning `id`
    pub fn editor_policy(&self, id: NodeId) -> Option<EditingPolicy> {
        self.editor_of(id).and_then(|e| self.editors.get(&e).copied())
    }

    fn rejects_direct_write(&self, id: NodeId) -> bool {
        self.editor_policy(id).is_some_and(|p| !p.direct_mutation)
    }

    /// Framework-side write: the editor updates its own content
    fn editor_append(&mut self, editor: NodeId, text: &str) -> DomResult<()> {
        let policy = self.editors.get(&editor).copied().unwrap_or_default();
        let combined = format!("{}{}", self.text_content(editor), text);
        let clamped = policy.clamp(&combined).to_string();
        self.replace_text(editor, &clamped)
    }

    /// document.execCommand against the focused editor
    pub fn exec_command(&mut self, command: EditCommand, value: Option<&str>) -> bool {
        let Some(editor) = self.focused.and_then(|f| self.editor_of(f)) else {
            return false;
        };
        let policy = self.editors.get(&editor).copied().unwrap_or_default();
        if !policy.insert_text_command {
            tracing::trace!(?editor, ?command, "editor rejected execCommand");
            return false;
        }
        if command.requires_value() && value.is_none() {
            return false;
        }
        let applied = match command {
            EditCommand::InsertText => self.editor_append(editor, value.unwrap_or_default()),
            EditCommand::Delete => self.replace_text(editor, ""),
            EditCommand::SelectAll => Ok(()),
        };
        applied.is_ok()
    }

    // === Focus & events ===

    /// Currently focused element
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Focus an element and dispatch `focus`
    pub fn focus(&mut self, id: NodeId) -> DomResult<()> {
        if !self.tree.is_connected(id) {
            return Err(DomError::NotFound);
        }
        self.focused = Some(id);
        self.dispatch_event(id, HostEvent::Focus)?;
        Ok(())
    }

    /// Dispatch `click`
    pub fn click(&mut self, id: NodeId) -> DomResult<bool> {
        self.dispatch_event(id, HostEvent::Click)
    }

    /// Dispatch an event; returns false if its default action was suppressed
    pub fn dispatch_event(&mut self, target: NodeId, event: HostEvent) -> DomResult<bool> {
        self.tree.get(target).ok_or(DomError::NotFound)?;
        let dispatched = DispatchedEvent {
            target,
            event: event.clone(),
        };
        self.event_log.push(dispatched.clone());
        self.event_listeners
            .retain(|listener| listener.try_send(dispatched.clone()).is_ok());

        match event {
            HostEvent::Focus => self.focused = Some(target),
            HostEvent::Paste { data } => {
                if let Some(editor) = self.editor_of(target) {
                    let accepts = self.editors.get(&editor).is_some_and(|p| p.paste);
                    if !accepts {
                        return Ok(false);
                    }
                    self.editor_append(editor, &data)?;
                }
            }
            HostEvent::Click | HostEvent::Input { .. } | HostEvent::Change => {}
        }
        Ok(true)
    }

    /// Every event dispatched so far
    pub fn event_log(&self) -> &[DispatchedEvent] {
        &self.event_log
    }

    /// Stream of future dispatched events
    pub fn subscribe_events(&mut self) -> Receiver<DispatchedEvent> {
        let (sender, receiver) = channel::unbounded();
        self.event_listeners.push(sender);
        receiver
    }

    // === Clipboard ===

    /// Write `text/plain` to the system clipboard (last writer wins)
    pub fn write_clipboard(&mut self, text: &str) -> DomResult<()> {
        if !self.clipboard_allowed {
            return Err(DomError::ClipboardDenied);
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    /// Current clipboard contents
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Grant or revoke clipboard-write permission
    pub fn set_clipboard_allowed(&mut self, allowed: bool) {
        self.clipboard_allowed = allowed;
    }

    // === Observers ===

    /// Observe child-list mutations under `target`
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> DomResult<MutationSubscription> {
        let node = self.tree.get(target).ok_or(DomError::NotFound)?;
        if node.is_text() {
            return Err(DomError::InvalidObserverTarget);
        }
        Ok(self.observers.observe(target, options))
    }

    /// Stop an observer
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.disconnect(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(doc: &mut Document, policy: EditingPolicy, prefill: &str) -> NodeId {
        let body = doc.body();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        if !prefill.is_empty() {
            let text = doc.create_text(prefill);
            doc.append_child(div, text).unwrap();
        }
        doc.make_editable(div, policy).unwrap();
        div
    }

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("https://x.com/home");
        assert_eq!(doc.url(), "https://x.com/home");
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert!(doc.tree().is_connected(doc.body()));
    }

    #[test]
    fn test_locked_editor_ignores_direct_writes() {
        let mut doc = Document::default();
        let div = editor(&mut doc, EditingPolicy::locked(), "draft");
        let child = doc.tree().child_ids(div)[0];

        doc.remove_child(div, child).unwrap();
        doc.set_text_content(div, "hello").unwrap();
        assert_eq!(doc.text_content(div), "draft");

        doc.focus(div).unwrap();
        assert!(!doc.exec_command(EditCommand::InsertText, Some("hello")));
        assert!(!doc.dispatch_event(div, HostEvent::paste("hello")).unwrap());
        assert_eq!(doc.text_content(div), "draft");
    }

    #[test]
    fn test_command_only_editor() {
        let mut doc = Document::default();
        let div = editor(&mut doc, EditingPolicy::command_only(), "");

        doc.set_text_content(div, "direct").unwrap();
        assert_eq!(doc.text_content(div), "");

        assert!(!doc.exec_command(EditCommand::InsertText, Some("hello")));
        doc.focus(div).unwrap();
        assert!(doc.exec_command(EditCommand::InsertText, Some("hello")));
        assert_eq!(doc.text_content(div), "hello");
        assert!(doc.exec_command(EditCommand::Delete, None));
        assert_eq!(doc.text_content(div), "");
    }

    #[test]
    fn test_paste_respects_max_len() {
        let mut doc = Document::default();
        let div = editor(&mut doc, EditingPolicy::cooperative().with_max_len(5), "");

        assert!(doc.dispatch_event(div, HostEvent::paste("hello world")).unwrap());
        assert_eq!(doc.text_content(div), "hello");
    }

    #[test]
    fn test_hidden_and_detached_rects_are_zero() {
        let mut doc = Document::default();
        let body = doc.body();
        let dialog = doc.element("div", &[("role", "dialog")]);
        doc.set_rect(dialog, DOMRect::from_xywh(0.0, 0.0, 600.0, 400.0)).unwrap();
        assert!(!doc.bounding_client_rect(dialog).has_area());

        doc.append_child(body, dialog).unwrap();
        assert!(doc.bounding_client_rect(dialog).has_area());

        doc.set_attribute(body, "hidden", "").unwrap();
        assert!(!doc.bounding_client_rect(dialog).has_area());
    }

    #[test]
    fn test_clipboard_permission() {
        let mut doc = Document::default();
        doc.write_clipboard("one").unwrap();
        doc.write_clipboard("two").unwrap();
        assert_eq!(doc.clipboard(), Some("two"));

        doc.set_clipboard_allowed(false);
        assert_eq!(doc.write_clipboard("three"), Err(DomError::ClipboardDenied));
        assert_eq!(doc.clipboard(), Some("two"));
    }

    #[test]
    fn test_event_listeners_receive_dispatches() {
        let mut doc = Document::default();
        let events = doc.subscribe_events();
        let body = doc.body();
        doc.click(body).unwrap();

        let seen = events.try_recv().unwrap();
        assert_eq!(seen.target, body);
        assert_eq!(seen.event, HostEvent::Click);
        assert_eq!(doc.event_log().len(), 1);
    }

    #[test]
    fn test_mutations_reach_observer() {
        let mut doc = Document::default();
        let body = doc.body();
        let sub = doc.observe(body, MutationObserverInit::default()).unwrap();

        let a = doc.create_element("article");
        let b = doc.create_element("article");
        doc.append_children(body, &[a, b]).unwrap();
        let batch = sub.records.try_recv().unwrap();
        assert_eq!(batch[0].added_nodes, vec![a, b]);

        doc.remove_child(body, a).unwrap();
        let batch = sub.records.try_recv().unwrap();
        assert_eq!(batch[0].removed_nodes, vec![a]);
    }
}
