//! Session - state of one engine lifecycle

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use quill_dom::NodeId;

use crate::ContentItem;

/// Session handle shared by the watcher, the flows and the engine
pub type SharedSession = Rc<RefCell<Session>>;

/// Selected item, last reply, helper text and the augmentation controls
#[derive(Debug, Default)]
pub struct Session {
    selected: Option<ContentItem>,
    last_reply: Option<String>,
    helper_text: String,
    controls: HashMap<NodeId, ContentItem>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedSession {
        Rc::new(RefCell::new(self))
    }

    /// Make `item` the target of the next flow
    pub fn select(&mut self, item: ContentItem) {
        self.selected = Some(item);
    }

    pub fn selected(&self) -> Option<&ContentItem> {
        self.selected.as_ref()
    }

    pub fn set_last_reply(&mut self, reply: &str) {
        self.last_reply = Some(reply.to_string());
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    pub fn helper_text(&self) -> &str {
        &self.helper_text
    }

    /// Extra guidance sent along with the next generation request
    pub fn set_helper_text(&mut self, text: &str) {
        self.helper_text = text.to_string();
    }

    /// Remember which item an augmentation control belongs to
    pub fn register_control(&mut self, control: NodeId, item: ContentItem) {
        self.controls.insert(control, item);
    }

    /// Forget every control for which `keep` is false; returns how many went
    pub fn retain_controls(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.controls.len();
        self.controls.retain(|&control, _| keep(control));
        before - self.controls.len()
    }

    pub fn item_for_control(&self, control: NodeId) -> Option<&ContentItem> {
        self.controls.get(&control)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}
