//! Quill DOM - in-memory host page
//!
//! Arena-based DOM tree carrying the parts of a live page the engine
//! depends on: selector queries, layout rects, mutation observers, host
//! events, framework-controlled editors and the system clipboard.

use std::cell::RefCell;
use std::rc::Rc;

mod node;
mod tree;
mod document;
mod geometry;
mod selector;
mod events;
mod observer;
mod editing;
mod error;
pub mod simulate;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::DomTree;
pub use document::Document;
pub use geometry::DOMRect;
pub use selector::{Selector, AttrOp};
pub use events::{HostEvent, InputType, DispatchedEvent};
pub use observer::{MutationRecord, MutationType, MutationObserverInit, MutationSubscription, ObserverId};
pub use editing::{EditCommand, EditingPolicy};
pub use error::{DomError, DomResult, SelectorError};

/// Document handle shared between the page and its observers
pub type SharedDocument = Rc<RefCell<Document>>;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
