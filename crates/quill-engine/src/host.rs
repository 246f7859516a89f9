//! Host page seam
//!
//! Everything the engine does to a page goes through `HostPage`, so the same
//! components drive the in-memory document or a remote browser backend.

use quill_dom::{
    DOMRect, DispatchedEvent, DomError, HostEvent, MutationSubscription, NodeId, ObserverId, Selector,
};
use smol::channel::Receiver;

/// Result of a fallible host operation
pub type HostResult<T> = Result<T, DomError>;

/// A live page the engine can query, mutate and observe.
///
/// Handles are cheap clones of one underlying page. Implementations must not
/// hold internal borrows across calls: the engine interleaves calls from
/// several cooperative tasks.
pub trait HostPage: Clone + 'static {
    // === Query ===

    /// Document node
    fn root(&self) -> NodeId;

    /// Address of the page, used to resolve relative links
    fn url(&self) -> String;

    /// Descendants of `scope` matching `selector`, in document order
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// First descendant of `scope` matching `selector`
    fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool;

    /// Descendants of `node` in document order, excluding `node`
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `node` is attached to the document
    fn is_connected(&self, node: NodeId) -> bool;

    // === Read ===

    fn bounding_rect(&self, node: NodeId) -> DOMRect;

    /// Rendered with a non-zero box
    fn is_visible(&self, node: NodeId) -> bool {
        self.bounding_rect(node).has_area()
    }

    fn text_content(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    // === Write ===

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> HostResult<()>;

    /// Create a detached element carrying `attrs`
    fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId;

    fn insert_before(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> HostResult<()>;

    fn remove_child(&self, parent: NodeId, child: NodeId) -> HostResult<()>;

    fn set_text_content(&self, node: NodeId, text: &str) -> HostResult<()>;

    // === Events ===

    fn focus(&self, node: NodeId) -> HostResult<()>;

    fn click(&self, node: NodeId) -> HostResult<()>;

    /// Dispatch `event` at `node`; `Ok(false)` if its default action was suppressed
    fn dispatch(&self, node: NodeId, event: HostEvent) -> HostResult<bool>;

    /// Legacy `execCommand("insertText")` against the focused control
    fn exec_insert_text(&self, text: &str) -> bool;

    /// Stream of events dispatched from now on
    fn events(&self) -> Receiver<DispatchedEvent>;

    // === Clipboard ===

    fn write_clipboard(&self, text: &str) -> HostResult<()>;

    // === Mutations ===

    /// Subscribe to child-list mutations of the subtree under `target`
    fn observe(&self, target: NodeId) -> HostResult<MutationSubscription>;

    fn disconnect(&self, id: ObserverId);
}
