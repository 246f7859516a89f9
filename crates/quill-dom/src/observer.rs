//! Mutation Observers
//!
//! Child-list mutations are delivered as record batches over a channel, so
//! an observer drains them from its own task instead of re-entering the
//! document from inside a mutation.

use smol::channel::{self, Receiver, Sender};

use crate::{DomTree, NodeId};

/// Observer registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Copy)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub subtree: bool,
}

impl Default for MutationObserverInit {
    fn default() -> Self {
        Self {
            child_list: true,
            subtree: true,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    ChildList,
}

impl MutationRecord {
    pub fn added(target: NodeId, nodes: Vec<NodeId>, previous_sibling: Option<NodeId>, next_sibling: Option<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: nodes,
            removed_nodes: Vec::new(),
            previous_sibling,
            next_sibling,
        }
    }

    pub fn removed(target: NodeId, node: NodeId, previous_sibling: Option<NodeId>, next_sibling: Option<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: Vec::new(),
            removed_nodes: vec![node],
            previous_sibling,
            next_sibling,
        }
    }
}

/// Live subscription returned by `Document::observe`
#[derive(Debug)]
pub struct MutationSubscription {
    pub id: ObserverId,
    pub records: Receiver<Vec<MutationRecord>>,
}

#[derive(Debug)]
struct Registration {
    id: ObserverId,
    target: NodeId,
    options: MutationObserverInit,
    sender: Sender<Vec<MutationRecord>>,
}

/// Registered observers of one document
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    next_id: u32,
    registrations: Vec<Registration>,
}

impl ObserverRegistry {
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> MutationSubscription {
        let (sender, records) = channel::unbounded();
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            target,
            options,
            sender,
        });
        MutationSubscription { id, records }
    }

    /// Drop a registration; its receiver sees the channel close
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Queue a record for every observer whose scope covers its target
    pub fn notify(&mut self, tree: &DomTree, record: &MutationRecord) {
        self.registrations.retain(|reg| {
            if !reg.options.child_list {
                return true;
            }
            let in_scope = reg.target == record.target
                || (reg.options.subtree && tree.is_inclusive_ancestor(reg.target, record.target));
            if !in_scope {
                return true;
            }
            match reg.sender.try_send(vec![record.clone()]) {
                Ok(()) => true,
                Err(_) => {
                    tracing::trace!(observer = reg.id.0, "dropping closed mutation observer");
                    false
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_and_disconnect() {
        let mut tree = DomTree::new();
        let feed = tree.create_element("div");
        let other = tree.create_element("div");
        tree.append_child(NodeId::ROOT, feed).unwrap();
        tree.append_child(NodeId::ROOT, other).unwrap();

        let mut registry = ObserverRegistry::default();
        let sub = registry.observe(feed, MutationObserverInit::default());

        registry.notify(&tree, &MutationRecord::added(other, vec![], None, None));
        assert!(sub.records.try_recv().is_err());

        registry.notify(&tree, &MutationRecord::added(feed, vec![other], None, None));
        assert_eq!(sub.records.try_recv().unwrap()[0].added_nodes, vec![other]);

        assert!(registry.disconnect(sub.id));
        assert!(sub.records.is_closed());
    }

    #[test]
    fn test_closed_receiver_is_pruned() {
        let tree = DomTree::new();
        let mut registry = ObserverRegistry::default();
        let sub = registry.observe(NodeId::ROOT, MutationObserverInit::default());
        drop(sub);

        registry.notify(&tree, &MutationRecord::added(NodeId::ROOT, vec![], None, None));
        assert_eq!(registry.len(), 0);
    }
}
