//! Incremental item watcher
//!
//! Visits every feed item once: a full scan at start, then every item that
//! arrives through child-list mutations, including items nested inside an
//! appended subtree. The augmentation mark makes a second visit a no-op.
//! An item is only marked once its content can be extracted, so a shell
//! item whose text renders later is picked up when that text arrives.

use quill_dom::{MutationSubscription, NodeId, ObserverId};
use smol::{LocalExecutor, Task};

use crate::{is_augmented, mark_augmented, ContentItem, HostPage, HostResult, ItemMatcher};

/// Walks candidate nodes and hands unmarked items to the callback
struct Visitor<H, M, F> {
    host: H,
    matcher: M,
    on_match: F,
}

impl<H, M, F> Visitor<H, M, F>
where
    H: HostPage,
    M: ItemMatcher,
    F: FnMut(ContentItem),
{
    /// Visit every item under `root`; returns how many were new
    fn scan(&mut self, root: NodeId) -> usize {
        let candidates: Vec<NodeId> = self
            .host
            .descendants(root)
            .into_iter()
            .filter(|&node| self.matcher.is_item(&self.host, node))
            .collect();
        candidates.into_iter().filter(|&node| self.visit(node)).count()
    }

    /// An added node is an item itself, may complete an enclosing item, or
    /// may contain items
    fn visit_added(&mut self, node: NodeId) {
        if !self.host.is_connected(node) {
            return;
        }
        if self.matcher.is_item(&self.host, node) {
            self.visit(node);
            return;
        }
        if let Some(item) = self.enclosing_item(node) {
            self.visit(item);
        }
        self.scan(node);
    }

    fn enclosing_item(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.host.parent(node);
        while let Some(ancestor) = current {
            if self.matcher.is_item(&self.host, ancestor) {
                return Some(ancestor);
            }
            current = self.host.parent(ancestor);
        }
        None
    }

    fn visit(&mut self, node: NodeId) -> bool {
        if is_augmented(&self.host, node) {
            return false;
        }
        let Some(item) = self.matcher.extract(&self.host, node) else {
            tracing::debug!(?node, "item has no readable text yet");
            return false;
        };
        if let Err(e) = mark_augmented(&self.host, node) {
            tracing::warn!(?node, error = %e, "could not mark item");
            return false;
        }
        tracing::trace!(?node, url = ?item.url, "item matched");
        (self.on_match)(item);
        true
    }
}

/// Watches a subtree for feed items until stopped or dropped
pub struct ItemWatcher<H: HostPage> {
    host: H,
    observer: Option<ObserverId>,
    task: Option<Task<()>>,
}

impl<H: HostPage> ItemWatcher<H> {
    /// Scan `root`, then keep visiting items as they are added.
    ///
    /// `on_match` runs synchronously for each new item and is never awaited;
    /// it may spawn its own work.
    pub fn start<M, F>(
        host: H,
        executor: &LocalExecutor<'static>,
        root: NodeId,
        matcher: M,
        on_match: F,
    ) -> HostResult<Self>
    where
        M: ItemMatcher + 'static,
        F: FnMut(ContentItem) + 'static,
    {
        let mut visitor = Visitor {
            host: host.clone(),
            matcher,
            on_match,
        };
        let found = visitor.scan(root);
        tracing::info!(found, "initial item scan complete");

        let MutationSubscription { id, records } = host.observe(root)?;
        let task = executor.spawn(async move {
            while let Ok(batch) = records.recv().await {
                for record in batch {
                    for node in record.added_nodes {
                        visitor.visit_added(node);
                    }
                }
            }
            tracing::debug!("mutation stream closed");
        });

        Ok(Self {
            host,
            observer: Some(id),
            task: Some(task),
        })
    }

    /// Disconnect from the page and cancel pending work. Marks stay in place.
    pub fn stop(&mut self) {
        if let Some(id) = self.observer.take() {
            self.host.disconnect(id);
            tracing::debug!("item watcher stopped");
        }
        // Dropping the task cancels it
        drop(self.task.take());
    }

    pub fn is_running(&self) -> bool {
        self.observer.is_some()
    }
}

impl<H: HostPage> Drop for ItemWatcher<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
