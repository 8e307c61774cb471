//! Depth-first traversal over a store's hierarchy.
//!
//! Walks follow children lists as stored, so a component listed twice is
//! visited twice. A store containing a cycle never terminates.

use tracing::instrument;

use crate::domain::component::Component;
use crate::domain::store::TreeStore;

impl TreeStore {
    /// Pre-order walk starting at (and including) `root`.
    pub fn descendants(&self, root: &Component) -> PreOrder<'_> {
        PreOrder::new(self, root)
    }

    /// Post-order walk ending at `root`.
    pub fn post_order(&self, root: &Component) -> PostOrder<'_> {
        PostOrder::new(self, root)
    }

    /// Number of levels below and including `root`; a leaf has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, root: &Component) -> usize {
        1 + self
            .children(root)
            .iter()
            .map(|child| self.depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Components under `root` with no children, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, root: &Component) -> Vec<Component> {
        self.descendants(root)
            .filter(|c| self.children(c).is_empty())
            .collect()
    }
}

pub struct PreOrder<'a> {
    store: &'a TreeStore,
    stack: Vec<Component>,
}

impl<'a> PreOrder<'a> {
    fn new(store: &'a TreeStore, root: &Component) -> Self {
        Self {
            store,
            stack: vec![root.clone()],
        }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Reverse push keeps left-to-right order
        for child in self.store.children(&current).iter().rev() {
            self.stack.push(child.clone());
        }
        Some(current)
    }
}

pub struct PostOrder<'a> {
    store: &'a TreeStore,
    stack: Vec<(Component, bool)>,
}

impl<'a> PostOrder<'a> {
    fn new(store: &'a TreeStore, root: &Component) -> Self {
        Self {
            store,
            stack: vec![(root.clone(), false)],
        }
    }
}

impl Iterator for PostOrder<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return Some(current);
            }
            let children = self.store.children(&current);
            self.stack.push((current, true));
            for child in children.iter().rev() {
                self.stack.push((child.clone(), false));
            }
        }
        None
    }
}
