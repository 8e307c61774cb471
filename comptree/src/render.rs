//! Render a store hierarchy as a `termtree` for display.

use termtree::Tree;
use tracing::instrument;

use crate::config::RenderSettings;
use crate::domain::{Component, TreeStore};

/// Marker leaf standing in for children cut off by `max_depth`.
pub const ELIDED: &str = "…";

pub trait TreeRender {
    fn to_tree(&self, root: &Component, settings: &RenderSettings) -> Tree<String>;
}

impl TreeRender for TreeStore {
    #[instrument(level = "debug", skip(self))]
    fn to_tree(&self, root: &Component, settings: &RenderSettings) -> Tree<String> {
        let max_depth = settings.max_depth.map(|d| d.max(1));
        build(self, root, settings, max_depth, 1)
    }
}

fn build(
    store: &TreeStore,
    node: &Component,
    settings: &RenderSettings,
    max_depth: Option<usize>,
    level: usize,
) -> Tree<String> {
    let mut tree = Tree::new(label(node, settings));
    let children = store.children(node);
    if children.is_empty() {
        return tree;
    }

    if max_depth.is_some_and(|max| level >= max) {
        tree.push(Tree::new(ELIDED.to_string()));
        return tree;
    }

    for child in children.iter() {
        tree.push(build(store, child, settings, max_depth, level + 1));
    }
    tree
}

fn label(component: &Component, settings: &RenderSettings) -> String {
    let mut label = component.name().to_string();
    if component.is_folder() {
        label.push('/');
    }
    if settings.show_ids {
        label.push_str(&format!(" [{}]", component.id()));
    }
    label
}
