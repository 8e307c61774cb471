//! Persistent tree store.
//!
//! Every mutating operation returns a new `TreeStore`; the receiver is never
//! modified. Both maps are `im` collections, so a new version shares all
//! untouched nodes with the version it was derived from.

use im::{HashMap, Vector};
use itertools::Itertools;
use tracing::{debug, instrument, trace, warn};

use crate::config::StoreSettings;
use crate::domain::component::{Component, ComponentId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::observer::ObserverHandle;

#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    children_of: HashMap<ComponentId, Vector<Component>>,
    observers_of: HashMap<ComponentId, Vector<ObserverHandle>>,
    settings: StoreSettings,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> StoreSettings {
        self.settings
    }

    /// Same content, different settings.
    pub fn with_settings(&self, settings: StoreSettings) -> Self {
        Self {
            settings,
            ..self.clone()
        }
    }

    /// Children of `component` in insertion order; empty when it has none.
    #[instrument(level = "trace", skip(self))]
    pub fn children(&self, component: &Component) -> Vector<Component> {
        self.children_of
            .get(&component.id())
            .cloned()
            .unwrap_or_default()
    }

    pub fn observers(&self, component: &Component) -> Vector<ObserverHandle> {
        self.observers_of
            .get(&component.id())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `component` has a children entry, even an empty one.
    pub fn contains_parent(&self, component: &Component) -> bool {
        self.children_of.contains_key(&component.id())
    }

    pub fn parent_count(&self) -> usize {
        self.children_of.len()
    }

    /// No children and no observers anywhere; emptied lists count as absent.
    pub fn is_empty(&self) -> bool {
        self.children_of.values().all(|children| children.is_empty())
            && self.observers_of.values().all(|observers| observers.is_empty())
    }

    /// Append `child` to the end of `parent`'s children. Duplicates are kept.
    #[instrument(level = "trace", skip(self))]
    pub fn add(&self, parent: &Component, child: Component) -> Self {
        let mut next = self.clone();
        next.push_child(parent, child);
        next
    }

    pub fn add_all<I>(&self, parent: &Component, children: I) -> Self
    where
        I: IntoIterator<Item = Component>,
    {
        let mut next = self.clone();
        for child in children {
            next.push_child(parent, child);
        }
        next
    }

    /// Remove `component` together with its whole subtree.
    ///
    /// Descendants go first. For every removed component its observers are
    /// notified before it disappears, then its own children entry is dropped
    /// and it is purged from every remaining children list.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&self, component: &Component) -> Self {
        let mut next = self.clone();
        next.remove_subtree(component);
        next
    }

    /// Same as [`TreeStore::remove`].
    pub fn delete(&self, component: &Component) -> Self {
        self.remove(component)
    }

    /// Swap `old` for `new` everywhere it appears; `old`'s children move
    /// under `new` unchanged. Descendants are not touched.
    #[instrument(level = "trace", skip(self))]
    pub fn replace(&self, old: &Component, new: Component) -> Self {
        self.dispatch(old, Some(&new));

        let mut next = self.clone();
        if let Some(children) = next.children_of.remove(&old.id()) {
            next.children_of.insert(new.id(), children);
        }

        let old_id = old.id();
        let affected = next.parents_holding(old_id);
        for parent_id in affected {
            if let Some(children) = next.children_of.get_mut(&parent_id) {
                for slot in children.iter_mut().filter(|c| c.id() == old_id) {
                    *slot = new.clone();
                }
            }
        }
        debug!(old = %old, new = %new, "replaced component");
        next
    }

    /// Replace `component` with a copy named `new_name`.
    ///
    /// # Errors
    /// `InvalidArgument` if the component's kind cannot be renamed.
    #[instrument(level = "trace", skip(self))]
    pub fn rename(&self, component: &Component, new_name: &str) -> DomainResult<Self> {
        let renamed = component.with_name(new_name)?;
        Ok(self.replace(component, renamed))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn attach(&self, component: &Component, observer: ObserverHandle) -> Self {
        let mut next = self.clone();
        next.observers_of
            .entry(component.id())
            .or_default()
            .push_back(observer);
        next
    }

    /// Drop the first registration of `observer` for `component`.
    ///
    /// # Errors
    /// `NotFound` if `component` has no observer list at all. A list that
    /// exists but lacks `observer` is a no-op unless `strict_detach` is set.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&self, component: &Component, observer: &ObserverHandle) -> DomainResult<Self> {
        let id = component.id();
        let observers = self.observers_of.get(&id).ok_or_else(|| {
            DomainError::NotFound(format!("no observers registered for '{}' ({})", component, id))
        })?;

        match observers.iter().position(|o| o == observer) {
            Some(index) => {
                let mut remaining = observers.clone();
                remaining.remove(index);
                let mut next = self.clone();
                next.observers_of.insert(id, remaining);
                Ok(next)
            }
            None if self.settings.strict_detach => Err(DomainError::NotFound(format!(
                "observer {:?} is not attached to '{}' ({})",
                observer, component, id
            ))),
            None => {
                warn!(component = %component, "detach: observer not attached, ignoring");
                Ok(self.clone())
            }
        }
    }

    fn push_child(&mut self, parent: &Component, child: Component) {
        trace!(parent = %parent, child = %child, "adding child");
        self.children_of
            .entry(parent.id())
            .or_default()
            .push_back(child);
    }

    fn remove_subtree(&mut self, component: &Component) {
        let children = self.children(component);
        if !children.is_empty() {
            trace!(component = %component, children = %self.describe_children(component), "removing descendants");
        }
        // Each pass purges every occurrence of the removed child, so a
        // duplicated child is removed and notified once
        while let Some(child) = self.children(component).head().cloned() {
            self.remove_subtree(&child);
        }

        self.dispatch(component, None);
        self.children_of.remove(&component.id());
        self.purge(component.id());
        debug!(component = %component, "removed component");
    }

    fn purge(&mut self, id: ComponentId) {
        for parent_id in self.parents_holding(id) {
            if let Some(children) = self.children_of.get_mut(&parent_id) {
                children.retain(|c| c.id() != id);
            }
        }
    }

    fn parents_holding(&self, id: ComponentId) -> Vec<ComponentId> {
        self.children_of
            .iter()
            .filter(|(_, children)| children.iter().any(|c| c.id() == id))
            .map(|(parent_id, _)| *parent_id)
            .collect()
    }

    fn dispatch(&self, old: &Component, new: Option<&Component>) {
        let Some(observers) = self.observers_of.get(&old.id()) else {
            return;
        };
        debug!(
            component = %old,
            replacement = %new.map(Component::name).unwrap_or("<removed>"),
            observers = observers.len(),
            "notifying observers"
        );
        for observer in observers.iter() {
            observer.notify(old, new);
        }
    }

    fn describe_children(&self, component: &Component) -> String {
        self.children(component).iter().map(Component::name).join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fresh_store_when_querying_children_then_empty() {
        let store = TreeStore::new();
        assert!(store.children(&Component::folder("any")).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn given_parent_when_adding_twice_then_children_in_append_order() {
        let parent = Component::folder("p");
        let a = Component::file("a");
        let b = Component::file("b");

        let store = TreeStore::new().add(&parent, a.clone()).add(&parent, b.clone());

        assert_eq!(store.children(&parent), im::vector![a, b]);
        assert_eq!(store.describe_children(&parent), "a, b");
    }

    #[test]
    fn given_store_when_adding_then_original_unchanged() {
        let parent = Component::folder("p");
        let before = TreeStore::new().add(&parent, Component::file("a"));
        let after = before.add(&parent, Component::file("b"));

        assert_eq!(before.children(&parent).len(), 1);
        assert_eq!(after.children(&parent).len(), 2);
    }

    #[test]
    fn given_duplicate_child_when_added_then_both_entries_kept() {
        let parent = Component::folder("p");
        let a = Component::file("a");
        let store = TreeStore::new().add_all(&parent, vec![a.clone(), a.clone()]);
        assert_eq!(store.children(&parent), im::vector![a.clone(), a]);
    }

    #[test]
    fn given_child_under_two_parents_when_removed_then_purged_from_both() {
        let p1 = Component::folder("p1");
        let p2 = Component::folder("p2");
        let c = Component::file("c");
        let other = Component::file("other");

        let store = TreeStore::new()
            .add_all(&p1, vec![c.clone(), other.clone()])
            .add(&p2, c.clone());
        let removed = store.remove(&c);

        assert_eq!(removed.children(&p1), im::vector![other]);
        assert!(removed.children(&p2).is_empty());
        assert_eq!(store.children(&p2), im::vector![c]);
    }

    #[test]
    fn given_node_with_children_when_replaced_then_subtree_moves_to_new_key() {
        let p = Component::folder("p");
        let old = Component::folder("old");
        let new = Component::folder("new");
        let x = Component::file("x");

        let store = TreeStore::new().add(&p, old.clone()).add(&old, x.clone());
        let replaced = store.replace(&old, new.clone());

        assert_eq!(replaced.children(&p), im::vector![new.clone()]);
        assert_eq!(replaced.children(&new), im::vector![x]);
        assert!(!replaced.contains_parent(&old));
        assert!(store.contains_parent(&old));
    }

    #[test]
    fn given_attach_then_detach_when_checking_emptiness_then_empty() {
        let c = Component::file("c");
        let handle = ObserverHandle::new(|_: &Component, _: Option<&Component>| {});

        let attached = TreeStore::new().attach(&c, handle.clone());
        assert!(!attached.is_empty());

        let detached = attached.detach(&c, &handle).unwrap();
        assert!(detached.is_empty());
    }

    #[test]
    fn given_only_child_when_removed_then_store_empty() {
        let p = Component::folder("p");
        let c = Component::file("c");
        let store = TreeStore::new().add(&p, c.clone()).remove(&c);
        assert!(store.is_empty());
        assert!(store.contains_parent(&p));
    }

    #[test]
    fn given_strict_settings_when_detaching_unknown_observer_then_not_found() {
        let c = Component::file("c");
        let attached = ObserverHandle::new(|_: &Component, _: Option<&Component>| {});
        let stranger = ObserverHandle::new(|_: &Component, _: Option<&Component>| {});

        let lenient = TreeStore::new().attach(&c, attached.clone());
        assert!(lenient.detach(&c, &stranger).is_ok());

        let strict = lenient.with_settings(StoreSettings {
            strict_detach: true,
        });
        assert!(matches!(
            strict.detach(&c, &stranger),
            Err(DomainError::NotFound(_))
        ));
        assert!(strict.detach(&c, &attached).is_ok());
    }
}
