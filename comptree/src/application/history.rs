//! Bounded revision history over store values.
//!
//! Since every `TreeStore` is an independent value, undo and redo only move a
//! cursor; no operation is ever reversed.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::application::error::ApplicationResult;
use crate::config::HistorySettings;
use crate::domain::{DomainResult, TreeStore};

/// A labelled store version.
#[derive(Debug, Clone)]
pub struct Revision {
    pub label: String,
    pub store: TreeStore,
    pub recorded_at: DateTime<Utc>,
}

impl Revision {
    fn new(label: impl Into<String>, store: TreeStore) -> Self {
        Self {
            label: label.into(),
            store,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    revisions: VecDeque<Revision>,
    cursor: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: TreeStore, settings: &HistorySettings) -> Self {
        let mut revisions = VecDeque::new();
        revisions.push_back(Revision::new("initial", initial));
        Self {
            revisions,
            cursor: 0,
            limit: settings.limit.max(1),
        }
    }

    pub fn current(&self) -> &TreeStore {
        &self.revisions[self.cursor].store
    }

    pub fn current_revision(&self) -> &Revision {
        &self.revisions[self.cursor]
    }

    /// Record `store` as the new current version, discarding any redo tail.
    #[instrument(level = "debug", skip(self, store))]
    pub fn commit(&mut self, label: &str, store: TreeStore) {
        self.revisions.truncate(self.cursor + 1);
        self.revisions.push_back(Revision::new(label, store));
        while self.revisions.len() > self.limit {
            if let Some(dropped) = self.revisions.pop_front() {
                debug!(label = %dropped.label, "history limit reached, dropping oldest revision");
            }
        }
        self.cursor = self.revisions.len() - 1;
    }

    /// Run `op` against the current store and commit its result.
    ///
    /// Nothing is recorded when `op` fails.
    pub fn apply<F>(&mut self, label: &str, op: F) -> ApplicationResult<&TreeStore>
    where
        F: FnOnce(&TreeStore) -> DomainResult<TreeStore>,
    {
        let next = op(self.current())?;
        self.commit(label, next);
        Ok(self.current())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> Option<&TreeStore> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn redo(&mut self) -> Option<&TreeStore> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.revisions.len()
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn revisions(&self) -> impl Iterator<Item = &Revision> {
        self.revisions.iter()
    }
}
