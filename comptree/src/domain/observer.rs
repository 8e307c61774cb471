//! Change notification for individual components.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::component::Component;

/// Receives replace/remove events for the component it is attached to.
///
/// `new` is `None` when the component was removed.
pub trait ComponentObserver: Send + Sync {
    fn notify(&self, old: &Component, new: Option<&Component>);
}

impl<F> ComponentObserver for F
where
    F: Fn(&Component, Option<&Component>) + Send + Sync,
{
    fn notify(&self, old: &Component, new: Option<&Component>) {
        self(old, new)
    }
}

/// Shared, cheaply clonable reference to a registered observer.
///
/// Two handles are equal when they point at the same observer allocation.
#[derive(Clone)]
pub struct ObserverHandle(Arc<dyn ComponentObserver>);

impl ObserverHandle {
    pub fn new<O: ComponentObserver + 'static>(observer: O) -> Self {
        Self(Arc::new(observer))
    }

    pub fn from_arc(observer: Arc<dyn ComponentObserver>) -> Self {
        Self(observer)
    }

    pub fn notify(&self, old: &Component, new: Option<&Component>) {
        self.0.notify(old, new)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl<O: ComponentObserver + 'static> From<Arc<O>> for ObserverHandle {
    fn from(observer: Arc<O>) -> Self {
        Self(observer)
    }
}

impl PartialEq for ObserverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ObserverHandle {}

impl fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverHandle({:p})", self.addr())
    }
}

/// One received notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub old: Component,
    pub new: Option<Component>,
}

impl Notification {
    pub fn is_removal(&self) -> bool {
        self.new.is_none()
    }
}

/// Observer that keeps every notification it receives, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    received: Mutex<Vec<Notification>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn removals(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.is_removal())
            .count()
    }
}

impl ComponentObserver for RecordingObserver {
    fn notify(&self, old: &Component, new: Option<&Component>) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                old: old.clone(),
                new: new.cloned(),
            });
    }
}
