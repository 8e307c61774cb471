//! Domain layer: components, observers and the persistent tree store
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod component;
pub mod error;
pub mod observer;
pub mod store;
pub mod walk;

pub use component::{Component, ComponentId, ComponentKind};
pub use error::{DomainError, DomainResult};
pub use observer::{ComponentObserver, Notification, ObserverHandle, RecordingObserver};
pub use store::TreeStore;
pub use walk::{PostOrder, PreOrder};
