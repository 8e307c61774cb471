//! Persistent, structurally-shared tree of files and folders.
//!
//! A [`TreeStore`] maps each parent to its ordered children and keeps a
//! per-component observer registry. Every mutation returns a new store;
//! earlier stores stay valid and unchanged.
//!
//! ```
//! use comptree::{Component, TreeStore};
//!
//! let root = Component::folder("root");
//! let readme = Component::file("README.md");
//!
//! let v1 = TreeStore::new().add(&root, readme.clone());
//! let v2 = v1.rename(&readme, "README.txt").unwrap();
//!
//! assert_eq!(v1.children(&root)[0].name(), "README.md");
//! assert_eq!(v2.children(&root)[0].name(), "README.txt");
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod render;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, History, Revision};
pub use config::{HistorySettings, RenderSettings, Settings, StoreSettings};
pub use domain::{
    Component, ComponentId, ComponentKind, ComponentObserver, DomainError, DomainResult,
    Notification, ObserverHandle, RecordingObserver, TreeStore,
};
pub use render::TreeRender;
