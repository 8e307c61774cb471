//! Tree components: files, folders and the opaque fallback variant.

use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};

/// Process-wide unique identity of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Uuid);

impl ComponentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variant-specific payload of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    File {
        /// Size in bytes, informational only
        size: u64,
    },
    Folder,
    /// A kind this crate cannot rebuild under a new name.
    Opaque {
        /// Free-form label of the foreign kind
        tag: String,
    },
}

/// A named node in the tree.
///
/// Equality and hashing use the id only: two values with the same id are the
/// same component even if their names differ.
#[derive(Debug, Clone)]
pub struct Component {
    id: ComponentId,
    name: String,
    kind: ComponentKind,
}

impl Component {
    pub fn file(name: impl Into<String>) -> Self {
        Self::file_with_size(name, 0)
    }

    pub fn file_with_size(name: impl Into<String>, size: u64) -> Self {
        Self::with_kind(name, ComponentKind::File { size })
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::with_kind(name, ComponentKind::Folder)
    }

    pub fn opaque(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::with_kind(name, ComponentKind::Opaque { tag: tag.into() })
    }

    fn with_kind(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: ComponentId::new(),
            name: name.into(),
            kind,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ComponentKind::File { .. })
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ComponentKind::Folder)
    }

    /// Copy of this component under a new name, keeping id and payload.
    ///
    /// # Errors
    /// `InvalidArgument` for `Opaque` components.
    pub fn with_name(&self, name: impl Into<String>) -> DomainResult<Self> {
        let kind = match &self.kind {
            ComponentKind::File { size } => ComponentKind::File { size: *size },
            ComponentKind::Folder => ComponentKind::Folder,
            ComponentKind::Opaque { tag } => {
                return Err(DomainError::InvalidArgument(format!(
                    "cannot rename component '{}' of unrecognized kind '{}'",
                    self.name, tag
                )));
            }
        };
        Ok(Self {
            id: self.id,
            name: name.into(),
            kind,
        })
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_components_with_same_name_when_compared_then_not_equal() {
        let a = Component::file("a.txt");
        let b = Component::file("a.txt");
        assert_ne!(a, b);
    }

    #[test]
    fn given_file_when_renamed_then_keeps_id_and_size() {
        let file = Component::file_with_size("a.txt", 42);
        let renamed = file.with_name("b.txt").unwrap();

        assert_eq!(renamed, file);
        assert_eq!(renamed.name(), "b.txt");
        assert_eq!(renamed.kind(), &ComponentKind::File { size: 42 });
    }

    #[test]
    fn given_folder_when_renamed_then_stays_folder() {
        let folder = Component::folder("src");
        let renamed = folder.with_name("lib").unwrap();
        assert!(renamed.is_folder());
        assert_eq!(renamed.id(), folder.id());
    }

    #[test]
    fn given_opaque_component_when_renamed_then_invalid_argument() {
        let link = Component::opaque("current", "symlink");
        let err = link.with_name("latest").unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(err.to_string().contains("symlink"));
    }
}
