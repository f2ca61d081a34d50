use std::fmt;

/// An offset-based reference to an entity of a panda file.
///
/// Classes, methods, code blocks, literal arrays and strings are all addressed by the
/// byte offset at which they start inside the file. The id carries no type information;
/// which accessor it may be passed to depends on where it was obtained.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Creates a new id from a raw file offset
    #[must_use]
    pub fn new(offset: u32) -> Self {
        EntityId(offset)
    }

    /// Returns the file offset of the entity
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.0
    }

    /// Returns true for the null id (offset 0, the file header)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for EntityId {
    fn from(offset: u32) -> Self {
        EntityId(offset)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId(0x{:08x})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
