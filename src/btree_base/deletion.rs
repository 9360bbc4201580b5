use std::ops;

use bitmask_enum::bitmask;

#[bitmask(u8)]
pub enum InsertionFlags {
    Ok = 0,
    Split = 1,
    Overflow = 2,
}

#[bitmask(u8)]
pub enum DeletionFlags {
    Ok = 0,
    NotFound = 1,
    Rotated = 2,
    Merged = 4,
    Split = 8,
}

/// What a node-level removal did on its way down.
pub struct DeletionResult<K> {
    pub flags: DeletionFlags,
    pub removed: Option<K>,
}

impl<K> DeletionResult<K> {
    pub fn new(flags: DeletionFlags) -> Self {
        Self {
            flags,
            removed: None,
        }
    }

    pub fn new_with_key(flags: DeletionFlags, removed: K) -> Self {
        Self {
            flags,
            removed: Some(removed),
        }
    }

    pub fn has(&self, flag: DeletionFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn found(&self) -> bool {
        !self.has(DeletionFlags::NotFound)
    }
}

impl<K> ops::BitOrAssign<DeletionFlags> for DeletionResult<K> {
    fn bitor_assign(&mut self, rhs: DeletionFlags) {
        self.flags = self.flags | rhs;
    }
}
