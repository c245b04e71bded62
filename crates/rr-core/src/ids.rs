//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two kinds of id exist:
//!
//! - [`NodeId`] is the *stable* identifier a graph source assigns (an OSM
//!   node id, a CSV `id` column).  It survives truncation unchanged.
//! - [`NodeIdx`] and [`EdgeId`] are *dense* positions into one
//!   `GraphStore`'s arrays.  They are only meaningful for the store that
//!   produced them.
//!
//! All ids are `Copy + Ord + Hash`.  The inner integer is `pub`, but callers
//! should prefer `.index()` when indexing a `Vec`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Stable identifier of a road node as assigned by the graph source.
    pub struct NodeId(u64);
}

typed_id! {
    /// Dense index of a node within one `GraphStore`.  Index order equals
    /// `NodeId` order.
    pub struct NodeIdx(u32);
}

typed_id! {
    /// Dense index of a directed edge within one `GraphStore`.
    pub struct EdgeId(u32);
}

// `NodeId` prints bare so error messages read "node 42", the dense indices
// keep their type name to make accidental mix-ups visible in logs.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIdx({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}
