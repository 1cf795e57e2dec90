//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every entity in the simulation (ambulance, call, station, hospital) lives
//! in a `Vec` owned by the simulation state and is addressed by position.
//! The wrappers stop an `AmbId` from being used to index the call list.

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

            /// Build from a `Vec` position.  Entity counts are far below the
            /// inner type's range, so the cast never truncates in practice.
            #[inline(always)]
            pub fn from_index(i: usize) -> $name {
                $name(i as $inner)
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
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
    /// Index of an ambulance in the fleet.
    pub struct AmbId(u32);
}

typed_id! {
    /// Index of a call, in arrival-time order.
    pub struct CallId(u32);
}

typed_id! {
    /// Index of an ambulance station.
    pub struct StationId(u32);
}

typed_id! {
    /// Index of a hospital.
    pub struct HospitalId(u32);
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a scheduled event.  Assigned in insertion order, so it also
    /// breaks ties between events scheduled for the same time.
    pub struct EventId(u64);
}
