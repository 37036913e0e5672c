use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable handle into one of the externally owned registries
/// (fluid network, panel, cue library).
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Index as `usize`, for direct arena lookups.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Declares a registry-specific handle wrapping [`Id`], so a tank handle
/// cannot be passed where a pipe is expected.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(Id);

        impl $name {
            pub fn from_index(index: u32) -> Self {
                Self(Id::from_index(index))
            }

            pub fn index(self) -> u32 {
                self.0.index()
            }

            pub fn slot(self) -> usize {
                self.0.slot()
            }

            /// The untyped handle, for error reporting.
            pub fn id(self) -> Id {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }

        impl From<$name> for Id {
            fn from(id: $name) -> Id {
                id.0
            }
        }
    };
}

typed_id!(
    /// Tank in the fluid network.
    TankId
);
typed_id!(
    /// Pipe in the fluid network.
    PipeId
);
typed_id!(
    /// Panel switch, breaker, selector or thumbwheel.
    ControlId
);
typed_id!(
    /// DC bus on the panel.
    BusId
);
typed_id!(
    /// Sound in the cue library.
    CueId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn typed_handles_share_the_index_scheme() {
        let tank = TankId::from_index(3);
        let pipe = PipeId::from_index(3);
        assert_eq!(tank.slot(), pipe.slot());
        assert_eq!(Id::from(tank), pipe.id());
        assert_eq!(format!("{tank} {pipe:?}"), "3 PipeId(3)");
        assert_eq!(
            core::mem::size_of::<TankId>(),
            core::mem::size_of::<Option<TankId>>()
        );
    }
}
