//! Range-checked numeric newtypes.
//!
//! The protocol carries small integers whose valid range is part of the game
//! rules: levels run from 1 to 8 and broadcast directions from 0 to 8. Both
//! are wrapped so an out-of-range value can never be stored, only rejected
//! at parse time.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u8` restricted to `$min..=$max`.
macro_rules! define_bounded {
    (
        $(#[$meta:meta])*
        $name:ident, $min:literal, $max:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            /// Smallest accepted value.
            pub const MIN: Self = Self($min);
            /// Largest accepted value.
            pub const MAX: Self = Self($max);

            /// Wrap `value` if it lies in the accepted range.
            pub const fn new(value: u8) -> Option<Self> {
                if matches!(value, $min..=$max) {
                    Some(Self(value))
                } else {
                    None
                }
            }

            /// Return the inner value.
            pub const fn get(self) -> u8 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| {
                    format!(
                        "{} out of range: {value} (expected {}..={})",
                        stringify!($name),
                        $min,
                        $max
                    )
                })
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_bounded! {
    /// An elevation level. Agents start at 1 and the game is won at 8.
    Level, 1, 8
}

define_bounded! {
    /// The direction a broadcast came from, relative to the listener.
    ///
    /// `0` means the sender shares the listener's tile. `1` is straight
    /// ahead and the remaining values go counter-clockwise around the
    /// listener, one per neighbouring tile.
    Direction, 0, 8
}

impl Level {
    /// The level above this one, or `None` at the maximum level.
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0.saturating_add(1))
    }

    /// The level below this one, or `None` at level 1.
    pub const fn previous(self) -> Option<Self> {
        Self::new(self.0.saturating_sub(1))
    }

    /// Whether this is the final level.
    pub const fn is_max(self) -> bool {
        self.0 == Self::MAX.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl Direction {
    /// The sender shares the listener's tile.
    pub const HERE: Self = Self(0);

    /// Whether the sender is on the listener's own tile.
    pub const fn is_here(self) -> bool {
        self.0 == 0
    }
}
