//! Strongly typed identifier wrappers.
//!
//! A patient carries two identities: the sequential `PatientId` assigned at
//! intake, and the social-security-style `BillingKey` that indexes the
//! billing ledger.  Keeping them as distinct types stops one being used where
//! the other is expected.

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
    };
}

typed_id! {
    /// Sequential patient identifier assigned at intake.
    pub struct PatientId(u32);
}

typed_id! {
    /// Social-security-style identifier used as the billing ledger key.
    /// Nine-digit values fit comfortably in a `u32`.
    pub struct BillingKey(u32);
}
