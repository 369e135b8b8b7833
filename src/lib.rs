//! Enum-backed bit-flag sets.
//!
//! Mark a unit enum with [`flag_enum`] and its values become combinable into
//! [`FlagSet`]s, with validation, set algebra, formatting and parsing driven
//! by a per-type descriptor that is built once and cached for the process
//! lifetime.
//!
//! ```ignore
//! use enumbits::{flag_enum, FlagSet};
//!
//! #[flag_enum(u8)]
//! enum Colors {
//!     None = 0,
//!     Red = 1,
//!     Green = 2,
//!     Blue = 4,
//! }
//!
//! let purple = Colors::Red | Colors::Blue;
//! assert_eq!(purple.format(&Default::default()).unwrap(), "Red, Blue");
//! assert_eq!("Red,Blue".parse::<FlagSet<Colors>>().unwrap(), purple);
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
extern crate log;

pub use enumbits_macros::flag_enum;

mod bits;
mod cache;
mod descriptor;
pub mod dynamic;
mod error;
mod format;
mod parse;
mod set;

pub use self::bits::{Bits, RawKind};
pub use self::cache::RegisteredEnum;
pub use self::descriptor::{AnyDescriptor, Decompose, Descriptor, Member};
pub use self::error::{Error, Result};
pub use self::format::{FlagFormat, FormatOptions, DEFAULT_DELIMITER};
pub use self::parse::ParseOptions;
pub use self::set::{FlagIter, FlagOrFlagSet, FlagSet};

/// A registered flag enum.
///
/// Normally implemented by the [`flag_enum`] attribute; a manual impl only
/// has to supply the declared member list in declaration order. The
/// descriptor is built from `members()` on first access and cached by type
/// identity.
pub trait FlagEnum: 'static + Copy + PartialEq + Eq {
    type Bits: Bits;

    /// Whether the type was declared as a combinable flag set.
    const FLAGS: bool;

    fn name(self) -> &'static str;

    fn bits(self) -> Self::Bits;

    /// Declared members, in declaration order.
    fn members() -> &'static [Self];

    fn descriptor() -> &'static Descriptor<Self::Bits> {
        cache::descriptor_of::<Self>()
    }
}
