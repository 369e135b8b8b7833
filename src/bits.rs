use core::fmt::{self, Debug, Display, LowerHex};
use core::num::ParseIntError;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use crate::descriptor::{AnyDescriptor, Descriptor};

/// The integer widths a flag enum may be backed by.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum RawKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl RawKind {
    pub fn name(self) -> &'static str {
        match self {
            RawKind::U8 => "u8",
            RawKind::U16 => "u16",
            RawKind::U32 => "u32",
            RawKind::U64 => "u64",
            RawKind::I8 => "i8",
            RawKind::I16 => "i16",
            RawKind::I32 => "i32",
            RawKind::I64 => "i64",
        }
    }

    pub fn bit_width(self) -> u32 {
        match self {
            RawKind::U8 | RawKind::I8 => 8,
            RawKind::U16 | RawKind::I16 => 16,
            RawKind::U32 | RawKind::I32 => 32,
            RawKind::U64 | RawKind::I64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, RawKind::I8 | RawKind::I16 | RawKind::I32 | RawKind::I64)
    }
}

impl Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform view of the integer type backing a flag enum.
///
/// The zero value is `Default::default()`. `to_bit_pattern` widens to the
/// two's-complement bit pattern in a `u64`; `from_bit_pattern` truncates to
/// the width and reinterprets, so only the low [`RawKind::bit_width`] bits of
/// a pattern are significant.
pub trait Bits:
    'static
    + Copy
    + BitXor<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + PartialEq
    + Eq
    + Debug
    + Default
    + Display
    + LowerHex
{
    const KIND: RawKind;

    fn count_ones(self) -> u32;

    fn to_bit_pattern(self) -> u64;

    fn from_bit_pattern(pattern: u64) -> Self;

    fn from_str_radix(src: &str, radix: u32) -> Result<Self, ParseIntError>;

    fn erase(descriptor: &'static Descriptor<Self>) -> AnyDescriptor;

    fn unerase(descriptor: &AnyDescriptor) -> Option<&'static Descriptor<Self>>;
}

macro_rules! impl_bits {
    ($($ty:ty => $unsigned:ty, $kind:ident;)*) => {$(
        impl Bits for $ty {
            const KIND: RawKind = RawKind::$kind;

            #[inline]
            fn count_ones(self) -> u32 {
                <$ty>::count_ones(self)
            }

            #[inline]
            fn to_bit_pattern(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bit_pattern(pattern: u64) -> Self {
                pattern as $unsigned as $ty
            }

            fn from_str_radix(src: &str, radix: u32) -> Result<Self, ParseIntError> {
                <$ty>::from_str_radix(src, radix)
            }

            fn erase(descriptor: &'static Descriptor<Self>) -> AnyDescriptor {
                AnyDescriptor::$kind(descriptor)
            }

            fn unerase(descriptor: &AnyDescriptor) -> Option<&'static Descriptor<Self>> {
                match descriptor {
                    AnyDescriptor::$kind(descriptor) => Some(*descriptor),
                    _ => None,
                }
            }
        }
    )*};
}

impl_bits! {
    u8 => u8, U8;
    u16 => u16, U16;
    u32 => u32, U32;
    u64 => u64, U64;
    i8 => u8, I8;
    i16 => u16, I16;
    i32 => u32, I32;
    i64 => u64, I64;
}
