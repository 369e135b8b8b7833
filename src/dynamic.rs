//! Runtime-checked access for callers that are generic over an
//! unconstrained type parameter.
//!
//! The statically checked API proves "this type is a flag enum" with the
//! [`FlagEnum`](crate::FlagEnum) bound; here the proof is replaced by a
//! [`TypeId`] lookup against the registry, and failures surface as
//! [`Error::UnregisteredType`]. Registration happens implicitly on the first
//! statically typed descriptor access, or explicitly via [`register`].
//!
//! Values cross this boundary as widened `u64` bit patterns. Parsing yields
//! a pattern rather than an enum value: a combined pattern is generally not
//! a declared discriminant, so an enum-typed result would be unsound.

use alloc::string::String;
use core::any::{type_name, Any, TypeId};

use crate::cache::{self, RegisteredEnum};
use crate::descriptor::AnyDescriptor;
use crate::error::{Error, Result};
use crate::format::FormatOptions;
use crate::parse::ParseOptions;
use crate::FlagEnum;

/// Eagerly publish the descriptor of `E`, making it visible to the
/// runtime-checked entry points below.
pub fn register<E: FlagEnum>() {
    let _ = cache::entry_of::<E>();
}

pub fn is_registered<T: 'static>() -> bool {
    cache::lookup(TypeId::of::<T>()).is_some()
}

/// The runtime check: resolve the registry entry for `T`.
pub fn registration<T: 'static>() -> Result<&'static RegisteredEnum> {
    cache::lookup(TypeId::of::<T>()).ok_or(Error::UnregisteredType {
        type_name: type_name::<T>(),
    })
}

pub fn descriptor<T: 'static>() -> Result<&'static AnyDescriptor> {
    registration::<T>().map(RegisteredEnum::descriptor)
}

/// Widened bit pattern of an enum value reached through an unconstrained
/// type parameter.
pub fn bit_pattern_of<T: Any>(value: &T) -> Result<u64> {
    let entry = registration::<T>()?;
    entry.bit_pattern_of(value).ok_or(Error::UnregisteredType {
        type_name: type_name::<T>(),
    })
}

pub fn is_valid_flag_combination<T: Any>(value: &T) -> Result<bool> {
    Ok(descriptor::<T>()?.is_valid_pattern(bit_pattern_of(value)?))
}

pub fn flag_count<T: 'static>() -> Result<u32> {
    Ok(descriptor::<T>()?.flag_count())
}

pub fn format_flags<T: Any>(value: &T, options: &FormatOptions<'_>) -> Result<Option<String>> {
    Ok(descriptor::<T>()?.format_pattern(bit_pattern_of(value)?, options))
}

pub fn parse_flags<T: 'static>(text: &str, options: &ParseOptions<'_>) -> Result<u64> {
    descriptor::<T>()?.parse_pattern(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::Perm;

    #[test]
    fn registration_is_a_runtime_check() {
        register::<Perm>();
        assert!(is_registered::<Perm>());
        assert!(!is_registered::<&'static str>());

        struct NotAnEnum;
        let error = registration::<NotAnEnum>().unwrap_err();
        assert!(matches!(error, Error::UnregisteredType { .. }));
    }

    #[test]
    fn patterns_round_trip_through_the_erased_descriptor() {
        register::<Perm>();
        let descriptor = descriptor::<Perm>().unwrap();
        assert_eq!(descriptor.all_flags_pattern(), 7);
        assert_eq!(descriptor.flag_count(), 3);
        assert_eq!(descriptor.member_count(), 5);
        assert!(descriptor.is_valid_pattern(5));
        assert!(!descriptor.is_valid_pattern(8));
        assert_eq!(descriptor.count_pattern(7), 3);
        assert_eq!(
            descriptor
                .format_pattern(5, &FormatOptions::default())
                .unwrap(),
            "Read, Exec"
        );
        assert_eq!(
            descriptor.parse_pattern("Read, Exec", &ParseOptions::default()),
            Ok(5)
        );
    }

    #[test]
    fn values_are_extracted_through_any() {
        register::<Perm>();
        assert_eq!(bit_pattern_of(&Perm::Exec), Ok(4));
        assert_eq!(is_valid_flag_combination(&Perm::Exec), Ok(true));
        assert_eq!(
            format_flags(&Perm::Rw, &FormatOptions::default()).unwrap(),
            Some(alloc::string::String::from("Read, Write, Rw"))
        );
        assert_eq!(flag_count::<Perm>(), Ok(3));
        assert_eq!(parse_flags::<Perm>("Write, 4", &ParseOptions::default()), Ok(6));
    }
}
