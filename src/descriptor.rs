use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::bits::{Bits, RawKind};
use crate::error::Result;
use crate::format::FormatOptions;
use crate::parse::ParseOptions;
use crate::FlagEnum;

/// One declared (name, value) pair of a flag enum.
#[derive(Clone, Copy, Debug)]
pub struct Member<B> {
    name: &'static str,
    bits: B,
}

impl<B: Bits> Member<B> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bits(&self) -> B {
        self.bits
    }
}

/// Cached per-type metadata: the ordered member table, the mask of all
/// declared flags, and the deduplicated decomposition list.
///
/// Built once on first access for a type and published for the process
/// lifetime; never mutated afterwards.
pub struct Descriptor<B: Bits> {
    type_name: &'static str,
    flags: bool,
    members: Box<[Member<B>]>,
    decomposition: Box<[usize]>,
    mask: B,
    zero: Option<usize>,
}

impl<B: Bits> Descriptor<B> {
    pub(crate) fn build<E: FlagEnum<Bits = B>>() -> Self {
        let members: Box<[Member<B>]> = E::members()
            .iter()
            .map(|&flag| Member {
                name: flag.name(),
                bits: flag.bits(),
            })
            .collect();

        let mut mask = B::default();
        for member in members.iter() {
            mask = mask | member.bits;
        }

        let zero = members.iter().position(|member| member.bits == B::default());

        // Declaration order, zero excluded, one entry per distinct value:
        // the first-declared member owns its value for decomposition.
        let mut decomposition = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            if member.bits == B::default() {
                continue;
            }
            if members[..index].iter().any(|earlier| earlier.bits == member.bits) {
                continue;
            }
            decomposition.push(index);
        }

        Descriptor {
            type_name: core::any::type_name::<E>(),
            flags: E::FLAGS,
            members,
            decomposition: decomposition.into_boxed_slice(),
            mask,
            zero,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the type was declared as a combinable flag set.
    pub fn is_flags(&self) -> bool {
        self.flags
    }

    pub fn kind(&self) -> RawKind {
        B::KIND
    }

    /// Declared members, in declaration order.
    pub fn members(&self) -> &[Member<B>] {
        &self.members
    }

    /// Bitwise OR of every declared member value.
    pub fn all_flags(&self) -> B {
        self.mask
    }

    /// Population count of [`Self::all_flags`].
    pub fn flag_count(&self) -> u32 {
        self.mask.count_ones()
    }

    /// The first declared zero-valued member, if any.
    pub fn zero_member(&self) -> Option<&Member<B>> {
        self.zero.map(|index| &self.members[index])
    }

    /// A value is a valid flag combination iff all of its bits are covered
    /// by declared members.
    pub fn is_valid(&self, value: B) -> bool {
        (value & !self.mask) == B::default()
    }

    pub fn member_by_name(&self, name: &str, ignore_case: bool) -> Option<&Member<B>> {
        self.members.iter().find(|member| {
            if ignore_case {
                member.name.eq_ignore_ascii_case(name)
            } else {
                member.name == name
            }
        })
    }

    /// Lazily enumerate the declared flags contained in `value`.
    ///
    /// Restartable: each call returns a fresh iterator over the cached
    /// decomposition list.
    pub fn decompose(&self, value: B) -> Decompose<'_, B> {
        Decompose {
            descriptor: self,
            index: 0,
            value,
        }
    }

    pub(crate) fn decomposition(&self) -> &[usize] {
        &self.decomposition
    }
}

#[derive(Clone)]
pub struct Decompose<'a, B: Bits> {
    descriptor: &'a Descriptor<B>,
    index: usize,
    value: B,
}

impl<'a, B: Bits> Iterator for Decompose<'a, B> {
    type Item = Member<B>;

    fn next(&mut self) -> Option<Member<B>> {
        while self.index < self.descriptor.decomposition.len() {
            let member = self.descriptor.members[self.descriptor.decomposition[self.index]];
            self.index += 1;
            if (self.value & member.bits) == member.bits {
                return Some(member);
            }
        }
        None
    }
}

/// Width-tagged view of a descriptor, selected once at registration time.
///
/// Values cross this boundary as widened `u64` bit patterns; only the low
/// [`RawKind::bit_width`] bits are significant.
#[derive(Clone, Copy)]
pub enum AnyDescriptor {
    U8(&'static Descriptor<u8>),
    U16(&'static Descriptor<u16>),
    U32(&'static Descriptor<u32>),
    U64(&'static Descriptor<u64>),
    I8(&'static Descriptor<i8>),
    I16(&'static Descriptor<i16>),
    I32(&'static Descriptor<i32>),
    I64(&'static Descriptor<i64>),
}

macro_rules! each_width {
    ($any:expr, $descriptor:ident => $body:expr) => {
        match $any {
            AnyDescriptor::U8($descriptor) => $body,
            AnyDescriptor::U16($descriptor) => $body,
            AnyDescriptor::U32($descriptor) => $body,
            AnyDescriptor::U64($descriptor) => $body,
            AnyDescriptor::I8($descriptor) => $body,
            AnyDescriptor::I16($descriptor) => $body,
            AnyDescriptor::I32($descriptor) => $body,
            AnyDescriptor::I64($descriptor) => $body,
        }
    };
}

fn value_as<B: Bits>(_descriptor: &Descriptor<B>, pattern: u64) -> B {
    B::from_bit_pattern(pattern)
}

impl AnyDescriptor {
    pub fn kind(&self) -> RawKind {
        each_width!(self, descriptor => descriptor.kind())
    }

    pub fn type_name(&self) -> &'static str {
        each_width!(self, descriptor => descriptor.type_name())
    }

    pub fn is_flags(&self) -> bool {
        each_width!(self, descriptor => descriptor.is_flags())
    }

    pub fn member_count(&self) -> usize {
        each_width!(self, descriptor => descriptor.members().len())
    }

    pub fn flag_count(&self) -> u32 {
        each_width!(self, descriptor => descriptor.flag_count())
    }

    pub fn all_flags_pattern(&self) -> u64 {
        each_width!(self, descriptor => descriptor.all_flags().to_bit_pattern())
    }

    pub fn is_valid_pattern(&self, pattern: u64) -> bool {
        each_width!(self, descriptor => descriptor.is_valid(value_as(descriptor, pattern)))
    }

    pub fn count_pattern(&self, pattern: u64) -> u32 {
        each_width!(self, descriptor => value_as(descriptor, pattern).count_ones())
    }

    pub fn format_pattern(&self, pattern: u64, options: &FormatOptions<'_>) -> Option<String> {
        each_width!(self, descriptor => descriptor.format(value_as(descriptor, pattern), options))
    }

    pub fn parse_pattern(&self, text: &str, options: &ParseOptions<'_>) -> Result<u64> {
        each_width!(self, descriptor => descriptor.parse(text, options).map(Bits::to_bit_pattern))
    }
}
