use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use hashbrown::HashMap;
use spin::Mutex;

use crate::bits::Bits;
use crate::descriptor::{AnyDescriptor, Descriptor};
use crate::FlagEnum;

/// A published registry entry: the erased descriptor plus the extractor
/// capturing the concrete enum type at registration time.
pub struct RegisteredEnum {
    descriptor: AnyDescriptor,
    extract: fn(&dyn Any) -> Option<u64>,
}

impl core::fmt::Debug for RegisteredEnum {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisteredEnum").finish_non_exhaustive()
    }
}

impl RegisteredEnum {
    pub fn descriptor(&self) -> &AnyDescriptor {
        &self.descriptor
    }

    /// Widened bit pattern of `value`, if it is a value of the registered
    /// enum type.
    pub fn bit_pattern_of(&self, value: &dyn Any) -> Option<u64> {
        (self.extract)(value)
    }
}

type Registry = HashMap<TypeId, &'static RegisteredEnum>;

// Readers take one acquire load of the current snapshot; writers serialize
// on `INSTALL` and publish a fresh snapshot. Snapshots and entries are
// leaked, so every pointer ever published stays valid for the process
// lifetime.
static PUBLISHED: AtomicPtr<Registry> = AtomicPtr::new(ptr::null_mut());
static INSTALL: Mutex<()> = Mutex::new(());

fn snapshot() -> Option<&'static Registry> {
    let current = PUBLISHED.load(Ordering::Acquire);
    // SAFETY: non-null values were leaked by `install` and are never freed.
    unsafe { current.as_ref() }
}

pub(crate) fn lookup(type_id: TypeId) -> Option<&'static RegisteredEnum> {
    snapshot()?.get(&type_id).copied()
}

pub(crate) fn entry_of<E: FlagEnum>() -> &'static RegisteredEnum {
    let type_id = TypeId::of::<E>();
    match lookup(type_id) {
        Some(entry) => entry,
        None => install::<E>(type_id),
    }
}

#[cold]
fn install<E: FlagEnum>(type_id: TypeId) -> &'static RegisteredEnum {
    let _guard = INSTALL.lock();
    if let Some(entry) = lookup(type_id) {
        // Another thread finished the build while we waited for the lock.
        return entry;
    }
    let descriptor: &'static Descriptor<E::Bits> = Box::leak(Box::new(Descriptor::build::<E>()));
    let entry: &'static RegisteredEnum = Box::leak(Box::new(RegisteredEnum {
        descriptor: <E::Bits as Bits>::erase(descriptor),
        extract: |value| value.downcast_ref::<E>().map(|flag| flag.bits().to_bit_pattern()),
    }));
    let mut next = snapshot().cloned().unwrap_or_default();
    next.insert(type_id, entry);
    PUBLISHED.store(Box::leak(Box::new(next)), Ordering::Release);
    trace!(
        "registered {} ({} members, {} flag bits)",
        entry.descriptor.type_name(),
        entry.descriptor.member_count(),
        entry.descriptor.flag_count()
    );
    entry
}

pub(crate) fn descriptor_of<E: FlagEnum>() -> &'static Descriptor<E::Bits> {
    match <E::Bits as Bits>::unerase(entry_of::<E>().descriptor()) {
        Some(descriptor) => descriptor,
        // An entry keyed by `E` is always built over `E::Bits`.
        None => unreachable!("descriptor width mismatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::Perm;
    use std::vec::Vec;

    #[test]
    fn repeated_access_returns_the_same_descriptor() {
        let first = Perm::descriptor();
        let second = Perm::descriptor();
        assert!(ptr::eq(first, second));
    }

    #[test]
    fn unregistered_types_are_absent() {
        struct NeverRegistered;
        assert!(lookup(TypeId::of::<NeverRegistered>()).is_none());
    }

    #[test]
    fn concurrent_first_access_publishes_one_descriptor() {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Fresh {
            A = 1,
            B = 2,
        }

        impl FlagEnum for Fresh {
            type Bits = u16;

            const FLAGS: bool = true;

            fn name(self) -> &'static str {
                match self {
                    Fresh::A => "A",
                    Fresh::B => "B",
                }
            }

            fn bits(self) -> u16 {
                self as u16
            }

            fn members() -> &'static [Self] {
                &[Fresh::A, Fresh::B]
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Fresh::descriptor() as *const _ as usize))
            .collect();
        let mut seen: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.dedup();
        assert_eq!(seen.len(), 1);
        assert_eq!(Fresh::descriptor().all_flags(), 3);
    }
}
