//! Live locals: the resource table for state that survives a suspend point.
//!
//! A body stores each cross-suspension variable in a numbered slot through a
//! typed [`Local`] key and declares, per suspend point, which slots are live
//! there ([`crate::coroutine::Body::live_at`]). The engine
//!
//! - drops every slot outside the live set when the body suspends,
//! - drops every slot when the body finishes,
//! - runs the body's abandon hook and then drops every slot when the
//!   coroutine is dropped before finishing.
//!
//! Slot values are ordinary Rust values, so "drop" runs their destructors.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::{fatal, UsageViolation};

/// Number of slots a body can use.
pub const MAX_LOCALS: u8 = 64;

/// A typed key for one live-local slot.
pub struct Local<T> {
    slot: u8,
    marker: PhantomData<fn() -> T>,
}

impl<T> Local<T> {
    /// Key for `slot`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `slot >= MAX_LOCALS`.
    #[must_use]
    pub const fn new(slot: u8) -> Self {
        assert!(slot < MAX_LOCALS, "live-local slot out of range");
        Self {
            slot,
            marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn slot(self) -> u8 {
        self.slot
    }
}

impl<T> Clone for Local<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Local<T> {}

impl<T> std::fmt::Debug for Local<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Local({})", self.slot)
    }
}

/// The set of slots live at one suspend point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSet(u64);

impl LiveSet {
    /// Every slot stays live (the default for bodies that do not declare).
    pub const ALL: Self = Self(u64::MAX);
    /// Nothing is live.
    pub const NONE: Self = Self(0);

    /// This set plus `local`'s slot.
    #[must_use]
    pub const fn with<T>(self, local: Local<T>) -> Self {
        Self(self.0 | (1u64 << local.slot))
    }

    #[must_use]
    pub const fn contains(self, slot: u8) -> bool {
        slot < MAX_LOCALS && self.0 & (1u64 << slot) != 0
    }
}

/// The per-coroutine table of live locals.
#[derive(Default)]
pub struct LiveLocals {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl LiveLocals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous value of the slot if it had one.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the slot holds a value of another type.
    #[track_caller]
    pub fn put<T: 'static>(&mut self, local: Local<T>, value: T) -> Option<T> {
        let slot = local.slot;
        let index = usize::from(slot);
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        if self.slots[index].as_ref().is_some_and(|old| !old.is::<T>()) {
            fatal(UsageViolation::LocalTypeMismatch { slot });
        }
        let old = self.slots[index].replace(Box::new(value))?;
        match old.downcast::<T>() {
            Ok(old) => Some(*old),
            Err(_) => fatal(UsageViolation::LocalTypeMismatch { slot }),
        }
    }

    /// Borrow a stored value.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the slot is empty or holds another type.
    #[must_use]
    #[track_caller]
    pub fn get<T: 'static>(&self, local: Local<T>) -> &T {
        let Some(stored) = self.slot(local.slot) else {
            fatal(UsageViolation::LocalMissing { slot: local.slot })
        };
        stored
            .downcast_ref::<T>()
            .unwrap_or_else(|| fatal(UsageViolation::LocalTypeMismatch { slot: local.slot }))
    }

    /// Mutably borrow a stored value.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the slot is empty or holds another type.
    #[track_caller]
    pub fn get_mut<T: 'static>(&mut self, local: Local<T>) -> &mut T {
        let slot = local.slot;
        let Some(stored) = self
            .slots
            .get_mut(usize::from(slot))
            .and_then(Option::as_mut)
        else {
            fatal(UsageViolation::LocalMissing { slot })
        };
        stored
            .downcast_mut::<T>()
            .unwrap_or_else(|| fatal(UsageViolation::LocalTypeMismatch { slot }))
    }

    /// Move a stored value out, leaving the slot empty.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the slot is empty or holds another type.
    #[track_caller]
    pub fn take<T: 'static>(&mut self, local: Local<T>) -> T {
        let slot = local.slot;
        let Some(stored) = self
            .slots
            .get_mut(usize::from(slot))
            .and_then(Option::take)
        else {
            fatal(UsageViolation::LocalMissing { slot })
        };
        match stored.downcast::<T>() {
            Ok(value) => *value,
            Err(_) => fatal(UsageViolation::LocalTypeMismatch { slot }),
        }
    }

    /// Returns `true` if the slot holds a value (of any type).
    #[must_use]
    pub fn contains<T>(&self, local: Local<T>) -> bool {
        self.slot(local.slot).is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Drop every slot outside `live`. Returns how many were dropped.
    pub fn retain(&mut self, live: LiveSet) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let keep = u8::try_from(index).is_ok_and(|i| live.contains(i));
            if !keep && slot.take().is_some() {
                released += 1;
            }
        }
        released
    }

    /// Drop every slot. Returns how many were dropped.
    pub fn release_all(&mut self) -> usize {
        self.retain(LiveSet::NONE)
    }

    fn slot(&self, slot: u8) -> Option<&dyn Any> {
        self.slots
            .get(usize::from(slot))
            .and_then(Option::as_deref)
    }
}

impl std::fmt::Debug for LiveLocals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect();
        f.debug_struct("LiveLocals")
            .field("occupied", &occupied)
            .finish()
    }
}
