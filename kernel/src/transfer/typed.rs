//! The typed boundary: converting Rust values to and from the payload slot.
//!
//! Producers and consumers are matched at compile time through the generic
//! coroutine and continuation types, so every `from_transfer` below reads a
//! slot written by the matching `into_transfer`. A mismatch can only come from
//! hand-driving the type-erased layer and is fatal.

use std::rc::Rc;

use crate::error::{fatal, UsageViolation};
use crate::transfer::value::TransferValue;

/// A value that can travel through the transfer slot.
pub trait Transfer: Sized + 'static {
    /// Write `self` into a payload slot.
    fn into_transfer(self) -> TransferValue;

    /// Read a payload slot written by [`Transfer::into_transfer`] of the same type.
    ///
    /// # Panics
    ///
    /// Panics (fatal usage violation) if the slot holds a different kind.
    fn from_transfer(value: TransferValue) -> Self;
}

#[cold]
#[track_caller]
fn mismatch(expected: &'static str, found: &TransferValue) -> ! {
    fatal(UsageViolation::TransferMismatch {
        expected,
        found: found.kind(),
    })
}

impl Transfer for () {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Empty
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Empty => (),
            other => mismatch("empty", &other),
        }
    }
}

impl Transfer for i64 {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Int(self)
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Int(i) => i,
            other => mismatch("integer", &other),
        }
    }
}

macro_rules! narrow_integer_transfer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Transfer for $ty {
                fn into_transfer(self) -> TransferValue {
                    TransferValue::Int(i64::from(self))
                }

                fn from_transfer(value: TransferValue) -> Self {
                    match value {
                        TransferValue::Int(i) => <$ty>::try_from(i).unwrap_or_else(|_| {
                            fatal(UsageViolation::IntegerOutOfRange {
                                expected: stringify!($ty),
                                value: i,
                            })
                        }),
                        other => mismatch("integer", &other),
                    }
                }
            }
        )*
    };
}

narrow_integer_transfer!(i8, i16, i32, u8, u16, u32);

impl Transfer for bool {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Int(i64::from(self))
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Int(0) => false,
            TransferValue::Int(1) => true,
            TransferValue::Int(i) => fatal(UsageViolation::IntegerOutOfRange {
                expected: "bool",
                value: i,
            }),
            other => mismatch("integer", &other),
        }
    }
}

impl Transfer for f64 {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Float(self)
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Float(x) => x,
            other => mismatch("float", &other),
        }
    }
}

impl Transfer for f32 {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Float(f64::from(self))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_transfer(value: TransferValue) -> Self {
        match value {
            // Written from an f32, so the narrowing is exact.
            TransferValue::Float(x) => x as f32,
            other => mismatch("float", &other),
        }
    }
}

/// Owned caller data moved through the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque<T>(pub T);

impl<T: 'static> Transfer for Opaque<T> {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Opaque(Box::new(self.0))
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Opaque(boxed) => match boxed.downcast::<T>() {
                Ok(inner) => Opaque(*inner),
                Err(_) => fatal(UsageViolation::TransferMismatch {
                    expected: std::any::type_name::<T>(),
                    found: crate::transfer::TransferKind::Opaque,
                }),
            },
            other => mismatch(std::any::type_name::<T>(), &other),
        }
    }
}

/// Shared caller data: the slot carries another reference, not a copy.
impl<T: 'static> Transfer for Rc<T> {
    fn into_transfer(self) -> TransferValue {
        TransferValue::Opaque(Box::new(self))
    }

    fn from_transfer(value: TransferValue) -> Self {
        match value {
            TransferValue::Opaque(boxed) => match boxed.downcast::<Rc<T>>() {
                Ok(shared) => *shared,
                Err(_) => fatal(UsageViolation::TransferMismatch {
                    expected: std::any::type_name::<Rc<T>>(),
                    found: crate::transfer::TransferKind::Opaque,
                }),
            },
            other => mismatch(std::any::type_name::<Rc<T>>(), &other),
        }
    }
}
