//! `TransferValue`: the tagged payload slot.
//!
//! Exactly one payload travels with each step. The slot is a tagged sum type,
//! so a reader that disagrees with the writer about the payload's kind is
//! detected instead of reinterpreting bits. The typed boundary in
//! [`super::typed`] makes such a disagreement impossible through the public
//! coroutine API; the tag only backs that guarantee up.

use std::any::Any;

/// Discriminant of a [`TransferValue`], for diagnostics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Empty,
    Int,
    Float,
    Opaque,
}

impl TransferKind {
    /// Lowercase name used in messages and transcripts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Opaque => "opaque",
        }
    }
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One payload value.
///
/// Integers are widened to `i64` and floats to `f64`; the typed boundary
/// narrows them back. `Opaque` carries caller-owned data (an owned box or a
/// shared `Rc`) that the engine never inspects.
#[derive(Default)]
pub enum TransferValue {
    /// No payload (the "void" side of a signature).
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Opaque(Box<dyn Any>),
}

impl TransferValue {
    /// The payload's kind.
    #[must_use]
    pub fn kind(&self) -> TransferKind {
        match self {
            Self::Empty => TransferKind::Empty,
            Self::Int(_) => TransferKind::Int,
            Self::Float(_) => TransferKind::Float,
            Self::Opaque(_) => TransferKind::Opaque,
        }
    }

    /// Returns `true` for the empty payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl std::fmt::Debug for TransferValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}
