//! The single value slot carried between execution-unit steps.

pub mod typed;
pub mod value;

pub use typed::{Opaque, Transfer};
pub use value::{TransferKind, TransferValue};
