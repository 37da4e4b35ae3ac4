//! Baton Harness: demonstration coroutines run as recorded scenarios.
//!
//! A scenario drives one or more kernel coroutines through a fixed script of
//! resumes and records every observation (invocation results, values the
//! coroutine emits on the side) into a [`transcript::TranscriptV1`]. The
//! transcript renders to canonical JSON and carries a domain-separated
//! content digest, so two runs can be compared byte for byte.
//!
//! The harness does NOT drive control flow itself; every transfer goes
//! through the kernel's trampoline.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canon;
pub mod contract;
pub mod digest;
pub mod error;
pub mod policy;
pub mod scenarios;
pub mod transcript;
pub mod transcript_io;
