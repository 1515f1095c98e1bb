#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for locus.
//!
//! This crate provides the filesystem collaborator used by the resolver,
//! with no logging/tracing dependencies. Logging is handled by the CLI crate
//! and the resolver core.

pub mod fs;

pub use fs::{FileSystem, MemoryFs, OsFs};
