//! vlsitech - technology plugin layer for VLSI flows
//!
//! Loads technology descriptions, resolves library-relative paths against
//! installs, extracted tarballs and library prefixes, and manages the
//! tarball extraction cache.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod settings;
pub mod tech;

pub use error::{TechError, TechResult};
