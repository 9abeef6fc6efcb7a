//! CLI command implementations

pub mod check;
pub mod config;
pub mod extract;
pub mod libraries;
pub mod resolve;

pub use check::execute as check;
pub use config::execute as config;
pub use extract::execute as extract;
pub use libraries::execute as libraries;
pub use resolve::execute as resolve;
