//! Player data
//!
//! Static player catalog loaded once at startup.

pub mod catalog;

pub use catalog::PlayerCatalog;
