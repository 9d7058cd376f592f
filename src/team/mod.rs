//! Team composition
//!
//! Role-constrained rosters and the two-team session the UI mutates.

pub mod roster;
pub mod session;

pub use roster::{Roster, RosterError, RosterState};
pub use session::MatchSession;
