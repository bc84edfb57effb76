//! Identity and match resolution against the backing store.

pub mod matches;
pub mod players;

pub use matches::resolve_match;
pub use players::{resolve_players, PlayerIdentity, ResolvedLineups, ResolvedPlayer};
