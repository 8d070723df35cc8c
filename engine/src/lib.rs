//! Deterministic craps settlement with a pooled, share-accounted bankroll.
//!
//! The engine never generates randomness. Dice arrive from an external
//! oracle via [`CrapsTable::roll`], and raffle draws take their entropy as
//! an argument. Given the same sequence of calls, two instances produce
//! byte-identical state, so the engine can run behind consensus or be
//! replayed for audit.
//!
//! Layout:
//! - [`paytable`]: exact rational payout schedule for every bet category
//! - [`registry`]: active bets and placement legality
//! - [`settle`]: per-roll resolution in a fixed category order
//! - [`vault`]: share-based deposit/withdraw and round accounting
//! - [`raffle`]: deterministic weighted winner selection
//! - [`table`]: the facade tying the pieces together

pub mod error;
pub mod paytable;
pub mod raffle;
pub mod registry;
pub mod settle;
pub mod table;
pub mod vault;

pub use error::{ConsistencyFault, EngineError, ValidationError};
pub use table::CrapsTable;
pub use vault::VaultLedger;
