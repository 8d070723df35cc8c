//! Craps domain types.
//!
//! Bet menu, shooter-hand state, paytable-supporting constants, and the
//! per-roll settlement report consumed by round drivers.

mod bet;
mod constants;
mod report;
mod shooter;

pub use bet::*;
pub use constants::*;
pub use report::*;
pub use shooter::*;

#[cfg(test)]
mod tests;
