//! Common types for the rollhouse settlement engine.
//!
//! Defines the craps bet/shooter/report types and the pooled-vault state shared
//! by the engine and any round driver or presentation layer. All persistent
//! types carry hand-rolled `commonware-codec` implementations so state can be
//! snapshotted and replayed byte-for-byte.

pub mod craps;
pub mod vault;

pub use craps::*;
pub use vault::PoolState;
