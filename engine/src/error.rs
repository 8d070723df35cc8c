use thiserror::Error;

/// Recoverable rejection of a single request. Table state is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bet amount must be nonzero")]
    ZeroAmount,
    #[error("bet type {0} not allowed during this phase")]
    WrongPhase(&'static str),
    #[error("bet type {0} requires a target total")]
    MissingTarget(&'static str),
    #[error("invalid target {1} for bet type {0}")]
    InvalidTarget(&'static str, u8),
    #[error("bet type {0} may only be placed on a fresh hand")]
    HandInProgress(&'static str),
    #[error("participant already holds a {0} bet this hand")]
    DuplicateBonus(&'static str),
    #[error("no eligible contract bet to back with odds")]
    NoOddsBase,
    #[error("table is full ({0} active bets)")]
    TableFull(usize),
    #[error("insufficient unlocked pool balance: need {need}, have {have}")]
    InsufficientUnlocked { need: u64, have: u64 },
    #[error("insufficient shares: need {need}, have {have}")]
    InsufficientShares { need: u128, have: u128 },
    #[error("vault busy: {0} assets locked by live bets")]
    VaultBusy(u64),
    #[error("deposit too small to mint a share")]
    DustDeposit,
    #[error("raffle draw requires at least one weighted entry")]
    EmptyRaffle,
    #[error("table halted on a prior fault")]
    Halted,
}

/// Internal invariant breach. Not caused by any input; the table halts
/// and refuses further mutation until the fault is acknowledged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyFault {
    #[error("die value {0} out of range 1..=6")]
    DieOutOfRange(u8),
    #[error("no payout entry for {bet_type} target {target}")]
    MissingPayout { bet_type: &'static str, target: u8 },
    #[error("locked assets underflow releasing {amount} with {locked} locked")]
    LockUnderflow { amount: u64, locked: u64 },
    #[error("share accounting overflow")]
    ShareOverflow,
    #[error("share price collapsed to zero with shares outstanding")]
    SharePriceZero,
}

/// Top-level error for every fallible table operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("consistency fault: {0}")]
    Fault(#[from] ConsistencyFault),
    /// The pool could not cover a settlement in full. The capped amount
    /// was paid, the shortfall flag is set, and the table halts.
    #[error("pool insolvent: owed {owed}, paid {paid}")]
    Insolvency { owed: u64, paid: u64 },
}
