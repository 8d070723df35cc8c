//! Deterministic share-weighted raffle.
//!
//! The entropy word comes from the same external oracle as the dice; the
//! selector itself is a pure function so any observer can recompute the
//! winner from the published draw and the share snapshot.

use commonware_cryptography::ed25519::PublicKey;

use crate::error::ValidationError;

/// Picks the depositor whose share interval contains the ticket
/// `r mod total_shares`. Zero-weight entries can never win. The snapshot
/// must be in a canonical order (the ledger emits it key-sorted).
pub fn select_winner(
    r: u64,
    snapshot: &[(PublicKey, u128)],
) -> Result<PublicKey, ValidationError> {
    let total: u128 = snapshot.iter().map(|(_, shares)| shares).sum();
    if total == 0 {
        return Err(ValidationError::EmptyRaffle);
    }
    let ticket = (r as u128) % total;
    let mut cursor = 0u128;
    for (depositor, shares) in snapshot {
        cursor += shares;
        if ticket < cursor {
            return Ok(depositor.clone());
        }
    }
    // Unreachable: the scan covers [0, total) and ticket < total.
    Err(ValidationError::EmptyRaffle)
}
