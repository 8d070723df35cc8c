//! Share-accounted pooled bankroll.
//!
//! Depositors mint shares at the current share price and redeem them the
//! same way, so every win and loss is absorbed proportionally. Stakes are
//! locked while bets ride and released at settlement; deposits and
//! withdrawals are rejected outright while anything is locked, which keeps
//! share pricing outside of any in-flight round.
//!
//! The performance fee uses a high-water mark on share price: it is taken
//! only from profit that lifts the price above the best level any
//! depositor has ever held, so principal and recovered drawdowns are never
//! charged.

use std::collections::BTreeMap;

use commonware_cryptography::ed25519::PublicKey;
use rollhouse_types::PoolState;
use tracing::{debug, warn};

use crate::error::{ConsistencyFault, EngineError, ValidationError};

#[derive(Clone, Debug)]
pub struct VaultLedger {
    pool: PoolState,
    accounts: BTreeMap<PublicKey, u128>,
}

impl VaultLedger {
    pub fn new(performance_fee_bps: u16) -> Self {
        Self {
            pool: PoolState::new(performance_fee_bps),
            accounts: BTreeMap::new(),
        }
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    pub fn shares_of(&self, depositor: &PublicKey) -> u128 {
        self.accounts.get(depositor).copied().unwrap_or(0)
    }

    /// Ordered share snapshot for raffle weighting.
    pub fn share_snapshot(&self) -> Vec<(PublicKey, u128)> {
        self.accounts
            .iter()
            .map(|(pk, shares)| (pk.clone(), *shares))
            .collect()
    }

    /// Mints shares at the current price. Rejected while any stake is
    /// locked so depositors cannot trade against a round in flight.
    pub fn deposit(&mut self, depositor: &PublicKey, amount: u64) -> Result<u128, EngineError> {
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        if self.pool.locked_assets > 0 {
            return Err(ValidationError::VaultBusy(self.pool.locked_assets).into());
        }
        let shares = if self.pool.total_shares == 0 {
            amount as u128
        } else {
            if self.pool.total_assets == 0 {
                return Err(ConsistencyFault::SharePriceZero.into());
            }
            (amount as u128)
                .saturating_mul(self.pool.total_shares)
                .checked_div(self.pool.total_assets as u128)
                .ok_or(ConsistencyFault::ShareOverflow)?
        };
        if shares == 0 {
            return Err(ValidationError::DustDeposit.into());
        }
        self.pool.total_shares = self
            .pool
            .total_shares
            .checked_add(shares)
            .ok_or(ConsistencyFault::ShareOverflow)?;
        self.pool.total_assets = self
            .pool
            .total_assets
            .checked_add(amount)
            .ok_or(ConsistencyFault::ShareOverflow)?;
        *self.accounts.entry(depositor.clone()).or_insert(0) += shares;
        debug!(amount, shares, assets = self.pool.total_assets, "deposit");
        Ok(shares)
    }

    /// Burns shares at the current price and returns the redeemed assets.
    pub fn withdraw(&mut self, depositor: &PublicKey, shares: u128) -> Result<u64, EngineError> {
        if shares == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        if self.pool.locked_assets > 0 {
            return Err(ValidationError::VaultBusy(self.pool.locked_assets).into());
        }
        let held = self.shares_of(depositor);
        if shares > held {
            return Err(ValidationError::InsufficientShares { need: shares, have: held }.into());
        }
        let amount_wide = shares
            .saturating_mul(self.pool.total_assets as u128)
            .checked_div(self.pool.total_shares)
            .ok_or(ConsistencyFault::SharePriceZero)?;
        let amount = u64::try_from(amount_wide).map_err(|_| ConsistencyFault::ShareOverflow)?;
        self.pool.total_shares -= shares;
        self.pool.total_assets -= amount;
        let remaining = held - shares;
        if remaining == 0 {
            self.accounts.remove(depositor);
        } else {
            self.accounts.insert(depositor.clone(), remaining);
        }
        debug!(amount, shares, assets = self.pool.total_assets, "withdraw");
        Ok(amount)
    }

    /// Locks stake for a newly placed bet.
    pub fn lock_for_bet(&mut self, amount: u64) -> Result<(), ValidationError> {
        let unlocked = self.pool.unlocked();
        if amount > unlocked {
            return Err(ValidationError::InsufficientUnlocked { need: amount, have: unlocked });
        }
        self.pool.locked_assets += amount;
        Ok(())
    }

    /// Releases stake locked by settled bets.
    pub fn release_lock(&mut self, amount: u64) -> Result<(), ConsistencyFault> {
        if amount > self.pool.locked_assets {
            return Err(ConsistencyFault::LockUnderflow {
                amount,
                locked: self.pool.locked_assets,
            });
        }
        self.pool.locked_assets -= amount;
        Ok(())
    }

    /// Applies one roll's signed net result to the pool, skimming the
    /// performance fee from any profit above the high-water mark.
    ///
    /// A loss larger than the pool can cover is paid up to the available
    /// assets; the shortfall is flagged and surfaced as an error so the
    /// caller halts the table.
    pub fn apply_round_result(&mut self, delta: i128) -> Result<u64, EngineError> {
        if delta >= 0 {
            let gain = u64::try_from(delta).map_err(|_| ConsistencyFault::ShareOverflow)?;
            self.pool.total_assets = self
                .pool
                .total_assets
                .checked_add(gain)
                .ok_or(ConsistencyFault::ShareOverflow)?;
            let fee = self.skim_performance_fee();
            return Ok(fee);
        }

        let loss = u64::try_from(-delta).map_err(|_| ConsistencyFault::ShareOverflow)?;
        if loss > self.pool.total_assets {
            let paid = self.pool.total_assets;
            self.pool.total_assets = 0;
            self.pool.locked_assets = 0;
            self.pool.shortfall = true;
            warn!(owed = loss, paid, "pool insolvent");
            return Err(EngineError::Insolvency { owed: loss, paid });
        }
        self.pool.total_assets -= loss;
        Ok(0)
    }

    /// Fee on share-price gains above the high-water mark. No fee while no
    /// shares exist or while the price sits at or under the mark.
    fn skim_performance_fee(&mut self) -> u64 {
        if self.pool.total_shares == 0 {
            return 0;
        }
        // Assets the pool would hold at exactly the marked price.
        let base_wide = self
            .pool
            .high_water_mark
            .saturating_mul(self.pool.total_shares)
            / PoolState::PRICE_SCALE;
        let base = u64::try_from(base_wide).unwrap_or(u64::MAX);
        if self.pool.total_assets <= base {
            return 0;
        }
        let excess = self.pool.total_assets - base;
        let fee_wide =
            (excess as u128) * (self.pool.performance_fee_bps as u128) / 10_000u128;
        let fee = u64::try_from(fee_wide).unwrap_or(0);
        self.pool.total_assets -= fee;
        self.pool.fees_collected = self.pool.fees_collected.saturating_add(fee);
        self.pool.high_water_mark = self.pool.share_price();
        if fee > 0 {
            debug!(fee, hwm = %self.pool.high_water_mark, "performance fee");
        }
        fee
    }
}
