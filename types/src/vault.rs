//! Pooled bankroll state. Depositors hold shares against the pool's
//! assets; bets lock assets while live and settlement moves assets in
//! or out at resolution.

use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::craps::DEFAULT_PERFORMANCE_FEE_BPS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// Shares outstanding across all depositors.
    pub total_shares: u128,
    /// Assets backing those shares, locked portion included.
    pub total_assets: u64,
    /// Assets committed to live bets. Never exceeds total_assets.
    pub locked_assets: u64,
    /// Highest share price seen, scaled by PRICE_SCALE. Performance
    /// fees accrue only on gains above this mark.
    pub high_water_mark: u128,
    pub performance_fee_bps: u16,
    /// Fees taken so far, for reporting. Already deducted from assets.
    pub fees_collected: u64,
    /// Set when a settlement could not be paid in full. The table halts.
    pub shortfall: bool,
}

impl PoolState {
    /// Fixed-point scale for share price and the high-water mark.
    pub const PRICE_SCALE: u128 = 1_000_000_000_000;

    pub fn new(performance_fee_bps: u16) -> Self {
        Self {
            total_shares: 0,
            total_assets: 0,
            locked_assets: 0,
            high_water_mark: Self::PRICE_SCALE,
            performance_fee_bps,
            fees_collected: 0,
            shortfall: false,
        }
    }

    /// Assets not committed to live bets.
    pub fn unlocked(&self) -> u64 {
        self.total_assets.saturating_sub(self.locked_assets)
    }

    /// Current share price scaled by PRICE_SCALE. The empty pool trades
    /// at par so the first deposit mints one share per asset unit.
    pub fn share_price(&self) -> u128 {
        if self.total_shares == 0 {
            Self::PRICE_SCALE
        } else {
            (self.total_assets as u128)
                .saturating_mul(Self::PRICE_SCALE)
                .checked_div(self.total_shares)
                .unwrap_or(Self::PRICE_SCALE)
        }
    }
}

impl Default for PoolState {
    fn default() -> Self {
        Self::new(DEFAULT_PERFORMANCE_FEE_BPS)
    }
}

impl Write for PoolState {
    fn write(&self, writer: &mut impl BufMut) {
        self.total_shares.write(writer);
        self.total_assets.write(writer);
        self.locked_assets.write(writer);
        self.high_water_mark.write(writer);
        self.performance_fee_bps.write(writer);
        self.fees_collected.write(writer);
        self.shortfall.write(writer);
    }
}

impl Read for PoolState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let total_shares = u128::read(reader)?;
        let total_assets = u64::read(reader)?;
        let locked_assets = u64::read(reader)?;
        let high_water_mark = u128::read(reader)?;
        let performance_fee_bps = u16::read(reader)?;
        let fees_collected = u64::read(reader)?;
        let shortfall = bool::read(reader)?;
        if locked_assets > total_assets {
            return Err(Error::Invalid("PoolState", "locked exceeds assets"));
        }
        Ok(Self {
            total_shares,
            total_assets,
            locked_assets,
            high_water_mark,
            performance_fee_bps,
            fees_collected,
            shortfall,
        })
    }
}

impl FixedSize for PoolState {
    const SIZE: usize =
        u128::SIZE + u64::SIZE + u64::SIZE + u128::SIZE + u16::SIZE + u64::SIZE + bool::SIZE;
}

impl Serialize for PoolState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("PoolState", 7)?;
        state.serialize_field("total_shares", &self.total_shares.to_string())?;
        state.serialize_field("total_assets", &self.total_assets)?;
        state.serialize_field("locked_assets", &self.locked_assets)?;
        state.serialize_field("high_water_mark", &self.high_water_mark.to_string())?;
        state.serialize_field("performance_fee_bps", &self.performance_fee_bps)?;
        state.serialize_field("fees_collected", &self.fees_collected)?;
        state.serialize_field("shortfall", &self.shortfall)?;
        state.end()
    }
}
