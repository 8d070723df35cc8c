//! Table facade.
//!
//! One `CrapsTable` owns a shooter hand, the live bet registry, and the
//! pooled bankroll, and runs them strictly serially: a roll is resolved to
//! completion before any other mutation is accepted. Fatal faults latch
//! the table shut; only an explicit acknowledgement reopens it.

use commonware_cryptography::ed25519::PublicKey;
use rollhouse_types::{Bet, BetStatus, BetType, PoolState, RollReport, ShooterState};
use tracing::{info, warn};

use crate::error::{EngineError, ValidationError};
use crate::raffle;
use crate::registry::BetRegistry;
use crate::settle::resolve_roll;
use crate::vault::VaultLedger;

pub struct CrapsTable {
    shooter: ShooterState,
    registry: BetRegistry,
    vault: VaultLedger,
    round: u64,
    fault: Option<EngineError>,
}

impl CrapsTable {
    pub fn new(performance_fee_bps: u16) -> Self {
        Self {
            shooter: ShooterState::new(),
            registry: BetRegistry::new(),
            vault: VaultLedger::new(performance_fee_bps),
            round: 0,
            fault: None,
        }
    }

    pub fn shooter(&self) -> &ShooterState {
        &self.shooter
    }

    pub fn active_bets(&self) -> &[Bet] {
        self.registry.bets()
    }

    pub fn pool(&self) -> &PoolState {
        self.vault.pool()
    }

    pub fn shares_of(&self, depositor: &PublicKey) -> u128 {
        self.vault.shares_of(depositor)
    }

    /// The latched fault, if the table is halted.
    pub fn fault(&self) -> Option<&EngineError> {
        self.fault.as_ref()
    }

    /// Clears the latch after the operator has inspected the fault. Pool
    /// state is left exactly as the fault left it.
    pub fn acknowledge_fault(&mut self) -> Option<EngineError> {
        self.fault.take()
    }

    fn ensure_live(&self) -> Result<(), ValidationError> {
        if self.fault.is_some() {
            return Err(ValidationError::Halted);
        }
        Ok(())
    }

    fn halt(&mut self, fault: EngineError) -> EngineError {
        warn!(%fault, "table halted");
        self.fault = Some(fault.clone());
        fault
    }

    /// Stakes pool assets on a new bet for `participant`. The stake is
    /// locked until the bet resolves.
    pub fn place_bet(
        &mut self,
        participant: &PublicKey,
        bet_type: BetType,
        target: u8,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.ensure_live()?;
        let bet = Bet {
            participant: participant.clone(),
            bet_type,
            target,
            status: BetStatus::On,
            amount,
            odds_amount: 0,
        };
        self.registry.validate_placement(&self.shooter, &bet)?;
        self.vault.lock_for_bet(amount)?;
        self.registry.push(bet);
        Ok(())
    }

    /// Backs the participant's most recent pointed contract bet with free
    /// odds, paid at true odds when it wins.
    pub fn add_odds(&mut self, participant: &PublicKey, amount: u64) -> Result<(), EngineError> {
        self.ensure_live()?;
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        let idx = self.registry.find_odds_base(participant)?;
        self.vault.lock_for_bet(amount)?;
        self.registry.add_odds_at(idx, amount);
        Ok(())
    }

    /// Resolves one oracle roll. Consumes the dice values exactly once and
    /// settles every affected bet, returning the full per-roll record.
    pub fn roll(&mut self, die1: u8, die2: u8) -> Result<RollReport, EngineError> {
        self.ensure_live()?;
        let resolution = match resolve_roll(&mut self.shooter, &mut self.registry, die1, die2) {
            Ok(resolution) => resolution,
            Err(fault) => return Err(self.halt(fault.into())),
        };
        if let Err(fault) = self.vault.release_lock(resolution.unlocked) {
            return Err(self.halt(fault.into()));
        }
        let delta = resolution.returned as i128 - resolution.unlocked as i128;
        let fee = match self.vault.apply_round_result(delta) {
            Ok(fee) => fee,
            Err(err) => return Err(self.halt(err)),
        };
        self.round += 1;
        let report = RollReport {
            round: self.round,
            die1,
            die2,
            event: resolution.event,
            phase_after: self.shooter.phase,
            point_after: self.shooter.point,
            settled: resolution.settled,
            fee_charged: fee,
            shortfall: self.vault.pool().shortfall,
        };
        info!(
            round = report.round,
            total = report.total(),
            event = ?report.event,
            settled = report.settled.len(),
            assets = self.vault.pool().total_assets,
            "roll settled"
        );
        Ok(report)
    }

    pub fn deposit(&mut self, depositor: &PublicKey, amount: u64) -> Result<u128, EngineError> {
        self.ensure_live()?;
        self.vault.deposit(depositor, amount)
    }

    pub fn withdraw(&mut self, depositor: &PublicKey, shares: u128) -> Result<u64, EngineError> {
        self.ensure_live()?;
        self.vault.withdraw(depositor, shares)
    }

    /// Share-weighted raffle draw over the current depositors. `r` comes
    /// from the external oracle; the same `r` always picks the same winner.
    pub fn draw_raffle_winner(&self, r: u64) -> Result<PublicKey, EngineError> {
        self.ensure_live()?;
        Ok(raffle::select_winner(r, &self.vault.share_snapshot())?)
    }
}
