//! Active bets and placement legality.
//!
//! The registry holds every live wager and enforces the placement rules:
//! line bets only on the come-out, come bets only behind a point, bonus
//! bets only on a fresh hand and once per participant per hand. It never
//! touches pool balances, the table locks stakes around it.

use commonware_cryptography::ed25519::PublicKey;
use rollhouse_types::{
    is_box_total, is_point_number, Bet, BetStatus, BetType, Phase, ShooterState, MAX_ACTIVE_BETS,
};

use crate::error::ValidationError;

#[derive(Clone, Debug, Default)]
pub struct BetRegistry {
    bets: Vec<Bet>,
}

impl BetRegistry {
    pub fn new() -> Self {
        Self { bets: Vec::new() }
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub(crate) fn bets_mut(&mut self) -> &mut Vec<Bet> {
        &mut self.bets
    }

    /// Checks a placement against phase, target, and hand rules without
    /// mutating anything.
    pub fn validate_placement(
        &self,
        shooter: &ShooterState,
        bet: &Bet,
    ) -> Result<(), ValidationError> {
        let name = bet.bet_type.name();
        if bet.amount == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        if self.bets.len() >= MAX_ACTIVE_BETS {
            return Err(ValidationError::TableFull(self.bets.len()));
        }
        // Untargeted categories must come in with target 0. Replay is the one
        // exception: its target optionally pins a specific point.
        if !bet.bet_type.requires_target()
            && bet.bet_type != BetType::Replay
            && bet.target != 0
        {
            return Err(ValidationError::InvalidTarget(name, bet.target));
        }
        match bet.bet_type {
            BetType::Pass | BetType::DontPass => {
                if shooter.phase != Phase::ComeOut {
                    return Err(ValidationError::WrongPhase(name));
                }
            }
            BetType::Come | BetType::DontCome => {
                if shooter.phase != Phase::Point {
                    return Err(ValidationError::WrongPhase(name));
                }
            }
            BetType::Yes | BetType::No => {
                if bet.target == 0 {
                    return Err(ValidationError::MissingTarget(name));
                }
                if !is_box_total(bet.target) {
                    return Err(ValidationError::InvalidTarget(name, bet.target));
                }
            }
            BetType::Next => {
                if bet.target == 0 {
                    return Err(ValidationError::MissingTarget(name));
                }
                if !(2..=12).contains(&bet.target) {
                    return Err(ValidationError::InvalidTarget(name, bet.target));
                }
            }
            BetType::Field
            | BetType::Hardway4
            | BetType::Hardway6
            | BetType::Hardway8
            | BetType::Hardway10 => {}
            _ if bet.bet_type.is_bonus() => {
                if !shooter.is_fresh() {
                    return Err(ValidationError::HandInProgress(name));
                }
                match bet.bet_type {
                    BetType::Repeater => {
                        if bet.target == 0 {
                            return Err(ValidationError::MissingTarget(name));
                        }
                        if !is_box_total(bet.target) {
                            return Err(ValidationError::InvalidTarget(name, bet.target));
                        }
                    }
                    BetType::Replay => {
                        if bet.target != 0 && !is_point_number(bet.target) {
                            return Err(ValidationError::InvalidTarget(name, bet.target));
                        }
                    }
                    _ => {}
                }
                let duplicate = self.bets.iter().any(|b| {
                    b.participant == bet.participant
                        && b.bet_type == bet.bet_type
                        && b.target == bet.target
                });
                if duplicate {
                    return Err(ValidationError::DuplicateBonus(name));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Adds a validated bet. Come and Don't Come start pending until their
    /// first roll gives them a point.
    pub(crate) fn push(&mut self, mut bet: Bet) {
        if matches!(bet.bet_type, BetType::Come | BetType::DontCome) {
            bet.status = BetStatus::Pending;
            bet.target = 0;
        }
        self.bets.push(bet);
    }

    /// Attaches free odds to the participant's most recent contract bet
    /// that already has a point. Returns the bet index and the new odds
    /// total so the caller can lock the stake.
    pub fn find_odds_base(&self, participant: &PublicKey) -> Result<usize, ValidationError> {
        self.bets
            .iter()
            .rposition(|b| {
                b.participant == *participant && b.bet_type.is_contract() && b.target != 0
            })
            .ok_or(ValidationError::NoOddsBase)
    }

    pub(crate) fn add_odds_at(&mut self, idx: usize, amount: u64) {
        if let Some(bet) = self.bets.get_mut(idx) {
            bet.odds_amount = bet.odds_amount.saturating_add(amount);
        }
    }

    /// Total currently staked across all live bets.
    pub fn total_staked(&self) -> u64 {
        self.bets
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(b.total_staked()))
    }

    /// Removes the given bet indices. Indices must be sorted ascending;
    /// removal runs in reverse so earlier indices stay valid.
    pub(crate) fn remove_sorted(&mut self, indices: &[usize]) {
        for &idx in indices.iter().rev() {
            if idx < self.bets.len() {
                self.bets.remove(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_cryptography::{ed25519::PrivateKey, PrivateKeyExt, Signer};
    use rand::{rngs::StdRng, SeedableRng};

    fn key(seed: u64) -> PublicKey {
        let mut rng = StdRng::seed_from_u64(seed);
        PrivateKey::from_rng(&mut rng).public_key()
    }

    fn bet(bet_type: BetType, target: u8, amount: u64) -> Bet {
        Bet {
            participant: key(1),
            bet_type,
            target,
            status: BetStatus::On,
            amount,
            odds_amount: 0,
        }
    }

    #[test]
    fn test_phase_rules() {
        let registry = BetRegistry::new();
        let fresh = ShooterState::new();
        let mut pointed = ShooterState::new();
        pointed.record_total(6);
        pointed.set_point(6);

        assert!(registry.validate_placement(&fresh, &bet(BetType::Pass, 0, 10)).is_ok());
        assert_eq!(
            registry.validate_placement(&pointed, &bet(BetType::Pass, 0, 10)),
            Err(ValidationError::WrongPhase("pass"))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Come, 0, 10)),
            Err(ValidationError::WrongPhase("come"))
        );
        assert!(registry.validate_placement(&pointed, &bet(BetType::Come, 0, 10)).is_ok());
        // Single-roll and number bets work in either phase.
        assert!(registry.validate_placement(&fresh, &bet(BetType::Field, 0, 10)).is_ok());
        assert!(registry.validate_placement(&pointed, &bet(BetType::Yes, 6, 10)).is_ok());
    }

    #[test]
    fn test_target_rules() {
        let registry = BetRegistry::new();
        let fresh = ShooterState::new();
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Yes, 0, 10)),
            Err(ValidationError::MissingTarget("yes"))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Yes, 7, 10)),
            Err(ValidationError::InvalidTarget("yes", 7))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Next, 13, 10)),
            Err(ValidationError::InvalidTarget("next", 13))
        );
        assert!(registry.validate_placement(&fresh, &bet(BetType::Next, 7, 10)).is_ok());
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Repeater, 7, 10)),
            Err(ValidationError::InvalidTarget("repeater", 7))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Pass, 0, 0)),
            Err(ValidationError::ZeroAmount)
        );
    }

    #[test]
    fn test_untargeted_bets_reject_preset_target() {
        let registry = BetRegistry::new();
        let fresh = ShooterState::new();
        // A line bet smuggled in with a point would skip the come-out entirely.
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::DontPass, 12, 100)),
            Err(ValidationError::InvalidTarget("dont_pass", 12))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Pass, 6, 100)),
            Err(ValidationError::InvalidTarget("pass", 6))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Field, 5, 100)),
            Err(ValidationError::InvalidTarget("field", 5))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Hardway8, 8, 100)),
            Err(ValidationError::InvalidTarget("hardway_8", 8))
        );
        // Replay may pin a specific point, nothing else.
        assert!(registry.validate_placement(&fresh, &bet(BetType::Replay, 6, 100)).is_ok());
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Fire, 4, 100)),
            Err(ValidationError::InvalidTarget("fire", 4))
        );
    }

    #[test]
    fn test_bonus_duplicate_cannot_hide_behind_target() {
        let mut registry = BetRegistry::new();
        let fresh = ShooterState::new();
        registry.push(bet(BetType::AtsSmall, 0, 10));
        // A second small with a bogus target is rejected before the duplicate
        // check could be keyed apart by it.
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::AtsSmall, 3, 10)),
            Err(ValidationError::InvalidTarget("ats_small", 3))
        );
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::AtsSmall, 0, 10)),
            Err(ValidationError::DuplicateBonus("ats_small"))
        );
    }

    #[test]
    fn test_bonus_fresh_hand_and_duplicates() {
        let mut registry = BetRegistry::new();
        let fresh = ShooterState::new();
        let mut rolled = ShooterState::new();
        rolled.record_total(8);

        assert!(registry.validate_placement(&fresh, &bet(BetType::Fire, 0, 10)).is_ok());
        assert_eq!(
            registry.validate_placement(&rolled, &bet(BetType::Fire, 0, 10)),
            Err(ValidationError::HandInProgress("fire"))
        );

        registry.push(bet(BetType::Fire, 0, 10));
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Fire, 0, 10)),
            Err(ValidationError::DuplicateBonus("fire"))
        );
        // Same category from another participant is fine.
        let mut other = bet(BetType::Fire, 0, 10);
        other.participant = key(2);
        assert!(registry.validate_placement(&fresh, &other).is_ok());
        // Different repeater targets are distinct bets.
        registry.push(bet(BetType::Repeater, 6, 10));
        assert!(registry.validate_placement(&fresh, &bet(BetType::Repeater, 8, 10)).is_ok());
    }

    #[test]
    fn test_come_starts_pending() {
        let mut registry = BetRegistry::new();
        registry.push(bet(BetType::Come, 0, 25));
        assert_eq!(registry.bets()[0].status, BetStatus::Pending);
        assert_eq!(registry.bets()[0].target, 0);
    }

    #[test]
    fn test_odds_attachment() {
        let mut registry = BetRegistry::new();
        assert_eq!(registry.find_odds_base(&key(1)), Err(ValidationError::NoOddsBase));

        let mut pass = bet(BetType::Pass, 0, 100);
        pass.target = 6; // point established
        registry.push(pass);
        let idx = registry.find_odds_base(&key(1)).unwrap();
        registry.add_odds_at(idx, 200);
        assert_eq!(registry.bets()[0].odds_amount, 200);
        assert_eq!(registry.total_staked(), 300);

        // A contract bet without a point is not an odds base.
        assert_eq!(registry.find_odds_base(&key(2)), Err(ValidationError::NoOddsBase));
    }

    #[test]
    fn test_table_cap() {
        let mut registry = BetRegistry::new();
        let fresh = ShooterState::new();
        for _ in 0..MAX_ACTIVE_BETS {
            registry.push(bet(BetType::Field, 0, 1));
        }
        assert_eq!(
            registry.validate_placement(&fresh, &bet(BetType::Field, 0, 1)),
            Err(ValidationError::TableFull(MAX_ACTIVE_BETS))
        );
    }

    #[test]
    fn test_remove_sorted() {
        let mut registry = BetRegistry::new();
        for amount in 1..=5 {
            registry.push(bet(BetType::Field, 0, amount));
        }
        registry.remove_sorted(&[1, 3]);
        let amounts: Vec<u64> = registry.bets().iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![1, 3, 5]);
    }
}
