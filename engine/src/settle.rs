//! Per-roll settlement.
//!
//! One call resolves every affected bet for a single dice outcome, in a
//! fixed category order so replays are byte-identical:
//!
//! 1. line and come contracts (with odds riders)
//! 2. single-roll props (Field, Next) and Muggsy's Corner
//! 3. Yes/No number bets
//! 4. hardways
//! 5. bonus counter updates, paying bets that reach their terminal maximum
//! 6. on a seven-out, finalizing every remaining bonus bet and resetting
//!    the hand
//!
//! Settlement only computes. Locking and pool movement belong to the
//! vault; the caller applies the returned totals in one batch.

use rollhouse_types::{
    Bet, BetOutcome, BetStatus, BetType, Phase, PhaseEvent, SettledBet, ShooterState, DOUBLES_ALL,
    POINT_NUMBERS, REPEATER_REQUIRED,
};
use tracing::debug;

use crate::error::ConsistencyFault;
use crate::paytable::{odds_payout, payout_for, winnings};
use crate::registry::BetRegistry;

/// Everything one roll did to the bets and the hand.
#[derive(Debug)]
pub struct RollResolution {
    pub event: PhaseEvent,
    pub settled: Vec<SettledBet>,
    /// Stake (flat + odds) released from the lock by these settlements.
    pub unlocked: u64,
    /// Assets owed back to the pool's unlocked balance: returned stakes
    /// plus winnings.
    pub returned: u64,
}

#[derive(Default)]
struct Settlements {
    resolved: Vec<usize>,
    records: Vec<SettledBet>,
    unlocked: u64,
    returned: u64,
}

impl Settlements {
    fn settle(&mut self, idx: usize, bet: &Bet, outcome: BetOutcome, returned: u64) {
        self.resolved.push(idx);
        self.unlocked = self.unlocked.saturating_add(bet.total_staked());
        self.returned = self.returned.saturating_add(returned);
        self.records.push(SettledBet {
            participant: bet.participant.clone(),
            bet_type: bet.bet_type,
            target: bet.target,
            outcome,
            wagered: bet.total_staked(),
            returned,
        });
    }

    fn win(&mut self, idx: usize, bet: &Bet, returned: u64) {
        self.settle(idx, bet, BetOutcome::Won, returned);
    }

    fn lose(&mut self, idx: usize, bet: &Bet) {
        self.settle(idx, bet, BetOutcome::Lost, 0);
    }

    fn push_back(&mut self, idx: usize, bet: &Bet) {
        self.settle(idx, bet, BetOutcome::Pushed, bet.total_staked());
    }

    fn is_resolved(&self, idx: usize) -> bool {
        self.resolved.contains(&idx)
    }
}

/// Stake plus 1:1 flat winnings plus odds at true (or lay) odds.
fn contract_return(bet: &Bet, lay: bool) -> Result<u64, ConsistencyFault> {
    let mut returned = bet.amount.saturating_mul(2);
    if bet.odds_amount > 0 {
        let (num, den) = odds_payout(bet.target, lay)?;
        returned = returned
            .saturating_add(bet.odds_amount)
            .saturating_add(winnings(bet.odds_amount, num, den));
    }
    Ok(returned)
}

/// Stake plus winnings at a paytable multiplier.
fn flat_return(
    bet: &Bet,
    bet_type: BetType,
    target: u8,
    count: u8,
) -> Result<u64, ConsistencyFault> {
    let (num, den) = payout_for(bet_type, target, count)?;
    Ok(bet.amount.saturating_add(winnings(bet.amount, num, den)))
}

/// Resolves one oracle-supplied roll against the registry and the hand
/// state. Dice outside 1..=6 are a fault; nothing is mutated in that case.
pub fn resolve_roll(
    shooter: &mut ShooterState,
    registry: &mut BetRegistry,
    die1: u8,
    die2: u8,
) -> Result<RollResolution, ConsistencyFault> {
    for die in [die1, die2] {
        if !(1..=6).contains(&die) {
            return Err(ConsistencyFault::DieOutOfRange(die));
        }
    }
    let total = die1 + die2;
    let phase_before = shooter.phase;
    let point_before = shooter.point;

    let event = match phase_before {
        Phase::ComeOut => match total {
            4 | 5 | 6 | 8 | 9 | 10 => PhaseEvent::PointEstablished(total),
            _ => PhaseEvent::None,
        },
        Phase::Point => {
            if total == 7 {
                PhaseEvent::SevenOut
            } else if total == point_before {
                PhaseEvent::PointMade(total)
            } else {
                PhaseEvent::None
            }
        }
    };
    let seven_out = event == PhaseEvent::SevenOut;
    let point_made = matches!(event, PhaseEvent::PointMade(_));

    let mut out = Settlements::default();

    // 1. Line and come contracts.
    for idx in 0..registry.len() {
        let bet = registry.bets()[idx].clone();
        match bet.bet_type {
            BetType::Pass => {
                if bet.target == 0 {
                    match total {
                        7 | 11 => out.win(idx, &bet, contract_return(&bet, false)?),
                        2 | 3 | 12 => out.lose(idx, &bet),
                        _ => {}
                    }
                } else if total == bet.target {
                    out.win(idx, &bet, contract_return(&bet, false)?);
                } else if total == 7 {
                    out.lose(idx, &bet);
                }
            }
            BetType::DontPass => {
                if bet.target == 0 {
                    match total {
                        2 | 3 => out.win(idx, &bet, contract_return(&bet, true)?),
                        12 => out.push_back(idx, &bet),
                        7 | 11 => out.lose(idx, &bet),
                        _ => {}
                    }
                } else if total == 7 {
                    out.win(idx, &bet, contract_return(&bet, true)?);
                } else if total == bet.target {
                    out.lose(idx, &bet);
                }
            }
            BetType::Come => {
                if bet.status == BetStatus::Pending {
                    match total {
                        7 | 11 => out.win(idx, &bet, contract_return(&bet, false)?),
                        2 | 3 | 12 => out.lose(idx, &bet),
                        _ => {
                            let traveling = &mut registry.bets_mut()[idx];
                            traveling.target = total;
                            traveling.status = BetStatus::On;
                        }
                    }
                } else if total == bet.target {
                    out.win(idx, &bet, contract_return(&bet, false)?);
                } else if total == 7 {
                    out.lose(idx, &bet);
                }
            }
            BetType::DontCome => {
                if bet.status == BetStatus::Pending {
                    match total {
                        2 | 3 => out.win(idx, &bet, contract_return(&bet, true)?),
                        12 => out.push_back(idx, &bet),
                        7 | 11 => out.lose(idx, &bet),
                        _ => {
                            let traveling = &mut registry.bets_mut()[idx];
                            traveling.target = total;
                            traveling.status = BetStatus::On;
                        }
                    }
                } else if total == 7 {
                    out.win(idx, &bet, contract_return(&bet, true)?);
                } else if total == bet.target {
                    out.lose(idx, &bet);
                }
            }
            _ => {}
        }
    }

    // 2. Single-roll props and Muggsy's Corner.
    for idx in 0..registry.len() {
        let bet = registry.bets()[idx].clone();
        match bet.bet_type {
            BetType::Field => match total {
                2 | 3 | 4 | 9 | 10 | 11 | 12 => {
                    out.win(idx, &bet, flat_return(&bet, BetType::Field, total, 0)?)
                }
                _ => out.lose(idx, &bet),
            },
            BetType::Next => {
                if total == bet.target {
                    out.win(idx, &bet, flat_return(&bet, BetType::Next, bet.target, 0)?);
                } else {
                    out.lose(idx, &bet);
                }
            }
            BetType::Muggsy => {
                if total == 7 {
                    let after_point = matches!(phase_before, Phase::Point) as u8;
                    out.win(idx, &bet, flat_return(&bet, BetType::Muggsy, 0, after_point)?);
                } else if point_made {
                    out.lose(idx, &bet);
                }
            }
            _ => {}
        }
    }

    // 3. Yes/No number bets.
    for idx in 0..registry.len() {
        let bet = registry.bets()[idx].clone();
        match bet.bet_type {
            BetType::Yes => {
                if total == bet.target {
                    out.win(idx, &bet, flat_return(&bet, BetType::Yes, bet.target, 0)?);
                } else if total == 7 {
                    out.lose(idx, &bet);
                }
            }
            BetType::No => {
                if total == 7 {
                    out.win(idx, &bet, flat_return(&bet, BetType::No, bet.target, 0)?);
                } else if total == bet.target {
                    out.lose(idx, &bet);
                }
            }
            _ => {}
        }
    }

    // 4. Hardways.
    for idx in 0..registry.len() {
        let bet = registry.bets()[idx].clone();
        let hard_total = match bet.bet_type {
            BetType::Hardway4 => 4,
            BetType::Hardway6 => 6,
            BetType::Hardway8 => 8,
            BetType::Hardway10 => 10,
            _ => continue,
        };
        if total == hard_total {
            if die1 == die2 {
                out.win(idx, &bet, flat_return(&bet, bet.bet_type, 0, 0)?);
            } else {
                out.lose(idx, &bet);
            }
        } else if total == 7 {
            out.lose(idx, &bet);
        }
    }

    // 5. Hand counters, phase transition, and terminal-maximum bonuses.
    shooter.record_total(total);
    if die1 == die2 {
        shooter.record_double(die1);
    }
    match event {
        PhaseEvent::PointEstablished(point) => {
            shooter.set_point(point);
            for bet in registry.bets_mut().iter_mut() {
                if matches!(bet.bet_type, BetType::Pass | BetType::DontPass) && bet.target == 0 {
                    bet.target = point;
                }
            }
        }
        PhaseEvent::PointMade(point) => {
            shooter.record_point_made(point);
            shooter.pass_streak = shooter.pass_streak.saturating_add(1);
            shooter.clear_point();
        }
        PhaseEvent::None if phase_before == Phase::ComeOut => match total {
            7 | 11 => shooter.pass_streak = shooter.pass_streak.saturating_add(1),
            2 | 3 | 12 => shooter.pass_streak = 0,
            _ => {}
        },
        _ => {}
    }

    if !seven_out {
        for idx in 0..registry.len() {
            if out.is_resolved(idx) {
                continue;
            }
            let bet = registry.bets()[idx].clone();
            match bet.bet_type {
                BetType::AtsSmall if shooter.small_complete() => {
                    out.win(idx, &bet, flat_return(&bet, BetType::AtsSmall, 0, 0)?);
                }
                BetType::AtsTall if shooter.tall_complete() => {
                    out.win(idx, &bet, flat_return(&bet, BetType::AtsTall, 0, 0)?);
                }
                BetType::AtsAll if shooter.all_complete() => {
                    out.win(idx, &bet, flat_return(&bet, BetType::AtsAll, 0, 0)?);
                }
                BetType::DifferentDoubles if shooter.doubles_mask == DOUBLES_ALL => {
                    out.win(idx, &bet, flat_return(&bet, BetType::DifferentDoubles, 0, 6)?);
                }
                BetType::HotRoller if shooter.small_tall_mask.count_ones() == 10 => {
                    out.win(idx, &bet, flat_return(&bet, BetType::HotRoller, 0, 10)?);
                }
                BetType::Fire if shooter.fire_complete() => {
                    out.win(idx, &bet, flat_return(&bet, BetType::Fire, 0, 6)?);
                }
                BetType::Repeater
                    if shooter.count_for(bet.target) >= REPEATER_REQUIRED[bet.target as usize] =>
                {
                    out.win(idx, &bet, flat_return(&bet, BetType::Repeater, bet.target, 0)?);
                }
                _ => {}
            }
        }
    }

    // 6. Seven-out: every surviving bonus bet settles against the hand's
    // accumulated counters, then the next shooter starts fresh.
    if seven_out {
        for idx in 0..registry.len() {
            if out.is_resolved(idx) {
                continue;
            }
            let bet = registry.bets()[idx].clone();
            match bet.bet_type {
                BetType::Fire => {
                    let points = shooter.fire_points() as u8;
                    if points >= 4 {
                        out.win(idx, &bet, flat_return(&bet, BetType::Fire, 0, points)?);
                    } else {
                        out.lose(idx, &bet);
                    }
                }
                BetType::AtsSmall | BetType::AtsTall | BetType::AtsAll => out.lose(idx, &bet),
                BetType::HotRoller => {
                    if shooter.small_tall_mask.count_ones() == 9 {
                        out.win(idx, &bet, flat_return(&bet, BetType::HotRoller, 0, 9)?);
                    } else {
                        out.lose(idx, &bet);
                    }
                }
                BetType::RideTheLine => {
                    if shooter.pass_streak >= 3 {
                        out.win(
                            idx,
                            &bet,
                            flat_return(&bet, BetType::RideTheLine, 0, shooter.pass_streak)?,
                        );
                    } else {
                        out.lose(idx, &bet);
                    }
                }
                BetType::Replay => {
                    let single = [bet.target];
                    let points: &[u8] = if bet.target != 0 {
                        &single
                    } else {
                        &POINT_NUMBERS
                    };
                    let mut best: Option<u64> = None;
                    for &point in points {
                        let count = shooter.made_count(point);
                        if count >= 3 {
                            let (num, den) = payout_for(BetType::Replay, point, count)?;
                            let win = winnings(bet.amount, num, den);
                            best = Some(best.map_or(win, |b| b.max(win)));
                        }
                    }
                    match best {
                        Some(win) => out.win(idx, &bet, bet.amount.saturating_add(win)),
                        None => out.lose(idx, &bet),
                    }
                }
                BetType::DifferentDoubles => {
                    let doubles = shooter.doubles_mask.count_ones() as u8;
                    if doubles >= 3 {
                        out.win(
                            idx,
                            &bet,
                            flat_return(&bet, BetType::DifferentDoubles, 0, doubles)?,
                        );
                    } else {
                        out.lose(idx, &bet);
                    }
                }
                // The 7 lands before the required repeat count.
                BetType::Repeater => out.lose(idx, &bet),
                _ => {}
            }
        }
        shooter.reset();
    }

    out.resolved.sort_unstable();
    registry.remove_sorted(&out.resolved);
    debug!(
        die1,
        die2,
        total,
        ?event,
        settled = out.records.len(),
        remaining = registry.len(),
        "roll resolved"
    );

    Ok(RollResolution {
        event,
        settled: out.records,
        unlocked: out.unlocked,
        returned: out.returned,
    })
}
