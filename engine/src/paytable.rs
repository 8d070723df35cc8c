//! Exact rational payout schedule.
//!
//! Every multiplier is a reduced `(numerator, denominator)` pair; winnings
//! are `stake * num / den` with truncation toward zero so rounding always
//! favors the pool. The number bets (Yes/No/Next) price true odds scaled by
//! 49/50, a uniform 2% haircut on fair winnings for every target.

use rollhouse_types::BetType;

use crate::error::ConsistencyFault;

/// Winnings multiplier for a resolved winning bet. `count` feeds the tiered
/// bonus ladders (points made, streak length, repeats, doubles, totals).
pub fn payout_for(bet_type: BetType, target: u8, count: u8) -> Result<(u64, u64), ConsistencyFault> {
    let miss = || ConsistencyFault::MissingPayout {
        bet_type: bet_type.name(),
        target,
    };
    match bet_type {
        BetType::Pass | BetType::Come | BetType::DontPass | BetType::DontCome => Ok((1, 1)),
        BetType::RideTheLine => match count {
            3 => Ok((2, 1)),
            4 => Ok((3, 1)),
            5 => Ok((5, 1)),
            6 => Ok((8, 1)),
            7 => Ok((10, 1)),
            8 => Ok((15, 1)),
            9 => Ok((25, 1)),
            10 => Ok((40, 1)),
            11.. => Ok((150, 1)),
            _ => Err(miss()),
        },
        BetType::Field => match target {
            2 => Ok((2, 1)),
            12 => Ok((3, 1)),
            3 | 4 | 9 | 10 | 11 => Ok((1, 1)),
            _ => Err(miss()),
        },
        BetType::Yes => match target {
            4 | 10 => Ok((49, 25)),
            5 | 9 => Ok((147, 100)),
            6 | 8 => Ok((147, 125)),
            2 | 12 => Ok((147, 25)),
            3 | 11 => Ok((147, 50)),
            _ => Err(miss()),
        },
        BetType::No => match target {
            4 | 10 => Ok((49, 100)),
            5 | 9 => Ok((49, 75)),
            6 | 8 => Ok((49, 60)),
            3 | 11 => Ok((49, 150)),
            2 | 12 => Ok((49, 300)),
            _ => Err(miss()),
        },
        BetType::Next => match target {
            2 | 12 => Ok((343, 10)),
            3 | 11 => Ok((833, 50)),
            4 | 10 => Ok((539, 50)),
            5 | 9 => Ok((196, 25)),
            6 | 8 => Ok((1519, 250)),
            7 => Ok((49, 10)),
            _ => Err(miss()),
        },
        BetType::Hardway4 | BetType::Hardway10 => Ok((7, 1)),
        BetType::Hardway6 | BetType::Hardway8 => Ok((9, 1)),
        BetType::Fire => match count {
            4 => Ok((24, 1)),
            5 => Ok((249, 1)),
            6 => Ok((999, 1)),
            _ => Err(miss()),
        },
        BetType::AtsSmall | BetType::AtsTall => Ok((34, 1)),
        BetType::AtsAll => Ok((175, 1)),
        BetType::HotRoller => match count {
            9 => Ok((20, 1)),
            10 => Ok((80, 1)),
            _ => Err(miss()),
        },
        BetType::Muggsy => match count {
            // Seven on the come-out.
            0 => Ok((2, 1)),
            // Seven-out after a point was established.
            _ => Ok((3, 1)),
        },
        BetType::Replay => match (target, count) {
            (4 | 10, 3) => Ok((120, 1)),
            (4 | 10, 4..) => Ok((1000, 1)),
            (5 | 9, 3) => Ok((95, 1)),
            (5 | 9, 4..) => Ok((500, 1)),
            (6 | 8, 3) => Ok((70, 1)),
            (6 | 8, 4..) => Ok((100, 1)),
            _ => Err(miss()),
        },
        BetType::DifferentDoubles => match count {
            3 => Ok((4, 1)),
            4 => Ok((8, 1)),
            5 => Ok((15, 1)),
            6 => Ok((100, 1)),
            _ => Err(miss()),
        },
        BetType::Repeater => match target {
            2 | 12 => Ok((40, 1)),
            3 | 11 => Ok((50, 1)),
            4 | 10 => Ok((65, 1)),
            5 | 9 => Ok((80, 1)),
            6 | 8 => Ok((90, 1)),
            _ => Err(miss()),
        },
    }
}

/// True-odds multiplier for pass/come odds behind a point.
pub fn odds_payout(point: u8, lay: bool) -> Result<(u64, u64), ConsistencyFault> {
    let (num, den) = match point {
        4 | 10 => (2, 1),
        5 | 9 => (3, 2),
        6 | 8 => (6, 5),
        _ => {
            return Err(ConsistencyFault::MissingPayout {
                bet_type: if lay { "lay_odds" } else { "odds" },
                target: point,
            })
        }
    };
    if lay {
        Ok((den, num))
    } else {
        Ok((num, den))
    }
}

/// Winnings for a stake at a rational multiplier, truncating toward zero.
/// Widened through u128 so no intermediate product can overflow.
pub fn winnings(stake: u64, num: u64, den: u64) -> u64 {
    if den == 0 {
        return 0;
    }
    let exact = (stake as u128) * (num as u128) / (den as u128);
    u64::try_from(exact).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollhouse_types::WAYS;

    #[test]
    fn test_number_bets_pay_true_odds_less_two_percent() {
        // Yes(n) pays (6/w) * 49/50, so 50 * w * num == 294 * den exactly.
        for target in [2u8, 3, 4, 5, 6, 8, 9, 10, 11, 12] {
            let (num, den) = payout_for(BetType::Yes, target, 0).unwrap();
            let w = WAYS[target as usize] as u64;
            assert_eq!(50 * w * num, 294 * den, "yes {target}");
        }
        // No(n) pays (w/6) * 49/50, so 300 * num == 49 * w * den exactly.
        for target in [2u8, 3, 4, 5, 6, 8, 9, 10, 11, 12] {
            let (num, den) = payout_for(BetType::No, target, 0).unwrap();
            let w = WAYS[target as usize] as u64;
            assert_eq!(300 * num, 49 * w * den, "no {target}");
        }
        // Next(t) pays ((36 - w) / w) * 49/50.
        for target in 2u8..=12 {
            let (num, den) = payout_for(BetType::Next, target, 0).unwrap();
            let w = WAYS[target as usize] as u64;
            assert_eq!(50 * w * num, 49 * (36 - w) * den, "next {target}");
        }
    }

    #[test]
    fn test_odds_are_fair() {
        for point in [4u8, 5, 6, 8, 9, 10] {
            let (num, den) = odds_payout(point, false).unwrap();
            let w = WAYS[point as usize] as u64;
            // True odds: 6 sevens against w ways to hit the point.
            assert_eq!(num * w, den * 6, "point {point}");
            let (lnum, lden) = odds_payout(point, true).unwrap();
            assert_eq!((lnum, lden), (den, num));
        }
        assert!(odds_payout(7, false).is_err());
    }

    #[test]
    fn test_bonus_ladders() {
        assert_eq!(payout_for(BetType::Fire, 0, 6).unwrap(), (999, 1));
        assert!(payout_for(BetType::Fire, 0, 3).is_err());
        assert_eq!(payout_for(BetType::RideTheLine, 0, 11).unwrap(), (150, 1));
        assert_eq!(payout_for(BetType::RideTheLine, 0, 15).unwrap(), (150, 1));
        assert!(payout_for(BetType::RideTheLine, 0, 2).is_err());
        assert_eq!(payout_for(BetType::Replay, 4, 3).unwrap(), (120, 1));
        assert_eq!(payout_for(BetType::Replay, 4, 5).unwrap(), (1000, 1));
        assert_eq!(payout_for(BetType::Replay, 8, 4).unwrap(), (100, 1));
        assert_eq!(payout_for(BetType::HotRoller, 0, 10).unwrap(), (80, 1));
        assert!(payout_for(BetType::HotRoller, 0, 8).is_err());
        assert_eq!(payout_for(BetType::DifferentDoubles, 0, 6).unwrap(), (100, 1));
    }

    #[test]
    fn test_field_edges() {
        assert_eq!(payout_for(BetType::Field, 2, 0).unwrap(), (2, 1));
        assert_eq!(payout_for(BetType::Field, 12, 0).unwrap(), (3, 1));
        assert_eq!(payout_for(BetType::Field, 9, 0).unwrap(), (1, 1));
        assert!(payout_for(BetType::Field, 7, 0).is_err());
    }

    #[test]
    fn test_winnings_truncate_toward_zero() {
        assert_eq!(winnings(100, 147, 125), 117);
        assert_eq!(winnings(7, 49, 300), 1);
        assert_eq!(winnings(1, 49, 300), 0);
        assert_eq!(winnings(u64::MAX, 999, 1), u64::MAX);
        assert_eq!(winnings(10, 1, 0), 0);
    }
}
