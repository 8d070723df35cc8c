use commonware_codec::{Encode, FixedSize, ReadExt};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    PrivateKeyExt, Signer,
};
use rand::{rngs::StdRng, SeedableRng};

use super::*;
use crate::vault::PoolState;

fn test_key(seed: u64) -> PublicKey {
    let mut rng = StdRng::seed_from_u64(seed);
    PrivateKey::from_rng(&mut rng).public_key()
}

#[test]
fn test_bet_type_roundtrip() {
    for raw in 0u8..=21 {
        let bet_type = BetType::try_from(raw).unwrap();
        let encoded = bet_type.encode();
        assert_eq!(encoded.len(), BetType::SIZE);
        let decoded = BetType::read(&mut &encoded[..]).unwrap();
        assert_eq!(bet_type, decoded);
    }
    assert!(BetType::try_from(22).is_err());
    assert!(BetType::read(&mut &[22u8][..]).is_err());
}

#[test]
fn test_bet_roundtrip() {
    let bet = Bet {
        participant: test_key(1),
        bet_type: BetType::Yes,
        target: 6,
        status: BetStatus::On,
        amount: 500,
        odds_amount: 0,
    };
    let encoded = bet.encode();
    assert_eq!(encoded.len(), Bet::SIZE);
    let decoded = Bet::read(&mut &encoded[..]).unwrap();
    assert_eq!(bet, decoded);
    assert_eq!(bet.total_staked(), 500);
}

#[test]
fn test_bet_type_classes() {
    assert!(BetType::Pass.is_contract());
    assert!(BetType::DontCome.is_contract());
    assert!(!BetType::Field.is_contract());
    assert!(BetType::Next.is_single_roll());
    assert!(BetType::Field.is_single_roll());
    assert!(!BetType::Yes.is_single_roll());
    assert!(BetType::Fire.is_bonus());
    assert!(BetType::Repeater.is_bonus());
    assert!(!BetType::Hardway8.is_bonus());
    assert!(BetType::Repeater.requires_target());
    assert!(!BetType::Fire.requires_target());
}

#[test]
fn test_shooter_state_roundtrip() {
    let mut shooter = ShooterState::new();
    shooter.set_point(6);
    shooter.record_total(6);
    shooter.record_total(8);
    shooter.record_double(4);
    shooter.record_point_made(6);
    shooter.pass_streak = 2;
    assert_eq!(shooter.made_count(6), 1);
    assert_eq!(shooter.fire_points(), 1);

    let encoded = shooter.encode();
    assert_eq!(encoded.len(), ShooterState::SIZE);
    let decoded = ShooterState::read(&mut &encoded[..]).unwrap();
    assert_eq!(shooter, decoded);
}

#[test]
fn test_shooter_state_rejects_inconsistent_phase() {
    let mut shooter = ShooterState::new();
    shooter.set_point(9);
    let mut encoded = shooter.encode().to_vec();
    // Zero the point byte while leaving the phase as Point.
    encoded[1] = 0;
    assert!(ShooterState::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_shooter_progress_tracking() {
    let mut shooter = ShooterState::new();
    assert!(shooter.is_fresh());
    for total in [2, 3, 4, 5, 6] {
        shooter.record_total(total);
    }
    assert!(shooter.small_complete());
    assert!(!shooter.tall_complete());
    for total in [8, 9, 10, 11, 12] {
        shooter.record_total(total);
    }
    assert!(shooter.all_complete());
    assert!(!shooter.is_fresh());
    assert_eq!(shooter.count_for(6), 1);
    assert_eq!(shooter.count_for(7), 0);

    shooter.record_double(3);
    shooter.record_double(3);
    shooter.record_double(6);
    assert_eq!(shooter.doubles_mask.count_ones(), 2);

    shooter.reset();
    assert!(shooter.is_fresh());
    assert_eq!(shooter, ShooterState::new());
}

#[test]
fn test_roll_report_roundtrip() {
    let report = RollReport {
        round: 42,
        die1: 3,
        die2: 4,
        event: PhaseEvent::SevenOut,
        phase_after: Phase::ComeOut,
        point_after: 0,
        fee_charged: 0,
        shortfall: false,
        settled: vec![
            SettledBet {
                participant: test_key(2),
                bet_type: BetType::Pass,
                target: 6,
                outcome: BetOutcome::Lost,
                wagered: 100,
                returned: 0,
            },
            SettledBet {
                participant: test_key(3),
                bet_type: BetType::No,
                target: 4,
                outcome: BetOutcome::Won,
                wagered: 100,
                returned: 149,
            },
        ],
    };
    let encoded = report.encode();
    let decoded = RollReport::read(&mut &encoded[..]).unwrap();
    assert_eq!(report, decoded);
    assert_eq!(report.total(), 7);
    assert_eq!(report.total_wagered(), 200);
    assert_eq!(report.total_returned(), 149);
    assert_eq!(report.net_delta(), -51);
}

#[test]
fn test_roll_report_rejects_bad_die() {
    let report = RollReport {
        round: 1,
        die1: 2,
        die2: 5,
        event: PhaseEvent::None,
        phase_after: Phase::ComeOut,
        point_after: 0,
        settled: vec![],
        fee_charged: 0,
        shortfall: false,
    };
    let mut encoded = report.encode().to_vec();
    encoded[8] = 7; // die1 sits after the round number
    assert!(RollReport::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_roll_report_serde() {
    let report = RollReport {
        round: 7,
        die1: 5,
        die2: 5,
        event: PhaseEvent::PointEstablished(10),
        phase_after: Phase::Point,
        point_after: 10,
        fee_charged: 12,
        shortfall: false,
        settled: vec![SettledBet {
            participant: test_key(4),
            bet_type: BetType::Field,
            target: 0,
            outcome: BetOutcome::Won,
            wagered: 50,
            returned: 150,
        }],
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["event"], "point_established");
    assert_eq!(json["point"], 10);
    assert_eq!(json["settled"][0]["bet_type"], "field");
    assert_eq!(json["settled"][0]["outcome"], "won");
    assert_eq!(
        json["settled"][0]["participant"].as_str().unwrap().len(),
        64
    );
}

#[test]
fn test_pool_state_roundtrip() {
    let mut pool = PoolState::new(500);
    pool.total_shares = 1_000_000;
    pool.total_assets = 1_200_000;
    pool.locked_assets = 300_000;
    pool.fees_collected = 4_000;
    let encoded = pool.encode();
    assert_eq!(encoded.len(), PoolState::SIZE);
    let decoded = PoolState::read(&mut &encoded[..]).unwrap();
    assert_eq!(pool, decoded);
    assert_eq!(pool.unlocked(), 900_000);
}

#[test]
fn test_pool_state_rejects_overlocked() {
    let mut pool = PoolState::new(500);
    pool.total_shares = 100;
    pool.total_assets = 100;
    pool.locked_assets = 100;
    let mut encoded = pool.encode().to_vec();
    // Bump locked_assets above total_assets.
    encoded[16 + 8] = 1;
    assert!(PoolState::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_share_price() {
    let empty = PoolState::new(500);
    assert_eq!(empty.share_price(), PoolState::PRICE_SCALE);

    let mut pool = PoolState::new(500);
    pool.total_shares = 1_000;
    pool.total_assets = 1_500;
    assert_eq!(pool.share_price(), PoolState::PRICE_SCALE * 3 / 2);
}

#[test]
fn test_repeater_table_shape() {
    for total in 2..=12u8 {
        if total == 7 {
            assert_eq!(REPEATER_REQUIRED[total as usize], 0);
        } else {
            assert!(REPEATER_REQUIRED[total as usize] >= 2);
            // Symmetric around 7.
            assert_eq!(
                REPEATER_REQUIRED[total as usize],
                REPEATER_REQUIRED[(14 - total) as usize]
            );
        }
    }
}
