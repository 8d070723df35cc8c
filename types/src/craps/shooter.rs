use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};

use super::constants::{ALL_MASK, FIRE_ALL_POINTS, SMALL_MASK, TALL_MASK};

/// Table phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    ComeOut = 0,
    Point = 1,
}

impl Write for Phase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Phase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::ComeOut),
            1 => Ok(Self::Point),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Phase {
    const SIZE: usize = 1;
}

/// What a roll did to the table phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    None,
    PointEstablished(u8),
    PointMade(u8),
    SevenOut,
}

/// Per-hand state for the current shooter. A hand runs from the first
/// come-out roll until seven-out; bonus bets accumulate across it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShooterState {
    pub phase: Phase,
    /// Established point, 0 during come-out.
    pub point: u8,
    /// Points made this hand (Fire progress is the mask, this is the count).
    pub points_made_count: u8,
    /// Bit i set when point POINT_NUMBERS[i] has been MADE this hand.
    pub fire_mask: u8,
    /// Bit d-1 set when double d-d has been rolled this hand.
    pub doubles_mask: u8,
    /// Bits for totals 2..6 (0..4) and 8..12 (5..9) rolled this hand.
    pub small_tall_mask: u16,
    /// Times each total 2..=12 has landed this hand. Index 0 is total 2.
    pub roll_counts: [u8; 11],
    /// Times each point 4..=10 has been made this hand. Index 0 is point 4;
    /// the slot for 7 is unused.
    pub made_counts: [u8; 7],
    /// Consecutive pass-line wins this hand (Ride the Line progress).
    pub pass_streak: u8,
    /// Rolls thrown this hand.
    pub rolls_this_hand: u16,
}

impl Default for ShooterState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShooterState {
    pub fn new() -> Self {
        Self {
            phase: Phase::ComeOut,
            point: 0,
            points_made_count: 0,
            fire_mask: 0,
            doubles_mask: 0,
            small_tall_mask: 0,
            roll_counts: [0; 11],
            made_counts: [0; 7],
            pass_streak: 0,
            rolls_this_hand: 0,
        }
    }

    pub fn has_point(&self) -> bool {
        self.phase == Phase::Point
    }

    /// A hand with no rolls thrown yet. Bonus bets may only join here.
    pub fn is_fresh(&self) -> bool {
        self.rolls_this_hand == 0
    }

    pub fn set_point(&mut self, total: u8) {
        self.phase = Phase::Point;
        self.point = total;
    }

    pub fn clear_point(&mut self) {
        self.phase = Phase::ComeOut;
        self.point = 0;
    }

    /// Seven-out. The hand ends and the next shooter starts fresh.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bit position for a point number in the fire mask.
    pub fn fire_bit(point: u8) -> u8 {
        match point {
            4 => 1 << 0,
            5 => 1 << 1,
            6 => 1 << 2,
            8 => 1 << 3,
            9 => 1 << 4,
            10 => 1 << 5,
            _ => 0,
        }
    }

    /// Distinct points made this hand, per the fire mask.
    pub fn fire_points(&self) -> u32 {
        self.fire_mask.count_ones()
    }

    /// All six points made this hand.
    pub fn fire_complete(&self) -> bool {
        self.fire_mask == FIRE_ALL_POINTS
    }

    /// Bit position for a total in the small/tall mask, or None for 7.
    pub fn small_tall_bit(total: u8) -> Option<u16> {
        match total {
            2..=6 => Some(1 << (total - 2)),
            8..=12 => Some(1 << (total - 3)),
            _ => None,
        }
    }

    pub fn small_complete(&self) -> bool {
        self.small_tall_mask & SMALL_MASK == SMALL_MASK
    }

    pub fn tall_complete(&self) -> bool {
        self.small_tall_mask & TALL_MASK == TALL_MASK
    }

    pub fn all_complete(&self) -> bool {
        self.small_tall_mask & ALL_MASK == ALL_MASK
    }

    /// Times `total` has landed this hand.
    pub fn count_for(&self, total: u8) -> u8 {
        if (2..=12).contains(&total) {
            self.roll_counts[(total - 2) as usize]
        } else {
            0
        }
    }

    /// Record a landed total in the hand counters. Phase handling is the
    /// settlement engine's job; this only tracks bonus progress inputs.
    pub fn record_total(&mut self, total: u8) {
        self.rolls_this_hand = self.rolls_this_hand.saturating_add(1);
        if (2..=12).contains(&total) {
            let idx = (total - 2) as usize;
            self.roll_counts[idx] = self.roll_counts[idx].saturating_add(1);
        }
        if let Some(bit) = Self::small_tall_bit(total) {
            self.small_tall_mask |= bit;
        }
    }

    /// Record a made point for Fire and Replay progress.
    pub fn record_point_made(&mut self, point: u8) {
        self.fire_mask |= Self::fire_bit(point);
        self.points_made_count = self.points_made_count.saturating_add(1);
        if (4..=10).contains(&point) {
            let idx = (point - 4) as usize;
            self.made_counts[idx] = self.made_counts[idx].saturating_add(1);
        }
    }

    /// Times `point` has been made this hand.
    pub fn made_count(&self, point: u8) -> u8 {
        if (4..=10).contains(&point) {
            self.made_counts[(point - 4) as usize]
        } else {
            0
        }
    }

    pub fn record_double(&mut self, die: u8) {
        if (1..=6).contains(&die) {
            self.doubles_mask |= 1 << (die - 1);
        }
    }
}

impl Write for ShooterState {
    fn write(&self, writer: &mut impl BufMut) {
        self.phase.write(writer);
        self.point.write(writer);
        self.points_made_count.write(writer);
        self.fire_mask.write(writer);
        self.doubles_mask.write(writer);
        self.small_tall_mask.write(writer);
        for count in &self.roll_counts {
            count.write(writer);
        }
        for count in &self.made_counts {
            count.write(writer);
        }
        self.pass_streak.write(writer);
        self.rolls_this_hand.write(writer);
    }
}

impl Read for ShooterState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let phase = Phase::read(reader)?;
        let point = u8::read(reader)?;
        let points_made_count = u8::read(reader)?;
        let fire_mask = u8::read(reader)?;
        let doubles_mask = u8::read(reader)?;
        let small_tall_mask = u16::read(reader)?;
        let mut roll_counts = [0u8; 11];
        for count in roll_counts.iter_mut() {
            *count = u8::read(reader)?;
        }
        let mut made_counts = [0u8; 7];
        for count in made_counts.iter_mut() {
            *count = u8::read(reader)?;
        }
        let pass_streak = u8::read(reader)?;
        let rolls_this_hand = u16::read(reader)?;
        if phase == Phase::Point && point == 0 {
            return Err(Error::Invalid("ShooterState", "point phase without point"));
        }
        if phase == Phase::ComeOut && point != 0 {
            return Err(Error::Invalid("ShooterState", "come-out phase with point"));
        }
        Ok(Self {
            phase,
            point,
            points_made_count,
            fire_mask,
            doubles_mask,
            small_tall_mask,
            roll_counts,
            made_counts,
            pass_streak,
            rolls_this_hand,
        })
    }
}

impl FixedSize for ShooterState {
    const SIZE: usize =
        Phase::SIZE + 4 * u8::SIZE + u16::SIZE + 18 * u8::SIZE + u8::SIZE + u16::SIZE;
}
