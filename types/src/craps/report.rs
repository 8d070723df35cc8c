use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::ed25519::PublicKey;
use commonware_utils::hex;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use super::bet::BetType;
use super::constants::MAX_ACTIVE_BETS;
use super::shooter::{Phase, PhaseEvent};

/// How a bet resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BetOutcome {
    Won = 0,
    Lost = 1,
    Pushed = 2,
}

impl BetOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Pushed => "pushed",
        }
    }
}

impl Write for BetOutcome {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BetOutcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Won),
            1 => Ok(Self::Lost),
            2 => Ok(Self::Pushed),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for BetOutcome {
    const SIZE: usize = 1;
}

/// One bet's settlement within a roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettledBet {
    pub participant: PublicKey,
    pub bet_type: BetType,
    pub target: u8,
    pub outcome: BetOutcome,
    /// Stake plus odds that were locked for this bet.
    pub wagered: u64,
    /// Amount returned to the unlocked pool: stake plus winnings on a
    /// win, the stake on a push, zero on a loss.
    pub returned: u64,
}

impl Write for SettledBet {
    fn write(&self, writer: &mut impl BufMut) {
        self.participant.write(writer);
        self.bet_type.write(writer);
        self.target.write(writer);
        self.outcome.write(writer);
        self.wagered.write(writer);
        self.returned.write(writer);
    }
}

impl Read for SettledBet {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            participant: PublicKey::read(reader)?,
            bet_type: BetType::read(reader)?,
            target: u8::read(reader)?,
            outcome: BetOutcome::read(reader)?,
            wagered: u64::read(reader)?,
            returned: u64::read(reader)?,
        })
    }
}

impl FixedSize for SettledBet {
    const SIZE: usize =
        PublicKey::SIZE + BetType::SIZE + u8::SIZE + BetOutcome::SIZE + 2 * u64::SIZE;
}

impl Serialize for SettledBet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SettledBet", 6)?;
        state.serialize_field("participant", &hex(self.participant.as_ref()))?;
        state.serialize_field("bet_type", self.bet_type.name())?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("outcome", self.outcome.name())?;
        state.serialize_field("wagered", &self.wagered)?;
        state.serialize_field("returned", &self.returned)?;
        state.end()
    }
}

impl Write for PhaseEvent {
    fn write(&self, writer: &mut impl BufMut) {
        let (tag, point): (u8, u8) = match self {
            Self::None => (0, 0),
            Self::PointEstablished(p) => (1, *p),
            Self::PointMade(p) => (2, *p),
            Self::SevenOut => (3, 0),
        };
        tag.write(writer);
        point.write(writer);
    }
}

impl Read for PhaseEvent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let tag = u8::read(reader)?;
        let point = u8::read(reader)?;
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::PointEstablished(point)),
            2 => Ok(Self::PointMade(point)),
            3 => Ok(Self::SevenOut),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for PhaseEvent {
    const SIZE: usize = 2;
}

/// Full record of one processed roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollReport {
    /// Monotonic roll number for the table.
    pub round: u64,
    pub die1: u8,
    pub die2: u8,
    pub event: PhaseEvent,
    /// Phase and point after this roll's transitions.
    pub phase_after: Phase,
    pub point_after: u8,
    pub settled: Vec<SettledBet>,
    /// Performance fee skimmed from this roll's profit, if any.
    pub fee_charged: u64,
    /// True when a payout had to be capped at available assets.
    pub shortfall: bool,
}

impl RollReport {
    pub fn total(&self) -> u8 {
        self.die1 + self.die2
    }

    pub fn total_wagered(&self) -> u64 {
        self.settled
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.wagered))
    }

    pub fn total_returned(&self) -> u64 {
        self.settled
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.returned))
    }

    /// Pool gain (positive) or loss (negative) from this roll's settlements.
    pub fn net_delta(&self) -> i128 {
        self.total_returned() as i128 - self.total_wagered() as i128
    }
}

impl Write for RollReport {
    fn write(&self, writer: &mut impl BufMut) {
        self.round.write(writer);
        self.die1.write(writer);
        self.die2.write(writer);
        self.event.write(writer);
        self.phase_after.write(writer);
        self.point_after.write(writer);
        self.settled.write(writer);
        self.fee_charged.write(writer);
        self.shortfall.write(writer);
    }
}

impl Read for RollReport {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let round = u64::read(reader)?;
        let die1 = u8::read(reader)?;
        let die2 = u8::read(reader)?;
        if !(1..=6).contains(&die1) || !(1..=6).contains(&die2) {
            return Err(Error::Invalid("RollReport", "die out of range"));
        }
        let event = PhaseEvent::read(reader)?;
        let phase_after = Phase::read(reader)?;
        let point_after = u8::read(reader)?;
        if phase_after == Phase::Point && point_after == 0 {
            return Err(Error::Invalid("RollReport", "point phase without point"));
        }
        let settled = Vec::<SettledBet>::read_range(reader, 0..=MAX_ACTIVE_BETS)?;
        let fee_charged = u64::read(reader)?;
        let shortfall = bool::read(reader)?;
        Ok(Self {
            round,
            die1,
            die2,
            event,
            phase_after,
            point_after,
            settled,
            fee_charged,
            shortfall,
        })
    }
}

impl EncodeSize for RollReport {
    fn encode_size(&self) -> usize {
        self.round.encode_size()
            + self.die1.encode_size()
            + self.die2.encode_size()
            + PhaseEvent::SIZE
            + Phase::SIZE
            + self.point_after.encode_size()
            + self.settled.encode_size()
            + self.fee_charged.encode_size()
            + self.shortfall.encode_size()
    }
}

impl Serialize for RollReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("RollReport", 10)?;
        state.serialize_field("round", &self.round)?;
        state.serialize_field("die1", &self.die1)?;
        state.serialize_field("die2", &self.die2)?;
        state.serialize_field("total", &self.total())?;
        let (event, event_point) = match self.event {
            PhaseEvent::None => ("none", 0u8),
            PhaseEvent::PointEstablished(p) => ("point_established", p),
            PhaseEvent::PointMade(p) => ("point_made", p),
            PhaseEvent::SevenOut => ("seven_out", 0u8),
        };
        state.serialize_field("event", event)?;
        state.serialize_field("event_point", &event_point)?;
        state.serialize_field("point", &self.point_after)?;
        state.serialize_field("settled", &self.settled)?;
        state.serialize_field("fee_charged", &self.fee_charged)?;
        state.serialize_field("shortfall", &self.shortfall)?;
        state.end()
    }
}
