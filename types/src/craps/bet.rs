use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;

/// Every bet category the table accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BetType {
    Pass = 0,
    DontPass = 1,
    Come = 2,
    DontCome = 3,
    Field = 4,
    /// Yes(n): the target repeats before a 7.
    Yes = 5,
    /// No(n): a 7 lands before the target.
    No = 6,
    /// Next(t): the very next roll totals t.
    Next = 7,
    Hardway4 = 8,
    Hardway6 = 9,
    Hardway8 = 10,
    Hardway10 = 11,
    Fire = 12,
    AtsSmall = 13,
    AtsTall = 14,
    AtsAll = 15,
    HotRoller = 16,
    RideTheLine = 17,
    Muggsy = 18,
    Replay = 19,
    DifferentDoubles = 20,
    Repeater = 21,
}

impl BetType {
    /// Bets that carry a per-bet target total.
    pub fn requires_target(&self) -> bool {
        matches!(self, Self::Yes | Self::No | Self::Next | Self::Repeater)
    }

    /// Line and come bets that travel to a point and accept odds.
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Pass | Self::DontPass | Self::Come | Self::DontCome)
    }

    /// Resolved by the very next roll, win or lose.
    pub fn is_single_roll(&self) -> bool {
        matches!(self, Self::Field | Self::Next)
    }

    /// Multi-roll bonus bets that may only be placed on a fresh hand.
    pub fn is_bonus(&self) -> bool {
        matches!(
            self,
            Self::Fire
                | Self::AtsSmall
                | Self::AtsTall
                | Self::AtsAll
                | Self::HotRoller
                | Self::RideTheLine
                | Self::Muggsy
                | Self::Replay
                | Self::DifferentDoubles
                | Self::Repeater
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::DontPass => "dont_pass",
            Self::Come => "come",
            Self::DontCome => "dont_come",
            Self::Field => "field",
            Self::Yes => "yes",
            Self::No => "no",
            Self::Next => "next",
            Self::Hardway4 => "hardway_4",
            Self::Hardway6 => "hardway_6",
            Self::Hardway8 => "hardway_8",
            Self::Hardway10 => "hardway_10",
            Self::Fire => "fire",
            Self::AtsSmall => "ats_small",
            Self::AtsTall => "ats_tall",
            Self::AtsAll => "ats_all",
            Self::HotRoller => "hot_roller",
            Self::RideTheLine => "ride_the_line",
            Self::Muggsy => "muggsy",
            Self::Replay => "replay",
            Self::DifferentDoubles => "different_doubles",
            Self::Repeater => "repeater",
        }
    }
}

impl TryFrom<u8> for BetType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Self::Pass),
            1 => Ok(Self::DontPass),
            2 => Ok(Self::Come),
            3 => Ok(Self::DontCome),
            4 => Ok(Self::Field),
            5 => Ok(Self::Yes),
            6 => Ok(Self::No),
            7 => Ok(Self::Next),
            8 => Ok(Self::Hardway4),
            9 => Ok(Self::Hardway6),
            10 => Ok(Self::Hardway8),
            11 => Ok(Self::Hardway10),
            12 => Ok(Self::Fire),
            13 => Ok(Self::AtsSmall),
            14 => Ok(Self::AtsTall),
            15 => Ok(Self::AtsAll),
            16 => Ok(Self::HotRoller),
            17 => Ok(Self::RideTheLine),
            18 => Ok(Self::Muggsy),
            19 => Ok(Self::Replay),
            20 => Ok(Self::DifferentDoubles),
            21 => Ok(Self::Repeater),
            i => Err(i),
        }
    }
}

impl Write for BetType {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BetType {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Self::try_from(value).map_err(Error::InvalidEnum)
    }
}

impl FixedSize for BetType {
    const SIZE: usize = 1;
}

/// Lifecycle of a placed bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BetStatus {
    /// Working and eligible to resolve.
    On = 0,
    /// Come/Don't Come waiting for its own point; Pass odds while off.
    Pending = 1,
}

impl Write for BetStatus {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BetStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::On),
            1 => Ok(Self::Pending),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for BetStatus {
    const SIZE: usize = 1;
}

/// A single active bet on the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bet {
    /// Depositor the bet is attributed to.
    pub participant: PublicKey,
    pub bet_type: BetType,
    /// Point or total the bet rides on. 0 when the category needs none,
    /// or before a come bet has traveled.
    pub target: u8,
    pub status: BetStatus,
    /// Flat stake, locked in the pool while the bet is live.
    pub amount: u64,
    /// Odds backing a contract bet, paid at true odds.
    pub odds_amount: u64,
}

impl Bet {
    /// Total locked by this bet.
    pub fn total_staked(&self) -> u64 {
        self.amount.saturating_add(self.odds_amount)
    }
}

impl Write for Bet {
    fn write(&self, writer: &mut impl BufMut) {
        self.participant.write(writer);
        self.bet_type.write(writer);
        self.target.write(writer);
        self.status.write(writer);
        self.amount.write(writer);
        self.odds_amount.write(writer);
    }
}

impl Read for Bet {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            participant: PublicKey::read(reader)?,
            bet_type: BetType::read(reader)?,
            target: u8::read(reader)?,
            status: BetStatus::read(reader)?,
            amount: u64::read(reader)?,
            odds_amount: u64::read(reader)?,
        })
    }
}

impl FixedSize for Bet {
    const SIZE: usize = PublicKey::SIZE
        + BetType::SIZE
        + u8::SIZE
        + BetStatus::SIZE
        + u64::SIZE
        + u64::SIZE;
}
