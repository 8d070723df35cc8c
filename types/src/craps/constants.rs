/// Maximum number of simultaneously active bets on one table.
pub const MAX_ACTIVE_BETS: usize = 64;

/// Denominator for all basis-point fee calculations.
pub const DENOMINATOR_BPS: u64 = 10_000;

/// Default performance fee charged on realized pool profit (5.00%).
pub const DEFAULT_PERFORMANCE_FEE_BPS: u16 = 500;

/// Number of ways to roll each total with 2d6.
pub const WAYS: [u8; 13] = [0, 0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];
//                          0  1  2  3  4  5  6  7  8  9 10 11 12

/// Fire mask with all six points (4,5,6,8,9,10) made.
pub const FIRE_ALL_POINTS: u8 = 0b0011_1111;

/// Doubles mask with every double (1-1 through 6-6) rolled.
pub const DOUBLES_ALL: u8 = 0b0011_1111;

/// Small/tall progress bitmask. Bits: totals 2..6 => 0..4, totals 8..12 => 5..9.
pub const SMALL_MASK: u16 = (1 << 0) | (1 << 1) | (1 << 2) | (1 << 3) | (1 << 4);
pub const TALL_MASK: u16 = (1 << 5) | (1 << 6) | (1 << 7) | (1 << 8) | (1 << 9);
pub const ALL_MASK: u16 = SMALL_MASK | TALL_MASK;

/// Number of times each total must repeat for the Repeater bet to pay.
/// Indexed by total; 0 marks totals with no repeater (and the unused 0/1 slots).
pub const REPEATER_REQUIRED: [u8; 13] = [0, 0, 2, 3, 4, 5, 6, 0, 6, 5, 4, 3, 2];

/// The six point numbers.
pub const POINT_NUMBERS: [u8; 6] = [4, 5, 6, 8, 9, 10];

/// Returns true if `total` can be established as a point.
pub fn is_point_number(total: u8) -> bool {
    matches!(total, 4 | 5 | 6 | 8 | 9 | 10)
}

/// Returns true if `total` is a valid Yes/No/Repeater target (2..12, excluding 7).
pub fn is_box_total(total: u8) -> bool {
    (2..=12).contains(&total) && total != 7
}
