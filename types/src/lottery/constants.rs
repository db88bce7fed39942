/// Minor units per major currency unit.
pub const MINOR_PER_MAJOR: u64 = 100;

/// Largest single amount (ticket price, jackpot or fixed prize) in minor units.
pub const MAX_AMOUNT_MINOR: u64 = 1_000_000_000_000_000;

/// [MAX_AMOUNT_MINOR] in major units.
pub const MAX_AMOUNT_MAJOR: f64 = 1e13;

/// Jackpot paid when settings do not configure one (major units).
pub const DEFAULT_JACKPOT: f64 = 1_000_000.0;

/// Batch ceiling applied while the host is hidden/backgrounded.
pub const HIDDEN_BATCH_CEILING: u32 = 500;

/// Minimum tick delay while the host is hidden/backgrounded (ms).
pub const HIDDEN_MIN_DELAY_MS: u64 = 100;

// Normalization bounds
pub const MIN_MAIN_COUNT: u16 = 1;
pub const MAX_MAIN_COUNT: u16 = 20;
pub const MAX_MAIN_NUMBER: u16 = 200;
pub const MIN_BONUS_NUMBER: u16 = 1;
pub const MAX_BONUS_NUMBER: u16 = 99;
pub const MIN_BATCH_SIZE: u32 = 1;
pub const MAX_BATCH_SIZE: u32 = 10_000;
pub const MIN_UI_DELAY_MS: u64 = 1;
pub const MAX_UI_DELAY_MS: u64 = 2_000;
pub const MIN_RATE_CAP: u32 = 1;
pub const MAX_RATE_CAP: u32 = 10_000;
pub const MIN_LOG_CAP: usize = 1_000;
pub const MAX_LOG_CAP: usize = 500_000;

// Defaults
pub const DEFAULT_BATCH_SIZE: u32 = 1_000;
pub const DEFAULT_UI_DELAY_MS: u64 = 200;
pub const DEFAULT_RATE_CAP: u32 = 500;
pub const DEFAULT_LOG_CAP: usize = 50_000;

/// Convert a major-unit amount to integer minor units.
///
/// Negative and non-finite amounts clamp to zero, large ones to
/// [MAX_AMOUNT_MINOR].
pub fn to_minor(major: f64) -> u64 {
    if !major.is_finite() || major <= 0.0 {
        return 0;
    }
    ((major * MINOR_PER_MAJOR as f64).round() as u64).min(MAX_AMOUNT_MINOR)
}

/// `paid - spent` as a signed amount, saturating at the `i64` bounds.
pub fn net_minor(paid: u64, spent: u64) -> i64 {
    let paid = i64::try_from(paid).unwrap_or(i64::MAX);
    let spent = i64::try_from(spent).unwrap_or(i64::MAX);
    paid.saturating_sub(spent)
}
