//! Prize table parsing and lookup.
//!
//! A prize table is line-oriented text of the form
//! `<mainMatches>[,<0|1>]=<JACKPOT|FREE_PLAY|amount>`:
//!
//! ```text
//! 6,1=JACKPOT
//! 6,0=1,000,000
//! 5=1000
//! 3=FREE_PLAY
//! ```
//!
//! Amounts are minor currency units, capped at [MAX_AMOUNT_MINOR]. Lines that cannot be parsed are
//! dropped; a later line for the same key replaces an earlier one.

use lottosim_types::lottery::MAX_AMOUNT_MINOR;
use std::collections::BTreeMap;

/// Payout of a single tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizeValue {
    /// Pays the configured jackpot amount.
    Jackpot,
    /// Pays nothing (a free replay in the real game).
    FreePlay,
    /// Pays a fixed amount of minor units.
    Fixed(u64),
}

impl PrizeValue {
    /// Amount in minor units, given the configured jackpot.
    pub fn amount(&self, jackpot_minor: u64) -> u64 {
        match self {
            PrizeValue::Jackpot => jackpot_minor,
            PrizeValue::FreePlay => 0,
            PrizeValue::Fixed(amount) => *amount,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("JACKPOT") {
            return Some(PrizeValue::Jackpot);
        }
        if value.eq_ignore_ascii_case("FREE_PLAY") {
            return Some(PrizeValue::FreePlay);
        }
        let digits: String = value
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | '\'' | ' '))
            .collect();
        match digits.parse::<u64>().ok()? {
            0 => Some(PrizeValue::FreePlay),
            amount => Some(PrizeValue::Fixed(amount.min(MAX_AMOUNT_MINOR))),
        }
    }
}

/// Mapping from `(main matches, bonus matched)` to a payout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrizeTable {
    tiers: BTreeMap<(u16, bool), PrizeValue>,
}

impl PrizeTable {
    /// Parse a prize table, silently dropping malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut tiers = BTreeMap::new();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            let (Some(key), Some(value)) = (parse_key(key), PrizeValue::parse(value)) else {
                continue;
            };
            tiers.insert(key, value);
        }
        Self { tiers }
    }

    /// Exact lookup without fallback.
    pub fn get(&self, main_matches: u16, bonus_matched: bool) -> Option<PrizeValue> {
        self.tiers.get(&(main_matches, bonus_matched)).copied()
    }

    /// Lookup `(matches, bonus)` first, then `(matches, false)`.
    pub fn lookup(&self, main_matches: u16, bonus_matched: bool) -> Option<PrizeValue> {
        self.get(main_matches, bonus_matched)
            .or_else(|| self.get(main_matches, false))
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u16, bool), PrizeValue)> + '_ {
        self.tiers.iter().map(|(key, value)| (*key, *value))
    }
}

fn parse_key(key: &str) -> Option<(u16, bool)> {
    let mut parts = key.split(',');
    let main = parts.next()?.trim().parse::<u16>().ok()?;
    let bonus = match parts.next().map(str::trim) {
        None | Some("0") => false,
        Some("1") => true,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((main, bonus))
}
