//! Ticket resolution.

use crate::prize::{PrizeTable, PrizeValue};
use lottosim_types::{lottery::net_minor, RecordKind, Settings, Target, Ticket};

/// Bit-set over numbers `0..256`.
///
/// Numbers outside that range are never members; games are capped well
/// below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberSet([u64; 4]);

impl NumberSet {
    pub fn insert(&mut self, n: u16) {
        if n < 256 {
            self.0[(n / 64) as usize] |= 1u64 << (n % 64);
        }
    }

    pub fn contains(&self, n: u16) -> bool {
        n < 256 && self.0[(n / 64) as usize] & (1u64 << (n % 64)) != 0
    }

    pub fn len(&self) -> u16 {
        self.0.iter().map(|word| word.count_ones() as u16).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }

    pub fn intersection_len(&self, other: &NumberSet) -> u16 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a & b).count_ones() as u16)
            .sum()
    }
}

impl FromIterator<u16> for NumberSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut set = NumberSet::default();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

/// Size of the intersection of two number lists (duplicates count once).
pub fn count_matches(a: &[u16], b: &[u16]) -> u16 {
    let a: NumberSet = a.iter().copied().collect();
    let b: NumberSet = b.iter().copied().collect();
    a.intersection_len(&b)
}

/// Outcome of matching one ticket against the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub main_matches: u16,
    pub bonus_matched: bool,
    pub prize_minor: u64,
    pub cost_minor: u64,
    pub net_minor: i64,
    pub kind: RecordKind,
}

/// Prices tickets against a parsed prize table.
///
/// Built once per batch from the current settings.
#[derive(Clone, Debug)]
pub struct Resolver {
    table: PrizeTable,
    has_bonus: bool,
    cost_minor: u64,
    jackpot_minor: u64,
}

impl Resolver {
    pub fn new(table: PrizeTable, has_bonus: bool, cost_minor: u64, jackpot_minor: u64) -> Self {
        Self {
            table,
            has_bonus,
            cost_minor,
            jackpot_minor,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            PrizeTable::parse(&settings.prize_map),
            settings.game.has_bonus,
            settings.ticket_cost_minor(),
            settings.jackpot_minor(),
        )
    }

    pub fn table(&self) -> &PrizeTable {
        &self.table
    }

    pub fn cost_minor(&self) -> u64 {
        self.cost_minor
    }

    pub fn resolve(&self, ticket: &Ticket, target: &Target) -> Resolution {
        let main_matches = count_matches(&ticket.main, &target.main);
        let bonus_matched =
            self.has_bonus && ticket.bonus.is_some() && ticket.bonus == target.bonus;
        let prize = self.table.lookup(main_matches, bonus_matched);
        let kind = match prize {
            Some(PrizeValue::Jackpot) => RecordKind::Jackpot,
            _ => RecordKind::NonJackpot,
        };
        let prize_minor = prize.map_or(0, |value| value.amount(self.jackpot_minor));
        Resolution {
            main_matches,
            bonus_matched,
            prize_minor,
            cost_minor: self.cost_minor,
            net_minor: net_minor(prize_minor, self.cost_minor),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JACKPOT: u64 = 100_000_000;

    fn resolver(text: &str, has_bonus: bool) -> Resolver {
        Resolver::new(PrizeTable::parse(text), has_bonus, 200, JACKPOT)
    }

    #[test]
    fn test_count_matches_is_symmetric() {
        let a = [1, 2, 3, 4, 5, 6];
        let b = [4, 5, 6, 7, 8, 9];
        assert_eq!(count_matches(&a, &b), 3);
        assert_eq!(count_matches(&b, &a), 3);
        assert_eq!(count_matches(&a, &[]), 0);
        assert_eq!(count_matches(&[1, 1, 2], &[1, 2]), 2);
        assert_eq!(count_matches(&[200, 255, 300], &[200, 255, 300]), 2);
    }

    #[test]
    fn test_number_set() {
        let set: NumberSet = [0, 63, 64, 199].into_iter().collect();
        assert_eq!(set.len(), 4);
        assert!(set.contains(63) && set.contains(64));
        assert!(!set.contains(65));
        assert!(NumberSet::default().is_empty());
    }

    #[test]
    fn test_five_of_six_without_bonus() {
        let resolver = resolver("6=JACKPOT\n5=1000\n4=100", false);
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], None);
        let ticket = Ticket::new(vec![1, 2, 3, 4, 5, 7], None);

        let resolution = resolver.resolve(&ticket, &target);
        assert_eq!(resolution.main_matches, 5);
        assert!(!resolution.bonus_matched);
        assert_eq!(resolution.prize_minor, 1000);
        assert_eq!(resolution.net_minor, 800);
        assert_eq!(resolution.kind, RecordKind::NonJackpot);
    }

    #[test]
    fn test_jackpot_pays_configured_amount() {
        let resolver = resolver("6=JACKPOT\n5=1000", false);
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], None);
        let ticket = Ticket::new(vec![6, 5, 4, 3, 2, 1], None);

        let resolution = resolver.resolve(&ticket, &target);
        assert_eq!(resolution.kind, RecordKind::Jackpot);
        assert_eq!(resolution.prize_minor, JACKPOT);
        assert_eq!(resolution.net_minor, JACKPOT as i64 - 200);
    }

    #[test]
    fn test_bonus_requires_game_bonus() {
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], Some(3));
        let ticket = Ticket::new(vec![1, 2, 3, 10, 11, 12], Some(3));

        let with_bonus = resolver("3,1=100\n3,0=10", true).resolve(&ticket, &target);
        assert!(with_bonus.bonus_matched);
        assert_eq!(with_bonus.prize_minor, 100);

        let without_bonus = resolver("3,1=100\n3,0=10", false).resolve(&ticket, &target);
        assert!(!without_bonus.bonus_matched);
        assert_eq!(without_bonus.prize_minor, 10);
    }

    #[test]
    fn test_missing_bonus_never_matches() {
        let resolver = resolver("0,1=5", true);
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], None);
        let ticket = Ticket::new(vec![7, 8, 9, 10, 11, 12], None);
        let resolution = resolver.resolve(&ticket, &target);
        assert!(!resolution.bonus_matched);
        assert_eq!(resolution.prize_minor, 0);
    }

    #[test]
    fn test_lookup_order_bonus_then_plain_then_zero() {
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], Some(1));
        let no_bonus = Ticket::new(vec![1, 2, 3, 7, 8, 9], Some(2));

        // Only (3,true) exists: a non-bonus ticket falls back to (3,false), which is absent
        let only_bonus = resolver("3,1=100", true).resolve(&no_bonus, &target);
        assert_eq!(only_bonus.prize_minor, 0);
        assert_eq!(only_bonus.kind, RecordKind::NonJackpot);

        let bonus = Ticket::new(vec![1, 2, 3, 7, 8, 9], Some(1));
        let fallback = resolver("3=40", true).resolve(&bonus, &target);
        assert!(fallback.bonus_matched);
        assert_eq!(fallback.prize_minor, 40);
    }

    #[test]
    fn test_free_play_is_zero_non_jackpot() {
        let resolver = resolver("2=FREE_PLAY", false);
        let target = Target::new(vec![1, 2, 3, 4, 5, 6], None);
        let ticket = Ticket::new(vec![1, 2, 10, 11, 12, 13], None);
        let resolution = resolver.resolve(&ticket, &target);
        assert_eq!(resolution.prize_minor, 0);
        assert_eq!(resolution.net_minor, -200);
        assert_eq!(resolution.kind, RecordKind::NonJackpot);
    }
}
