//! Host-side view of a session, built only from worker events.

use lottosim_types::{
    lottery::{net_minor, DEFAULT_LOG_CAP, MINOR_PER_MAJOR},
    AdvisoryKind, Event, PurchaseRecord, RunStats,
};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
};

/// Profit and loss for one simulated day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub tickets: u64,
    pub spent_minor: u64,
    pub paid_minor: u64,
}

impl DaySummary {
    pub fn net_minor(&self) -> i64 {
        net_minor(self.paid_minor, self.spent_minor)
    }
}

/// Aggregates tick events into logs and charts data.
///
/// The purchase and wins logs are ring buffers holding at most `cap`
/// records; per-day totals and the hit distribution cover every record seen
/// since the last reset. Day numbers restart with every session, so per-day
/// totals are keyed by `(session, day)`.
#[derive(Clone, Debug)]
pub struct Ledger {
    cap: usize,
    purchases: VecDeque<PurchaseRecord>,
    wins: VecDeque<PurchaseRecord>,
    days: BTreeMap<(u64, u64), DaySummary>,
    hits: BTreeMap<(u16, bool), u64>,
    stats: RunStats,
    running: bool,
    paused: bool,
    session: u64,
    last_day: u64,
    advisories: Vec<AdvisoryKind>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAP)
    }
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            purchases: VecDeque::new(),
            wins: VecDeque::new(),
            days: BTreeMap::new(),
            hits: BTreeMap::new(),
            stats: RunStats::default(),
            running: false,
            paused: false,
            session: 0,
            last_day: 0,
            advisories: Vec::new(),
        }
    }

    /// Change retention, dropping the oldest records if needed.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        truncate_front(&mut self.purchases, self.cap);
        truncate_front(&mut self.wins, self.cap);
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::State { running, paused } => {
                if *running && self.is_idle() {
                    self.session += 1;
                }
                self.running = *running;
                self.paused = *paused;
            }
            Event::Tick { rows, stats, .. } => {
                for row in rows {
                    self.record(row);
                }
                self.stats = stats.clone();
            }
            Event::Reset { stats } => {
                self.purchases.clear();
                self.wins.clear();
                self.days.clear();
                self.hits.clear();
                self.session = 0;
                self.last_day = 0;
                self.stats = stats.clone();
            }
            Event::Day { day } => self.last_day = *day,
            Event::Advisory { kind } => {
                if !self.advisories.contains(kind) {
                    self.advisories.push(*kind);
                }
            }
        }
    }

    fn record(&mut self, row: &PurchaseRecord) {
        let day = self.days.entry((self.session, row.day)).or_default();
        day.tickets += 1;
        day.spent_minor = day.spent_minor.saturating_add(row.cost_minor);
        day.paid_minor = day.paid_minor.saturating_add(row.prize_minor);
        *self
            .hits
            .entry((row.main_matches, row.bonus_matched))
            .or_default() += 1;

        if row.is_win() {
            self.wins.push_back(row.clone());
            truncate_front(&mut self.wins, self.cap);
        }
        self.purchases.push_back(row.clone());
        truncate_front(&mut self.purchases, self.cap);
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn purchases(&self) -> impl Iterator<Item = &PurchaseRecord> {
        self.purchases.iter()
    }

    pub fn wins(&self) -> impl Iterator<Item = &PurchaseRecord> {
        self.wins.iter()
    }

    /// Per-day totals keyed by `(session, day)`.
    pub fn days(&self) -> &BTreeMap<(u64, u64), DaySummary> {
        &self.days
    }

    /// Sessions started since the last reset.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Tickets per `(main matches, bonus matched)`.
    pub fn hits(&self) -> &BTreeMap<(u16, bool), u64> {
        &self.hits
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_idle(&self) -> bool {
        !self.running && !self.paused
    }

    /// Last day boundary announced by the worker.
    pub fn last_day(&self) -> u64 {
        self.last_day
    }

    pub fn advisories(&self) -> &[AdvisoryKind] {
        &self.advisories
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

fn truncate_front<T>(log: &mut VecDeque<T>, cap: usize) {
    while log.len() > cap {
        log.pop_front();
    }
}

/// Formats minor units as a signed major amount, e.g. `-12.50`.
pub struct Money(pub i64);

impl Money {
    /// Unsigned totals saturate at `i64::MAX`.
    pub fn unsigned(minor: u64) -> Self {
        Self(i64::try_from(minor).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / MINOR_PER_MAJOR, abs % MINOR_PER_MAJOR)
    }
}

/// Human-readable end-of-session report.
pub struct Summary<'a>(&'a Ledger);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.0;
        let stats = &ledger.stats;
        writeln!(f, "tickets:   {}", stats.tickets_processed)?;
        writeln!(f, "days:      {}", stats.days_elapsed)?;
        writeln!(f, "jackpots:  {}", stats.jackpots_hit)?;
        writeln!(f, "spent:     {}", Money::unsigned(stats.spent_minor))?;
        writeln!(f, "paid:      {}", Money::unsigned(stats.paid_minor))?;
        writeln!(f, "net:       {}", Money(stats.net_minor))?;
        writeln!(f, "roi:       {:.2}%", stats.roi_percent)?;
        writeln!(
            f,
            "rate:      {:.0} tickets/s over {:.1}s",
            stats.rate_tickets_per_sec, stats.elapsed_seconds
        )?;
        writeln!(f, "hits:")?;
        for ((matches, bonus), count) in &ledger.hits {
            let bonus = if *bonus { "+b" } else { "" };
            writeln!(f, "  {matches}{bonus:<2} {count}")?;
        }
        if ledger.days.len() > 1 {
            writeln!(f, "daily p/l:")?;
            for ((session, day), summary) in &ledger.days {
                writeln!(
                    f,
                    "  run {session} day {day}: {}",
                    Money(summary.net_minor())
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottosim_types::RecordKind;

    fn row(index: u64, day: u64, main_matches: u16, prize_minor: u64) -> PurchaseRecord {
        PurchaseRecord {
            index,
            main: vec![1, 2, 3, 4, 5, 6],
            bonus: None,
            main_matches,
            bonus_matched: false,
            prize_minor,
            cost_minor: 200,
            net_minor: prize_minor as i64 - 200,
            day,
            kind: RecordKind::NonJackpot,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_ring_buffers_keep_newest() {
        let mut ledger = Ledger::new(3);
        let rows = (1..=5).map(|i| row(i, 0, 0, if i % 2 == 0 { 500 } else { 0 })).collect();
        ledger.apply(&Event::tick(rows, RunStats::default()));

        let indexes: Vec<u64> = ledger.purchases().map(|r| r.index).collect();
        assert_eq!(indexes, vec![3, 4, 5]);
        let wins: Vec<u64> = ledger.wins().map(|r| r.index).collect();
        assert_eq!(wins, vec![2, 4]);

        ledger.set_cap(1);
        assert_eq!(ledger.purchases().count(), 1);
        assert_eq!(ledger.wins().count(), 1);
    }

    #[test]
    fn test_days_and_hits() {
        let mut ledger = Ledger::default();
        let rows = vec![row(1, 0, 3, 1000), row(2, 0, 0, 0), row(3, 1, 3, 0)];
        ledger.apply(&Event::tick(rows, RunStats::default()));

        assert_eq!(ledger.days()[&(0, 0)].net_minor(), 600);
        assert_eq!(ledger.days()[&(0, 1)].net_minor(), -200);
        assert_eq!(ledger.hits()[&(3, false)], 2);
        assert_eq!(ledger.hits()[&(0, false)], 1);
    }

    #[test]
    fn test_days_split_by_session() {
        let running = Event::State {
            running: true,
            paused: false,
        };
        let paused = Event::State {
            running: false,
            paused: true,
        };
        let idle = Event::State {
            running: false,
            paused: false,
        };
        let mut ledger = Ledger::default();

        ledger.apply(&running);
        ledger.apply(&Event::tick(vec![row(1, 0, 3, 1000)], RunStats::default()));
        // Resuming and repeated state reports stay in the same session
        ledger.apply(&paused);
        ledger.apply(&running);
        ledger.apply(&running);
        ledger.apply(&Event::tick(vec![row(2, 0, 0, 0)], RunStats::default()));
        ledger.apply(&idle);
        assert_eq!(ledger.session(), 1);

        ledger.apply(&running);
        ledger.apply(&Event::tick(vec![row(3, 0, 0, 0)], RunStats::default()));
        assert_eq!(ledger.session(), 2);

        assert_eq!(ledger.days().len(), 2);
        assert_eq!(ledger.days()[&(1, 0)].tickets, 2);
        assert_eq!(ledger.days()[&(1, 0)].net_minor(), 600);
        assert_eq!(ledger.days()[&(2, 0)].tickets, 1);
        assert_eq!(ledger.days()[&(2, 0)].net_minor(), -200);

        ledger.apply(&Event::Reset {
            stats: RunStats::default(),
        });
        assert_eq!(ledger.session(), 0);
    }

    #[test]
    fn test_jackpot_counts_as_win() {
        let mut ledger = Ledger::default();
        let mut jackpot = row(1, 0, 6, 0);
        jackpot.kind = RecordKind::Jackpot;
        ledger.apply(&Event::tick(vec![jackpot], RunStats::default()));
        assert_eq!(ledger.wins().count(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = Ledger::default();
        ledger.apply(&Event::tick(vec![row(1, 0, 3, 10)], RunStats::default()));
        ledger.apply(&Event::Reset {
            stats: RunStats::default(),
        });
        assert_eq!(ledger.purchases().count(), 0);
        assert!(ledger.days().is_empty());
        assert!(ledger.hits().is_empty());
    }

    #[test]
    fn test_state_tracking() {
        let mut ledger = Ledger::default();
        assert!(ledger.is_idle());
        ledger.apply(&Event::State {
            running: false,
            paused: true,
        });
        assert!(ledger.is_paused() && !ledger.is_idle());
        ledger.apply(&Event::Advisory {
            kind: AdvisoryKind::InlineFallback,
        });
        ledger.apply(&Event::Advisory {
            kind: AdvisoryKind::InlineFallback,
        });
        assert_eq!(ledger.advisories(), &[AdvisoryKind::InlineFallback]);
    }

    #[test]
    fn test_money_format() {
        assert_eq!(Money(0).to_string(), "0.00");
        assert_eq!(Money(1250).to_string(), "12.50");
        assert_eq!(Money(-5).to_string(), "-0.05");
        assert_eq!(Money::unsigned(u64::MAX).0, i64::MAX);
    }
}
