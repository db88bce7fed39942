use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::GameConfig;

/// A purchased (or queued) selection of numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    pub main: Vec<u16>,
    pub bonus: Option<u16>,
}

impl Ticket {
    pub fn new(main: Vec<u16>, bonus: Option<u16>) -> Self {
        Self { main, bonus }
    }
}

/// Queue entry as sent by the host: either a bare list of main numbers or a
/// full ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueuedTicket {
    Numbers(Vec<u16>),
    Ticket(Ticket),
}

impl From<QueuedTicket> for Ticket {
    fn from(entry: QueuedTicket) -> Self {
        match entry {
            QueuedTicket::Numbers(main) => Ticket { main, bonus: None },
            QueuedTicket::Ticket(ticket) => ticket,
        }
    }
}

impl From<Ticket> for QueuedTicket {
    fn from(ticket: Ticket) -> Self {
        QueuedTicket::Ticket(ticket)
    }
}

/// The winning draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub main: Vec<u16>,
    pub bonus: Option<u16>,
}

impl Target {
    pub fn new(main: Vec<u16>, bonus: Option<u16>) -> Self {
        Self { main, bonus }
    }

    /// Drop out-of-range and duplicate numbers, sort the main set and clear a
    /// bonus the game cannot have.
    ///
    /// Returns `None` if fewer than `main_count` valid main numbers remain.
    pub fn sanitize(&self, game: &GameConfig) -> Option<Target> {
        let main: BTreeSet<u16> = self
            .main
            .iter()
            .copied()
            .filter(|&n| game.contains_main(n))
            .collect();
        if main.len() < game.main_count as usize {
            return None;
        }
        let bonus = match (self.bonus, game.bonus_range()) {
            (Some(bonus), Some(range)) if range.contains(&bonus) => Some(bonus),
            _ => None,
        };
        Some(Target {
            main: main.into_iter().take(game.main_count as usize).collect(),
            bonus,
        })
    }
}

/// Whether a record hit the jackpot tier.
///
/// A zero-prize ticket is still `NonJackpot`; "loss" is derived from the
/// prize amount for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Jackpot,
    NonJackpot,
}

/// One processed ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// 1-based, gapless across a session.
    pub index: u64,
    pub main: Vec<u16>,
    pub bonus: Option<u16>,
    pub main_matches: u16,
    pub bonus_matched: bool,
    /// Payout in minor units (jackpots carry the configured jackpot amount).
    pub prize_minor: u64,
    pub cost_minor: u64,
    pub net_minor: i64,
    pub day: u64,
    pub kind: RecordKind,
    pub timestamp_ms: u64,
}

impl PurchaseRecord {
    pub fn is_jackpot(&self) -> bool {
        self.kind == RecordKind::Jackpot
    }

    pub fn is_win(&self) -> bool {
        self.prize_minor > 0 || self.is_jackpot()
    }
}
