//! Messages exchanged between a host and a simulation worker.
//!
//! Inbound [Command]s use `{"t": ..., "data": ...}`; outbound [Event]s carry
//! their fields next to the `t` tag.

use crate::lottery::{PurchaseRecord, QueuedTicket, RunStats, Settings, Target};
use serde::{Deserialize, Serialize};

/// Partial session configuration update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CfgUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_on_jackpot: Option<bool>,
    /// Host is hidden/backgrounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Commands sent from the host to the worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "data", rename_all = "camelCase")]
#[allow(clippy::large_enum_variant)]
pub enum Command {
    /// Begin a new session, or resume a paused one.
    Start,
    Pause,
    /// Cancel the session, keeping stats.
    Stop,
    /// Cancel the session and zero stats.
    Reset,
    Settings(Settings),
    /// Replace the pending ticket queue (FIFO).
    Queue(Vec<QueuedTicket>),
    Target(Target),
    Cfg(CfgUpdate),
}

/// Sum of a batch's prizes and costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub paid: u64,
    pub spent: u64,
}

impl Delta {
    pub fn from_rows(rows: &[PurchaseRecord]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            paid: acc.paid.saturating_add(row.prize_minor),
            spent: acc.spent.saturating_add(row.cost_minor),
        })
    }
}

/// Degraded resource reported once to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryKind {
    /// The worker runs on the host's executor instead of a dedicated thread.
    InlineFallback,
    /// The OS entropy source was unavailable; a time-derived seed is used.
    WeakRandomness,
}

/// Events sent from the worker to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum Event {
    State {
        running: bool,
        paused: bool,
    },
    Tick {
        rows: Vec<PurchaseRecord>,
        stats: RunStats,
        delta: Delta,
    },
    Reset {
        stats: RunStats,
    },
    Day {
        day: u64,
    },
    Advisory {
        kind: AdvisoryKind,
    },
}

impl Event {
    pub fn tick(rows: Vec<PurchaseRecord>, stats: RunStats) -> Self {
        let delta = Delta::from_rows(&rows);
        Event::Tick { rows, stats, delta }
    }
}
