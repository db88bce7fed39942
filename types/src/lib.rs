//! Common types used throughout lottosim.

pub mod api;
pub mod lottery;

pub use api::{AdvisoryKind, CfgUpdate, Command, Delta, Event};
pub use lottery::{
    GameConfig, LimitConfig, LimitKind, Preset, PurchaseRecord, QueuedTicket, RecordKind,
    RunStats, Settings, Target, TargetMode, Ticket,
};
