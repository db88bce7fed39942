//! Session controller for lottosim.
//!
//! A [Worker] owns a batch engine behind a mailbox. Hosts drive it with
//! [Mailbox] commands and consume [Events]; nothing is shared between the
//! two sides except channels.
//!
//! The worker prefers a dedicated OS thread running its own single-threaded
//! runtime. When that thread cannot be created it falls back to a task on
//! the caller's runtime, which keeps the same asynchronous contract and
//! reports an `inlineFallback` advisory.

use lottosim_types::Event;

mod actor;
pub mod config;
pub mod executor;
mod ingress;
pub mod ledger;

pub use actor::Actor;
pub use config::ConfigError;
pub use executor::{Executor, InlineExecutor, SpawnError, Strategy, ThreadExecutor, Worker};
pub use ingress::{Mailbox, MailboxError};
pub use ledger::{DaySummary, Ledger};


/// Receiver for events produced by a worker.
pub type Events = futures::channel::mpsc::UnboundedReceiver<Event>;

/// Configuration for an [Actor].
#[derive(Clone, Debug)]
pub struct Config {
    /// Inbound commands buffered before senders wait.
    pub mailbox_size: usize,
    /// Seed for the worker's random source. Sessions started with
    /// `settings.seed` reseed regardless.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox_size: 1024,
            seed: None,
        }
    }
}
