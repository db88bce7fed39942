//! Execution strategies for a worker's [Actor].

use crate::{Actor, Config, Events, Mailbox};
use futures::channel::oneshot;
use lottosim_types::AdvisoryKind;
use std::{fmt, io, thread};
use thiserror::Error;
use tokio::runtime;
use tracing::{info, warn};

const THREAD_NAME: &str = "lottosim-worker";

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to build worker runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn worker thread: {0}")]
    Thread(#[source] io::Error),
    #[error("no async runtime available for inline worker")]
    NoRuntime,
}

/// Where a worker's actor runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Dedicated OS thread with its own runtime.
    Thread,
    /// Task on the caller's runtime.
    Inline,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Thread => f.write_str("thread"),
            Strategy::Inline => f.write_str("inline"),
        }
    }
}

/// Runs an [Actor] to completion somewhere other than the caller's stack.
///
/// Both implementations deliver commands and events through the actor's
/// channels, so hosts cannot observe which one is in use.
pub trait Executor {
    fn strategy(&self) -> Strategy;

    /// Start `actor`; the returned receiver resolves once it exits.
    fn execute(self, actor: Actor) -> oneshot::Receiver<()>;
}

type Slot = (Actor, oneshot::Sender<()>);

/// Runs the actor on a dedicated thread.
///
/// The thread and its runtime are created up front so that a failure is
/// reported before an actor is handed over.
pub struct ThreadExecutor {
    slot: oneshot::Sender<Slot>,
}

impl ThreadExecutor {
    pub fn new() -> Result<Self, SpawnError> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SpawnError::Runtime)?;
        let (slot, receiver) = oneshot::channel::<Slot>();
        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    // Nothing to run if the executor was dropped unused
                    if let Ok((actor, done)) = receiver.await {
                        actor.run().await;
                        let _ = done.send(());
                    }
                })
            })
            .map_err(SpawnError::Thread)?;
        Ok(Self { slot })
    }
}

impl Executor for ThreadExecutor {
    fn strategy(&self) -> Strategy {
        Strategy::Thread
    }

    fn execute(self, actor: Actor) -> oneshot::Receiver<()> {
        let (done, exited) = oneshot::channel();
        if self.slot.send((actor, done)).is_err() {
            warn!("worker thread exited before receiving its actor");
        }
        exited
    }
}

/// Runs the actor as a task on an existing tokio runtime.
pub struct InlineExecutor {
    handle: runtime::Handle,
}

impl InlineExecutor {
    pub fn new(handle: runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    pub fn current() -> Result<Self, SpawnError> {
        runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|_| SpawnError::NoRuntime)
    }
}

impl Executor for InlineExecutor {
    fn strategy(&self) -> Strategy {
        Strategy::Inline
    }

    fn execute(self, actor: Actor) -> oneshot::Receiver<()> {
        let (done, exited) = oneshot::channel();
        self.handle.spawn(async move {
            actor.run().await;
            let _ = done.send(());
        });
        exited
    }
}

/// A running actor and the host's ends of its channels.
pub struct Worker {
    pub mailbox: Mailbox,
    pub events: Events,
    strategy: Strategy,
    exited: oneshot::Receiver<()>,
}

impl Worker {
    /// Spawn on a dedicated thread, falling back to the current runtime.
    ///
    /// The fallback is reported to the host as an `inlineFallback` advisory.
    pub fn spawn(config: Config) -> Result<Self, SpawnError> {
        match ThreadExecutor::new() {
            Ok(executor) => Ok(Self::launch(config, executor, None)),
            Err(err) => {
                warn!(%err, "worker thread unavailable, running inline");
                let executor = InlineExecutor::current()?;
                Ok(Self::launch(
                    config,
                    executor,
                    Some(AdvisoryKind::InlineFallback),
                ))
            }
        }
    }

    /// Spawn on the given executor.
    pub fn with_executor(config: Config, executor: impl Executor) -> Self {
        Self::launch(config, executor, None)
    }

    fn launch(config: Config, executor: impl Executor, advisory: Option<AdvisoryKind>) -> Self {
        let (mut actor, mailbox, events) = Actor::new(config);
        if let Some(kind) = advisory {
            actor.advise(kind);
        }
        let strategy = executor.strategy();
        let exited = executor.execute(actor);
        info!(%strategy, "worker started");
        Self {
            mailbox,
            events,
            strategy,
            exited,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Drop the mailbox and wait for the actor to exit.
    ///
    /// Other [Mailbox] clones keep the actor alive.
    pub async fn shutdown(self) -> Events {
        let Self {
            mailbox,
            events,
            exited,
            ..
        } = self;
        drop(mailbox);
        let _ = exited.await;
        events
    }
}
