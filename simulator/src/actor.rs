use crate::{ingress::Mailbox, Config, Events};
use futures::{channel::mpsc, StreamExt};
use lottosim_execution::{Clock, DrawRng, Engine, SystemClock, Tick};
use lottosim_types::{AdvisoryKind, Command, Event, Ticket};
use std::{collections::HashSet, time::Instant};
use tracing::{debug, warn};

enum Step {
    Command(Option<Command>),
    Tick,
}

/// Drives an [Engine] from mailbox commands and a tick timer.
///
/// At most one tick is ever scheduled; commands are handled between ticks,
/// so updates always apply to the next batch.
pub struct Actor {
    engine: Engine,
    clock: SystemClock,
    mailbox: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<Event>,

    next_tick: Option<Instant>,
    advised: HashSet<AdvisoryKind>,
    delivery_failed: bool,
}

impl Actor {
    pub fn new(config: Config) -> (Self, Mailbox, Events) {
        let (sender, mailbox) = mpsc::channel(config.mailbox_size);
        let (events, receiver) = mpsc::unbounded();
        let rng = match config.seed {
            Some(seed) => DrawRng::seeded(seed),
            None => DrawRng::from_entropy(),
        };
        let weak = rng.is_weak();

        let mut actor = Self {
            engine: Engine::new(rng),
            clock: SystemClock,
            mailbox,
            events,
            next_tick: None,
            advised: HashSet::new(),
            delivery_failed: false,
        };
        if weak {
            actor.advise(AdvisoryKind::WeakRandomness);
        }
        (actor, Mailbox::new(sender), receiver)
    }

    /// Report a degraded resource to the host, once per kind.
    pub fn advise(&mut self, kind: AdvisoryKind) {
        if self.advised.insert(kind) {
            self.emit(Event::Advisory { kind });
        }
    }

    /// Process commands and ticks until every [Mailbox] is dropped.
    pub async fn run(mut self) {
        loop {
            let deadline = self.next_tick;
            let step = tokio::select! {
                command = self.mailbox.next() => Step::Command(command),
                _ = wait(deadline) => Step::Tick,
            };
            match step {
                Step::Command(Some(command)) => self.handle(command),
                Step::Command(None) => {
                    debug!("mailbox closed, shutting down");
                    return;
                }
                Step::Tick => {
                    self.next_tick = None;
                    self.tick();
                }
            }
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start => {
                if self.engine.start(&self.clock) {
                    self.next_tick = Some(self.clock.now());
                }
            }
            Command::Pause => {
                self.engine.pause();
                self.next_tick = None;
            }
            Command::Stop => {
                self.next_tick = None;
                if let Some(event) = self.engine.stop(&self.clock) {
                    self.emit(event);
                }
            }
            Command::Reset => {
                self.next_tick = None;
                let event = self.engine.reset();
                self.emit(event);
            }
            Command::Settings(settings) => self.engine.apply_settings(settings),
            Command::Queue(entries) => self
                .engine
                .set_queue(entries.into_iter().map(Ticket::from).collect()),
            Command::Target(target) => self.engine.set_target(target),
            Command::Cfg(cfg) => self.engine.apply_cfg(cfg),
        }
        let state = self.engine.state_event();
        self.emit(state);
    }

    fn tick(&mut self) {
        let Tick { events, next } = self.engine.tick(&self.clock);
        for event in events {
            self.emit(event);
        }
        self.next_tick = next.map(|delay| self.clock.now() + delay);
    }

    fn emit(&mut self, event: Event) {
        if self.events.unbounded_send(event).is_err() && !self.delivery_failed {
            self.delivery_failed = true;
            warn!("event receiver dropped, discarding events");
        }
    }
}

async fn wait(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => futures::future::pending().await,
    }
}
