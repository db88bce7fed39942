//! Batch engine.
//!
//! The [Engine] owns all mutable session state (settings, ticket queue,
//! target, stats) and is driven by two entry points:
//!
//! - [Engine::process_batch] buys up to one batch of tickets, pricing each
//!   against the prize table and checking stop conditions before every
//!   ticket.
//! - [Engine::tick] wraps a batch with pacing: it decides which events to
//!   emit and how long to wait before the next invocation (UI delay,
//!   background throttling and the eco-mode rate cap).
//!
//! The engine never blocks and never errors; invalid input is clamped or
//! ignored.

use crate::{clock::Clock, resolve::Resolver, rng::DrawRng};
use lottosim_types::{
    CfgUpdate, Event, LimitKind, PurchaseRecord, RecordKind, RunStats, Settings, Target,
    TargetMode, Ticket,
};
use lottosim_types::lottery::{HIDDEN_BATCH_CEILING, HIDDEN_MIN_DELAY_MS};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Why a session ended on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Canceled,
    Limit,
    Jackpot,
}

/// Tickets bought by one [Engine::process_batch] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    pub rows: Vec<PurchaseRecord>,
    /// Day boundaries crossed during the batch.
    pub days: Vec<u64>,
    /// Set if the session ended during the batch.
    pub stop: Option<StopReason>,
}

/// Result of one [Engine::tick].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    pub events: Vec<Event>,
    /// Delay before the next tick, or `None` to stop scheduling.
    pub next: Option<Duration>,
}

/// Rows held back by the eco-mode rate cap.
#[derive(Clone, Debug)]
struct Held {
    rows: Vec<PurchaseRecord>,
    days: Vec<u64>,
}

pub struct Engine {
    settings: Settings,
    queue: VecDeque<Ticket>,
    target: Target,
    target_supplied: bool,
    stats: RunStats,

    state: RunState,
    canceled: bool,
    stop_on_jackpot: bool,
    hidden: bool,

    started_at: Option<Instant>,
    session_tickets: u64,
    current_day: u64,
    tickets_today: u32,
    held: Option<Held>,

    rng: DrawRng,
}

impl Engine {
    pub fn new(rng: DrawRng) -> Self {
        Self {
            settings: Settings::default().normalize(),
            queue: VecDeque::new(),
            target: Target::default(),
            target_supplied: false,
            stats: RunStats::default(),
            state: RunState::Idle,
            canceled: false,
            stop_on_jackpot: false,
            hidden: false,
            started_at: None,
            session_tickets: 0,
            current_day: 0,
            tickets_today: 0,
            held: None,
            rng,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn current_day(&self) -> u64 {
        self.current_day
    }

    pub fn rng(&self) -> &DrawRng {
        &self.rng
    }

    /// Running and not canceled.
    pub fn is_active(&self) -> bool {
        self.state == RunState::Running && !self.canceled
    }

    pub fn state_event(&self) -> Event {
        Event::State {
            running: self.state == RunState::Running,
            paused: self.state == RunState::Paused,
        }
    }

    /// Replace the settings snapshot; used from the next batch on.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.stop_on_jackpot = settings.cfg.stop_on_jackpot;
        self.settings = settings.normalize();
    }

    /// Replace the pending ticket queue.
    pub fn set_queue(&mut self, tickets: Vec<Ticket>) {
        self.queue = tickets.into();
    }

    /// Replace the winning numbers. Invalid targets are ignored.
    pub fn set_target(&mut self, target: Target) {
        match target.sanitize(&self.settings.game) {
            Some(target) => {
                self.target = target;
                self.target_supplied = true;
            }
            None => warn!(?target, "ignoring invalid target"),
        }
    }

    pub fn apply_cfg(&mut self, cfg: CfgUpdate) {
        if let Some(stop_on_jackpot) = cfg.stop_on_jackpot {
            self.stop_on_jackpot = stop_on_jackpot;
        }
        if let Some(hidden) = cfg.hidden {
            self.hidden = hidden;
        }
    }

    /// Begin a new session or resume a paused one.
    ///
    /// Returns true if a tick should run now.
    pub fn start(&mut self, clock: &impl Clock) -> bool {
        match self.state {
            RunState::Running => false,
            RunState::Paused => {
                self.state = RunState::Running;
                info!(tickets = self.stats.tickets_processed, "session resumed");
                true
            }
            RunState::Idle => {
                self.state = RunState::Running;
                self.canceled = false;
                self.started_at = Some(clock.now());
                self.session_tickets = 0;
                self.current_day = 0;
                self.tickets_today = 0;
                self.held = None;
                if let Some(seed) = self.settings.seed {
                    self.rng = DrawRng::seeded(seed);
                }
                self.prepare_target();
                info!(
                    preset = %self.settings.preset,
                    target = ?self.target.main,
                    bonus = ?self.target.bonus,
                    "session started"
                );
                true
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            info!(tickets = self.stats.tickets_processed, "session paused");
        }
    }

    /// Cancel the session, keeping stats.
    ///
    /// Rows held back by the rate cap are returned as a final tick.
    pub fn stop(&mut self, clock: &impl Clock) -> Option<Event> {
        if self.state != RunState::Idle {
            info!(tickets = self.stats.tickets_processed, "session stopped");
        }
        self.state = RunState::Idle;
        self.canceled = true;
        let held = self.held.take()?;
        Some(Event::tick(held.rows, self.snapshot(clock.now())))
    }

    /// Cancel the session and zero all counters. Settings are kept.
    pub fn reset(&mut self) -> Event {
        self.state = RunState::Idle;
        self.canceled = true;
        self.stats = RunStats::default();
        self.started_at = None;
        self.session_tickets = 0;
        self.current_day = 0;
        self.tickets_today = 0;
        self.held = None;
        info!("session reset");
        Event::Reset {
            stats: self.stats.clone(),
        }
    }

    /// Stats with throughput fields filled in for `now`.
    pub fn snapshot(&self, now: Instant) -> RunStats {
        let elapsed = self.elapsed(now).as_secs_f64();
        RunStats {
            rate_tickets_per_sec: self.rate(now),
            elapsed_seconds: elapsed,
            ..self.stats.clone()
        }
    }

    /// Tickets per second bought in the current session.
    pub fn rate(&self, now: Instant) -> f64 {
        let elapsed = self.elapsed(now).as_secs_f64();
        if elapsed > 0.0 {
            self.session_tickets as f64 / elapsed
        } else {
            0.0
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Check cancellation and the configured run limit.
    pub fn should_stop(&self, now: Instant) -> Option<StopReason> {
        if self.canceled {
            return Some(StopReason::Canceled);
        }
        let limit = self.settings.cfg.limit;
        if limit.is_unlimited() {
            return None;
        }
        let reached = match limit.kind {
            LimitKind::Tickets => self.stats.tickets_processed >= limit.value,
            LimitKind::Minutes => self.elapsed(now).as_secs_f64() / 60.0 >= limit.value as f64,
            LimitKind::Days => self.stats.days_elapsed >= limit.value,
        };
        reached.then_some(StopReason::Limit)
    }

    /// Buy up to one batch of tickets.
    pub fn process_batch(&mut self, clock: &impl Clock) -> Batch {
        let mut batch = Batch::default();
        if !self.is_active() {
            return batch;
        }

        let size = if self.hidden {
            self.settings.pricing.batch_size.min(HIDDEN_BATCH_CEILING)
        } else {
            self.settings.pricing.batch_size
        };
        let resolver = Resolver::from_settings(&self.settings);
        let tickets_per_day = self.settings.pricing.tickets_per_day;
        let now = clock.now();
        let timestamp_ms = clock.wall_ms();
        batch.rows.reserve(size as usize);

        for _ in 0..size {
            if let Some(reason) = self.should_stop(now) {
                self.finish(reason);
                batch.stop = Some(reason);
                break;
            }

            let ticket = self.next_ticket();
            let resolution = resolver.resolve(&ticket, &self.target);
            let jackpot = resolution.kind == RecordKind::Jackpot;
            self.stats
                .record(resolution.cost_minor, resolution.prize_minor, jackpot);
            self.session_tickets += 1;
            if tickets_per_day > 0 {
                self.stats.days_elapsed = self.stats.tickets_processed / tickets_per_day as u64;
            }
            batch.rows.push(PurchaseRecord {
                index: self.stats.tickets_processed,
                main: ticket.main,
                bonus: ticket.bonus,
                main_matches: resolution.main_matches,
                bonus_matched: resolution.bonus_matched,
                prize_minor: resolution.prize_minor,
                cost_minor: resolution.cost_minor,
                net_minor: resolution.net_minor,
                day: self.current_day,
                kind: resolution.kind,
                timestamp_ms,
            });

            if jackpot && self.stop_on_jackpot {
                self.finish(StopReason::Jackpot);
                batch.stop = Some(StopReason::Jackpot);
                break;
            }

            if tickets_per_day > 0 {
                self.tickets_today += 1;
                if self.tickets_today >= tickets_per_day {
                    self.tickets_today = 0;
                    self.current_day += 1;
                    batch.days.push(self.current_day);
                    if self.settings.target.mode == TargetMode::PerDay {
                        self.target = self.rng.target(&self.settings.game);
                        debug!(day = self.current_day, target = ?self.target.main, "drew daily target");
                    }
                }
            }
        }

        debug!(
            rows = batch.rows.len(),
            tickets = self.stats.tickets_processed,
            net = self.stats.net_minor,
            "processed batch"
        );
        batch
    }

    /// Run one scheduled step: process a batch (or release held rows) and
    /// decide what to emit and when to run again.
    pub fn tick(&mut self, clock: &impl Clock) -> Tick {
        if !self.is_active() {
            return Tick {
                events: vec![self.state_event()],
                next: None,
            };
        }

        // Release rows held by the rate cap before buying more
        if let Some(held) = self.held.take() {
            let now = clock.now();
            if self.over_rate_cap(now) {
                self.held = Some(held);
                return Tick {
                    events: Vec::new(),
                    next: Some(self.eco_delay()),
                };
            }
            let mut events = day_events(held.days);
            events.push(Event::tick(held.rows, self.snapshot(now)));
            return Tick {
                events,
                next: Some(self.delay()),
            };
        }

        let Batch { rows, days, stop } = self.process_batch(clock);
        let now = clock.now();
        if rows.is_empty() {
            self.state = RunState::Idle;
            let mut events = day_events(days);
            events.push(self.state_event());
            return Tick { events, next: None };
        }

        if stop.is_none() && self.over_rate_cap(now) {
            debug!(rate = self.rate(now), "rate cap exceeded, holding batch");
            self.held = Some(Held { rows, days });
            return Tick {
                events: Vec::new(),
                next: Some(self.eco_delay()),
            };
        }

        let mut events = day_events(days);
        events.push(Event::tick(rows, self.snapshot(now)));
        if stop.is_some() {
            events.push(self.state_event());
            return Tick { events, next: None };
        }
        Tick {
            events,
            next: Some(self.delay()),
        }
    }

    /// Delay before the next regular tick.
    pub fn delay(&self) -> Duration {
        let ui_delay = self.settings.pricing.ui_delay_ms;
        if self.hidden {
            Duration::from_millis((ui_delay * 2).max(HIDDEN_MIN_DELAY_MS))
        } else {
            Duration::from_millis(ui_delay)
        }
    }

    fn eco_delay(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.settings.eco.rate_cap_per_second.max(1) as u64)
    }

    fn over_rate_cap(&self, now: Instant) -> bool {
        let eco = self.settings.eco;
        eco.enabled && self.rate(now) > eco.rate_cap_per_second as f64
    }

    fn finish(&mut self, reason: StopReason) {
        self.state = RunState::Idle;
        info!(
            ?reason,
            tickets = self.stats.tickets_processed,
            jackpots = self.stats.jackpots_hit,
            net = self.stats.net_minor,
            "session complete"
        );
    }

    fn next_ticket(&mut self) -> Ticket {
        match self.queue.pop_front() {
            Some(ticket) => ticket,
            None => self.rng.ticket(&self.settings),
        }
    }

    /// Choose the winning numbers for a new session.
    fn prepare_target(&mut self) {
        if std::mem::take(&mut self.target_supplied) {
            return;
        }
        let game = &self.settings.game;
        let fixed = match self.settings.target.mode {
            TargetMode::Fixed => {
                let config = &self.settings.target;
                Target::new(config.fixed_main.clone(), config.fixed_bonus)
                    .sanitize(game)
                    .or_else(|| self.target.sanitize(game))
            }
            TargetMode::PerRun | TargetMode::PerDay => None,
        };
        self.target = match fixed {
            Some(target) => target,
            None => self.rng.target(game),
        };
    }
}

fn day_events(days: Vec<u64>) -> Vec<Event> {
    days.into_iter().map(|day| Event::Day { day }).collect()
}
