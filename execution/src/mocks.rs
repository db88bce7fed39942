use crate::clock::Clock;
use lottosim_types::{Preset, Settings};
use std::{
    cell::Cell,
    time::{Duration, Instant},
};

/// Wall-clock value stamped on records produced under a [ManualClock].
pub const MANUAL_WALL_MS: u64 = 1_700_000_000_000;

/// Clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn wall_ms(&self) -> u64 {
        MANUAL_WALL_MS + self.offset.get().as_millis() as u64
    }
}

/// Classic 6/49 without a bonus ball, a small prize table, `batch_size`
/// tickets per batch and a 10ms UI delay.
pub fn fixed_settings(batch_size: u32) -> Settings {
    let mut settings = Settings::from_preset(Preset::Classic6);
    settings.game.has_bonus = false;
    settings.prize_map = "6=JACKPOT\n5=1000\n4=100\n3=10".to_string();
    settings.pricing.batch_size = batch_size;
    settings.pricing.ui_delay_ms = 10;
    settings.normalize()
}
