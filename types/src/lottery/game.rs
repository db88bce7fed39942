use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::{
    default_prize_map, to_minor, Preset, DEFAULT_BATCH_SIZE, DEFAULT_JACKPOT, DEFAULT_LOG_CAP,
    DEFAULT_RATE_CAP, DEFAULT_UI_DELAY_MS, MAX_AMOUNT_MAJOR, MAX_BATCH_SIZE, MAX_BONUS_NUMBER,
    MAX_LOG_CAP, MAX_MAIN_COUNT, MAX_MAIN_NUMBER, MAX_RATE_CAP, MAX_UI_DELAY_MS, MIN_BATCH_SIZE,
    MIN_BONUS_NUMBER, MIN_LOG_CAP, MIN_MAIN_COUNT, MIN_RATE_CAP, MIN_UI_DELAY_MS,
};

/// Shape of the drawn numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub max_main: u16,
    pub main_count: u16,
    pub has_bonus: bool,
    /// Ignored unless `has_bonus` is set.
    pub max_bonus: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_main: 49,
            main_count: 6,
            has_bonus: true,
            max_bonus: 10,
        }
    }
}

impl GameConfig {
    /// Range a bonus number is drawn from, if the game has one.
    pub fn bonus_range(&self) -> Option<RangeInclusive<u16>> {
        if self.has_bonus && self.max_bonus >= MIN_BONUS_NUMBER {
            Some(MIN_BONUS_NUMBER..=self.max_bonus)
        } else {
            None
        }
    }

    pub fn contains_main(&self, n: u16) -> bool {
        n >= 1 && n <= self.max_main
    }

    fn normalize(&mut self) {
        self.main_count = self.main_count.clamp(MIN_MAIN_COUNT, MAX_MAIN_COUNT);
        self.max_main = self.max_main.clamp(self.main_count, MAX_MAIN_NUMBER);
        self.max_bonus = if self.has_bonus {
            self.max_bonus.clamp(MIN_BONUS_NUMBER, MAX_BONUS_NUMBER)
        } else {
            0
        };
    }
}

/// Ticket pricing and pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingConfig {
    /// Price of one ticket in major units.
    pub ticket_price: f64,
    /// Jackpot payout in major units.
    pub jackpot: f64,
    /// Tickets bought per simulated day (0 = unlimited, no day boundaries).
    pub tickets_per_day: u32,
    pub batch_size: u32,
    #[serde(rename = "uiDelay")]
    pub ui_delay_ms: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ticket_price: 2.0,
            jackpot: DEFAULT_JACKPOT,
            tickets_per_day: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            ui_delay_ms: DEFAULT_UI_DELAY_MS,
        }
    }
}

impl PricingConfig {
    pub fn ticket_cost_minor(&self) -> u64 {
        to_minor(self.ticket_price)
    }

    pub fn jackpot_minor(&self) -> u64 {
        to_minor(self.jackpot)
    }

    fn normalize(&mut self) {
        if !self.ticket_price.is_finite() || self.ticket_price < 0.0 {
            self.ticket_price = 0.0;
        }
        if !self.jackpot.is_finite() || self.jackpot < 0.0 {
            self.jackpot = DEFAULT_JACKPOT;
        }
        self.ticket_price = self.ticket_price.min(MAX_AMOUNT_MAJOR);
        self.jackpot = self.jackpot.min(MAX_AMOUNT_MAJOR);
        self.batch_size = self.batch_size.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
        self.ui_delay_ms = self.ui_delay_ms.clamp(MIN_UI_DELAY_MS, MAX_UI_DELAY_MS);
    }
}

/// Dimension a run limit is measured in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitKind {
    #[default]
    Tickets,
    Minutes,
    Days,
}

/// Run limit; a value of 0 means unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub kind: LimitKind,
    pub value: u64,
}

impl LimitConfig {
    pub fn tickets(value: u64) -> Self {
        Self {
            kind: LimitKind::Tickets,
            value,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.value == 0
    }
}

/// Session behaviour knobs carried in the settings snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub stop_on_jackpot: bool,
    pub limit: LimitConfig,
}

/// Throughput cap ("eco mode").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcoConfig {
    pub enabled: bool,
    #[serde(rename = "rateCap")]
    pub rate_cap_per_second: u32,
}

impl Default for EcoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rate_cap_per_second: DEFAULT_RATE_CAP,
        }
    }
}

/// How the winning numbers are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetMode {
    /// Use `fixed_main`/`fixed_bonus`, drawing randomly if they are incomplete.
    #[default]
    Fixed,
    /// Draw a fresh target for every new session.
    PerRun,
    /// Draw a fresh target for every new session and on every day boundary.
    PerDay,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetConfig {
    pub mode: TargetMode,
    pub fixed_main: Vec<u16>,
    pub fixed_bonus: Option<u16>,
}

/// Full settings snapshot consumed by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub preset: Preset,
    pub game: GameConfig,
    pub pricing: PricingConfig,
    pub cfg: RunConfig,
    pub eco: EcoConfig,
    pub target: TargetConfig,
    /// Raw prize table text, parsed by the engine once per batch.
    pub prize_map: String,
    /// Main numbers every generated ticket contains (at most `main_count`).
    pub pinned_numbers: BTreeSet<u16>,
    /// Main numbers generated tickets are filled from after the pinned ones.
    pub preferred_numbers: BTreeSet<u16>,
    /// Main numbers generated tickets never contain.
    pub excluded_numbers: BTreeSet<u16>,
    /// Seed for reproducible runs; `None` uses the strongest available source.
    pub seed: Option<u64>,
    /// Retention of the host-side purchase log.
    pub log_cap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            preset: Preset::Classic6,
            game: GameConfig::default(),
            pricing: PricingConfig::default(),
            cfg: RunConfig::default(),
            eco: EcoConfig::default(),
            target: TargetConfig::default(),
            prize_map: String::new(),
            pinned_numbers: BTreeSet::new(),
            preferred_numbers: BTreeSet::new(),
            excluded_numbers: BTreeSet::new(),
            seed: None,
            log_cap: DEFAULT_LOG_CAP,
        };
        settings.apply_preset(Preset::Classic6);
        settings
    }
}

impl Settings {
    /// Build normalized settings from a built-in preset.
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings.normalize()
    }

    /// Overwrite the game, ticket price and prize table with a preset's values.
    ///
    /// `Preset::Custom` only changes the preset marker.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        if let Some(game) = preset.game() {
            self.game = game;
        }
        if let Some(price) = preset.ticket_price() {
            self.pricing.ticket_price = price;
        }
        match preset.prize_map() {
            Some(map) => self.prize_map = map.to_string(),
            None if self.prize_map.trim().is_empty() => {
                self.prize_map = default_prize_map(self.game.main_count, self.game.has_bonus);
            }
            None => {}
        }
    }

    /// Clamp every field into its supported range.
    ///
    /// Out-of-range values are corrected rather than rejected; a blank prize
    /// table is replaced by the preset's table (or a generated default).
    pub fn normalize(mut self) -> Self {
        self.game.normalize();
        self.pricing.normalize();
        self.eco.rate_cap_per_second = self
            .eco
            .rate_cap_per_second
            .clamp(MIN_RATE_CAP, MAX_RATE_CAP);
        self.log_cap = self.log_cap.clamp(MIN_LOG_CAP, MAX_LOG_CAP);

        let game = &self.game;
        let mut seen = BTreeSet::new();
        self.target.fixed_main = self
            .target
            .fixed_main
            .iter()
            .copied()
            .filter(|&n| game.contains_main(n) && seen.insert(n))
            .take(game.main_count as usize)
            .collect();
        self.target.fixed_bonus = match (self.target.fixed_bonus, game.bonus_range()) {
            (Some(bonus), Some(range)) if range.contains(&bonus) => Some(bonus),
            _ => None,
        };

        // Pinned wins over preferred, which wins over excluded
        self.pinned_numbers = self
            .pinned_numbers
            .iter()
            .copied()
            .filter(|&n| game.contains_main(n))
            .take(game.main_count as usize)
            .collect();
        let pinned = &self.pinned_numbers;
        self.preferred_numbers
            .retain(|&n| game.contains_main(n) && !pinned.contains(&n));
        let preferred = &self.preferred_numbers;
        self.excluded_numbers.retain(|&n| {
            game.contains_main(n) && !pinned.contains(&n) && !preferred.contains(&n)
        });

        if self.prize_map.trim().is_empty() {
            self.prize_map = match self.preset.prize_map() {
                Some(map) => map.to_string(),
                None => default_prize_map(self.game.main_count, self.game.has_bonus),
            };
        }
        self
    }

    pub fn ticket_cost_minor(&self) -> u64 {
        self.pricing.ticket_cost_minor()
    }

    pub fn jackpot_minor(&self) -> u64 {
        self.pricing.jackpot_minor()
    }
}
