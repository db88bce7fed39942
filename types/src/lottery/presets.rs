use serde::{Deserialize, Serialize};
use std::fmt;

use super::GameConfig;

const CLASSIC6_PRIZES: &str = "6,1=JACKPOT
6,0=1000000
5,1=100000
5,0=10000
4,1=1000
4,0=100
3,1=50
3,0=10
2,1=5";

const MINI5_PRIZES: &str = "5=JACKPOT
4=10000
3=100
2=10";

const MEGA_MILLIONS_PRIZES: &str = "5,1=JACKPOT
5,0=1000000
4,1=10000
4,0=500
3,1=200
3,0=10
2,1=10
1,1=4
0,1=2";

const POWERBALL_PRIZES: &str = "5,1=JACKPOT
5,0=1000000
4,1=50000
4,0=100
3,1=100
3,0=7
2,1=7
1,1=4
0,1=4";

const EURO_MILLIONS_PRIZES: &str = "5,1=JACKPOT
5,0=1000000
4,1=5000
4,0=500
3,1=200
3,0=50
2,1=20
2,0=10
1,1=8
0,1=4";

/// Built-in game models.
///
/// Serialized by key; unknown keys deserialize to [`Preset::Custom`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Preset {
    #[default]
    Classic6,
    Mini5,
    MegaMillions,
    Powerball,
    EuroMillions,
    Custom,
}

impl Preset {
    pub const BUILT_IN: [Preset; 5] = [
        Preset::Classic6,
        Preset::Mini5,
        Preset::MegaMillions,
        Preset::Powerball,
        Preset::EuroMillions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Preset::Classic6 => "classic6",
            Preset::Mini5 => "mini5",
            Preset::MegaMillions => "megaMillions",
            Preset::Powerball => "powerball",
            Preset::EuroMillions => "euroMillions",
            Preset::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::BUILT_IN
            .into_iter()
            .chain([Preset::Custom])
            .find(|preset| preset.key().eq_ignore_ascii_case(key))
    }

    pub fn game(&self) -> Option<GameConfig> {
        let (max_main, main_count, max_bonus) = match self {
            Preset::Classic6 => (49, 6, 10),
            Preset::Mini5 => (35, 5, 0),
            Preset::MegaMillions => (70, 5, 25),
            Preset::Powerball => (69, 5, 26),
            Preset::EuroMillions => (50, 5, 12),
            Preset::Custom => return None,
        };
        Some(GameConfig {
            max_main,
            main_count,
            has_bonus: max_bonus > 0,
            max_bonus,
        })
    }

    pub fn ticket_price(&self) -> Option<f64> {
        match self {
            Preset::Mini5 => Some(1.0),
            Preset::EuroMillions => Some(2.5),
            Preset::Custom => None,
            _ => Some(2.0),
        }
    }

    pub fn prize_map(&self) -> Option<&'static str> {
        match self {
            Preset::Classic6 => Some(CLASSIC6_PRIZES),
            Preset::Mini5 => Some(MINI5_PRIZES),
            Preset::MegaMillions => Some(MEGA_MILLIONS_PRIZES),
            Preset::Powerball => Some(POWERBALL_PRIZES),
            Preset::EuroMillions => Some(EURO_MILLIONS_PRIZES),
            Preset::Custom => None,
        }
    }
}

impl From<String> for Preset {
    fn from(key: String) -> Self {
        Preset::from_key(&key).unwrap_or(Preset::Custom)
    }
}

impl From<Preset> for String {
    fn from(preset: Preset) -> Self {
        preset.key().to_string()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Generate a prize table for a game without a preset.
///
/// The top tier is the jackpot; lower tiers pay descending fixed amounts down
/// to two matches.
pub fn default_prize_map(main_count: u16, has_bonus: bool) -> String {
    let mut lines = Vec::new();
    if has_bonus {
        lines.push(format!("{main_count},1=JACKPOT"));
        lines.push(format!("{main_count},0=1000000"));
        for m in (2..main_count).rev() {
            lines.push(format!("{m},1=100000"));
            lines.push(format!("{m},0=10000"));
        }
    } else {
        lines.push(format!("{main_count}=JACKPOT"));
        for m in (2..main_count).rev() {
            lines.push(format!("{m}=10000"));
        }
    }
    lines.join("\n")
}
