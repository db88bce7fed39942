//! Settings files.
//!
//! Files are YAML, or JSON when the extension is `.json`, and use the same
//! camelCase field names as the `settings` command. Every field is
//! optional. When `game`, `prizeMap` or `pricing.ticketPrice` are omitted
//! they are taken from the file's `preset`.

use lottosim_types::Settings;
use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid yaml settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid json settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Read and parse a settings file.
pub fn load(path: &Path) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, Format::from_path(path))
}

/// Parse settings text. The result is not normalized.
pub fn parse(text: &str, format: Format) -> Result<Settings, ConfigError> {
    let value: Value = match format {
        _ if text.trim().is_empty() => Value::Null,
        Format::Yaml => serde_yaml::from_str(text)?,
        Format::Json => serde_json::from_str(text)?,
    };
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        value => value,
    };
    let mut settings: Settings = serde_json::from_value(value.clone())?;

    let preset = settings.preset;
    if value.get("game").is_none() {
        if let Some(game) = preset.game() {
            settings.game = game;
        }
    }
    if value.get("prizeMap").is_none() {
        if let Some(prize_map) = preset.prize_map() {
            settings.prize_map = prize_map.to_string();
        }
    }
    if value.pointer("/pricing/ticketPrice").is_none() {
        if let Some(price) = preset.ticket_price() {
            settings.pricing.ticket_price = price;
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottosim_types::{LimitKind, Preset, TargetMode};

    #[test]
    fn test_empty_file_is_default() {
        let settings = parse("", Format::Yaml).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_yaml() {
        let text = "
preset: mini5
pricing:
  batchSize: 250
  ticketsPerDay: 10
cfg:
  stopOnJackpot: true
  limit:
    kind: days
    value: 30
target:
  mode: perDay
excludedNumbers: [1, 2, 3]
seed: 42
";
        let settings = parse(text, Format::Yaml).unwrap();
        assert_eq!(settings.preset, Preset::Mini5);
        assert_eq!(settings.game.max_main, 35);
        assert_eq!(settings.game.main_count, 5);
        assert!(!settings.game.has_bonus);
        assert_eq!(settings.pricing.ticket_price, 1.0);
        assert_eq!(settings.pricing.batch_size, 250);
        assert_eq!(settings.pricing.tickets_per_day, 10);
        assert!(settings.prize_map.starts_with("5=JACKPOT"));
        assert!(settings.cfg.stop_on_jackpot);
        assert_eq!(settings.cfg.limit.kind, LimitKind::Days);
        assert_eq!(settings.cfg.limit.value, 30);
        assert_eq!(settings.target.mode, TargetMode::PerDay);
        assert_eq!(settings.excluded_numbers.len(), 3);
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_explicit_fields_override_preset() {
        let text = r#"{
            "preset": "powerball",
            "game": {"maxMain": 40, "mainCount": 4, "hasBonus": false},
            "prizeMap": "4=JACKPOT\n3=50",
            "pricing": {"ticketPrice": 3.5, "uiDelay": 50}
        }"#;
        let settings = parse(text, Format::Json).unwrap();
        assert_eq!(settings.game.max_main, 40);
        assert_eq!(settings.game.main_count, 4);
        assert_eq!(settings.prize_map, "4=JACKPOT\n3=50");
        assert_eq!(settings.pricing.ticket_price, 3.5);
        assert_eq!(settings.pricing.ui_delay_ms, 50);
    }

    #[test]
    fn test_unknown_preset_is_custom() {
        let settings = parse("preset: lotto9000\n", Format::Yaml).unwrap();
        assert_eq!(settings.preset, Preset::Custom);
        assert_eq!(settings.game, Settings::default().game);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("settings")), Format::Yaml);
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            parse("pricing: [1, 2", Format::Yaml),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            parse(r#"{"seed": "abc"}"#, Format::Json),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            load(Path::new("/nonexistent/lottosim.yaml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
