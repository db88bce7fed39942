use super::*;
use std::collections::BTreeSet;

#[test]
fn test_to_minor_rounds_and_clamps() {
    assert_eq!(to_minor(2.0), 200);
    assert_eq!(to_minor(2.5), 250);
    assert_eq!(to_minor(0.1 + 0.2), 30);
    assert_eq!(to_minor(-3.0), 0);
    assert_eq!(to_minor(f64::NAN), 0);
    assert_eq!(to_minor(1e30), MAX_AMOUNT_MINOR);
    assert_eq!(to_minor(f64::INFINITY), 0);
}

#[test]
fn test_net_minor_saturates() {
    assert_eq!(net_minor(1_000, 200), 800);
    assert_eq!(net_minor(200, 1_000), -800);
    assert_eq!(net_minor(u64::MAX, 0), i64::MAX);
    assert_eq!(net_minor(0, u64::MAX), -i64::MAX);
}

#[test]
fn test_normalize_caps_money() {
    let mut settings = Settings::default();
    settings.pricing.jackpot = 1e17;
    settings.pricing.ticket_price = 1e20;
    let settings = settings.normalize();
    assert_eq!(settings.pricing.jackpot, MAX_AMOUNT_MAJOR);
    assert_eq!(settings.jackpot_minor(), MAX_AMOUNT_MINOR);
    assert_eq!(settings.ticket_cost_minor(), MAX_AMOUNT_MINOR);
    assert!(settings.jackpot_minor() <= i64::MAX as u64);
}

#[test]
fn test_default_settings_use_classic6() {
    let settings = Settings::default();
    assert_eq!(settings.preset, Preset::Classic6);
    assert_eq!(settings.game, Preset::Classic6.game().unwrap());
    assert_eq!(settings.ticket_cost_minor(), 200);
    assert_eq!(settings.jackpot_minor(), 100_000_000);
    assert!(settings.prize_map.starts_with("6,1=JACKPOT"));
}

#[test]
fn test_preset_keys_roundtrip() {
    for preset in Preset::BUILT_IN {
        assert_eq!(Preset::from_key(preset.key()), Some(preset));
        let game = preset.game().unwrap();
        assert!(game.main_count <= game.max_main);
        assert!(preset.prize_map().unwrap().contains("JACKPOT"));
    }
    assert_eq!(Preset::from(String::from("nonsense")), Preset::Custom);
    assert_eq!(Preset::Mini5.game().unwrap().bonus_range(), None);
}

#[test]
fn test_apply_custom_preset_keeps_game() {
    let mut settings = Settings::from_preset(Preset::Powerball);
    settings.apply_preset(Preset::Custom);
    assert_eq!(settings.preset, Preset::Custom);
    assert_eq!(settings.game.max_main, 69);
    assert!(settings.prize_map.starts_with("5,1=JACKPOT"));
}

#[test]
fn test_normalize_clamps_game_and_pricing() {
    let mut settings = Settings::default();
    settings.game = GameConfig {
        max_main: 3,
        main_count: 50,
        has_bonus: false,
        max_bonus: 40,
    };
    settings.pricing.batch_size = 0;
    settings.pricing.ui_delay_ms = 60_000;
    settings.pricing.ticket_price = -1.0;
    settings.eco.rate_cap_per_second = 0;
    settings.log_cap = 1;

    let settings = settings.normalize();
    assert_eq!(settings.game.main_count, MAX_MAIN_COUNT);
    assert_eq!(settings.game.max_main, MAX_MAIN_COUNT);
    assert_eq!(settings.game.max_bonus, 0);
    assert_eq!(settings.pricing.batch_size, MIN_BATCH_SIZE);
    assert_eq!(settings.pricing.ui_delay_ms, MAX_UI_DELAY_MS);
    assert_eq!(settings.pricing.ticket_price, 0.0);
    assert_eq!(settings.eco.rate_cap_per_second, MIN_RATE_CAP);
    assert_eq!(settings.log_cap, MIN_LOG_CAP);
}

#[test]
fn test_normalize_filters_fixed_target() {
    let mut settings = Settings::default();
    settings.target.fixed_main = vec![0, 3, 3, 50, 7, 1, 2, 9, 10, 11];
    settings.target.fixed_bonus = Some(11);
    settings.excluded_numbers = [0, 5, 99].into_iter().collect();

    let settings = settings.normalize();
    assert_eq!(settings.target.fixed_main, vec![3, 7, 1, 2, 9, 10]);
    assert_eq!(settings.target.fixed_bonus, None);
    assert_eq!(settings.excluded_numbers.into_iter().collect::<Vec<_>>(), vec![5]);
}

#[test]
fn test_normalize_fills_blank_prize_map() {
    let mut settings = Settings::default();
    settings.apply_preset(Preset::Custom);
    settings.game = GameConfig {
        max_main: 40,
        main_count: 4,
        has_bonus: false,
        max_bonus: 0,
    };
    settings.prize_map = "  \n".to_string();

    let settings = settings.normalize();
    assert_eq!(settings.prize_map, "4=JACKPOT\n3=10000\n2=10000");
}

#[test]
fn test_normalize_makes_number_picks_disjoint() {
    let mut settings = Settings::default();
    settings.pinned_numbers = [0, 1, 2, 3, 4, 5, 6, 7, 60].into_iter().collect();
    settings.preferred_numbers = [5, 10, 11, 99].into_iter().collect();
    settings.excluded_numbers = [1, 10, 12].into_iter().collect();
    let settings = settings.normalize();

    let set = |numbers: &[u16]| numbers.iter().copied().collect::<BTreeSet<_>>();
    assert_eq!(settings.pinned_numbers, set(&[1, 2, 3, 4, 5, 6]));
    assert_eq!(settings.preferred_numbers, set(&[10, 11]));
    assert_eq!(settings.excluded_numbers, set(&[12]));
}

#[test]
fn test_number_picks_parse_from_json() {
    let settings: Settings =
        serde_json::from_str(r#"{"pinnedNumbers":[7],"preferredNumbers":[8,9]}"#).unwrap();
    assert_eq!(settings.pinned_numbers.len(), 1);
    assert_eq!(settings.preferred_numbers.len(), 2);
    assert!(settings.excluded_numbers.is_empty());
}

#[test]
fn test_default_prize_map_with_bonus() {
    let map = default_prize_map(3, true);
    assert_eq!(map, "3,1=JACKPOT\n3,0=1000000\n2,1=100000\n2,0=10000");
}

#[test]
fn test_target_sanitize() {
    let game = GameConfig::default();
    let target = Target::new(vec![6, 5, 4, 3, 2, 1, 1], Some(4));
    assert_eq!(
        target.sanitize(&game),
        Some(Target::new(vec![1, 2, 3, 4, 5, 6], Some(4)))
    );

    let short = Target::new(vec![1, 2, 3, 4, 5, 60], None);
    assert_eq!(short.sanitize(&game), None);

    let bad_bonus = Target::new(vec![1, 2, 3, 4, 5, 6], Some(42));
    assert_eq!(bad_bonus.sanitize(&game).unwrap().bonus, None);
}

#[test]
fn test_run_stats_conservation() {
    let mut stats = RunStats::default();
    stats.record(200, 0, false);
    stats.record(200, 1_000, false);
    stats.record(200, 100_000_000, true);

    assert_eq!(stats.tickets_processed, 3);
    assert_eq!(stats.jackpots_hit, 1);
    assert_eq!(stats.spent_minor, 600);
    assert_eq!(stats.net_minor, stats.paid_minor as i64 - stats.spent_minor as i64);
    assert!(stats.roi_percent > 0.0);
}

#[test]
fn test_run_stats_roi_zero_without_spend() {
    let mut stats = RunStats::default();
    stats.record(0, 500, false);
    assert_eq!(stats.roi_percent, 0.0);
    assert_eq!(stats.net_minor, 500);
}

#[test]
fn test_run_stats_saturate() {
    let mut stats = RunStats::default();
    stats.record(200, u64::MAX, true);
    stats.record(200, u64::MAX, true);
    assert_eq!(stats.paid_minor, u64::MAX);
    assert_eq!(stats.spent_minor, 400);
    assert_eq!(stats.net_minor, i64::MAX - 400);
    assert!(stats.net_minor > 0);
}

#[test]
fn test_settings_partial_json() {
    let settings: Settings = serde_json::from_str(
        r#"{"preset":"mini5","cfg":{"stopOnJackpot":true,"limit":{"kind":"days","value":3}},"eco":{"enabled":true,"rateCap":50}}"#,
    )
    .unwrap();
    assert_eq!(settings.preset, Preset::Mini5);
    assert!(settings.cfg.stop_on_jackpot);
    assert_eq!(settings.cfg.limit.kind, LimitKind::Days);
    assert_eq!(settings.cfg.limit.value, 3);
    assert_eq!(settings.eco.rate_cap_per_second, 50);
}
