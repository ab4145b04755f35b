use std::time::Duration;

use lane_defence_core::EconomyConfig;
use lane_defence_simulation::{Simulation, SimulationConfig, WaveConfig};

#[test]
fn partial_toml_falls_back_to_defaults() {
    let config: SimulationConfig = toml::from_str(
        r#"
            [economy]
            starting_gold = 200
            refund_percent = 50

            [waves]
            spawn_interval_ms = 900
            seed = 42
        "#,
    )
    .expect("config parses");

    assert_eq!(
        config.economy,
        EconomyConfig {
            starting_gold: 200,
            refund_percent: 50,
            ..EconomyConfig::default()
        }
    );
    assert_eq!(config.waves.spawn_interval(), Duration::from_millis(900));
    assert_eq!(config.waves.seed, 42);
    assert_eq!(config.waves.initial_quota, WaveConfig::default().initial_quota);
}

#[test]
fn empty_toml_is_the_default_configuration() {
    let config: SimulationConfig = toml::from_str("").expect("empty config parses");
    assert_eq!(config, SimulationConfig::default());
}

#[test]
fn configured_economy_reaches_the_session() {
    let config: SimulationConfig = toml::from_str(
        r#"
            [economy]
            starting_gold = 120
            starting_health = 3
        "#,
    )
    .expect("config parses");
    let simulation = Simulation::new(config);

    assert_eq!(simulation.gold(), 120);
    assert_eq!(simulation.health(), 3);
}

#[test]
fn unknown_wave_keys_are_ignored() {
    let parsed = toml::from_str::<SimulationConfig>("[waves]\nspawn_interval = 3\n");
    assert!(parsed.is_ok());
}
