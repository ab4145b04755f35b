#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.

use std::time::Duration;

use lane_defence_core::{Command, EnemyKind, Event, GamePhase, WaveId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_SPAWN_INTERVAL_MS: u64 = 1_800;
const DEFAULT_INITIAL_QUOTA: u32 = 5;
const DEFAULT_QUOTA_INCREMENT: u32 = 10;
const DEFAULT_SEED: u64 = 0x5eed_1a2e_de0f_ce00;

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulated milliseconds between two spawns of the same wave.
    pub spawn_interval_ms: u64,
    /// Quota before the first wave; each wave adds `quota_increment`.
    pub initial_quota: u32,
    /// Enemies added to the quota whenever a wave starts.
    pub quota_increment: u32,
    /// Seed for the variant picker.
    pub seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub fn new(spawn_interval: Duration, seed: u64) -> Self {
        Self {
            spawn_interval_ms: u64::try_from(spawn_interval.as_millis()).unwrap_or(u64::MAX),
            seed,
            ..Self::default()
        }
    }

    /// Spawn cadence as a duration.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            initial_quota: DEFAULT_INITIAL_QUOTA,
            quota_increment: DEFAULT_QUOTA_INCREMENT,
            seed: DEFAULT_SEED,
        }
    }
}

/// Pure system that paces waves and picks which enemies spawn.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
    rng: ChaCha8Rng,
    wave: WaveId,
    quota: u32,
    spawned: u32,
    timer: Duration,
    active: bool,
}

impl WaveScheduler {
    /// Creates a new wave scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            wave: WaveId::default(),
            quota: config.initial_quota,
            spawned: 0,
            timer: Duration::ZERO,
            active: false,
        }
    }

    /// Number of the most recently started wave.
    #[must_use]
    pub fn wave(&self) -> WaveId {
        self.wave
    }

    /// Total enemies the current wave spawns.
    #[must_use]
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Enemies spawned so far in the current wave.
    #[must_use]
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Reports whether the current wave still has enemies to spawn.
    #[must_use]
    pub fn is_wave_active(&self) -> bool {
        self.active
    }

    /// Consumes events and session state to emit wave commands.
    ///
    /// A `MapConfigured` event resets the scheduler and starts wave one in
    /// any phase. Time only advances the schedule while the game is running.
    /// Once a wave has spawned its quota and the field is clear, the next
    /// wave is started and a pause is requested as the between-wave break.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        live_enemies: usize,
        path_available: bool,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::MapConfigured { .. } => {
                    self.reset();
                    self.start_new_wave(out);
                }
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        if !phase.is_running() {
            return;
        }

        let spawned_now = self.advance(elapsed, path_available, out);

        if !self.active && live_enemies + spawned_now == 0 {
            self.start_new_wave(out);
            out.push(Command::Pause);
        }
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.wave = WaveId::default();
        self.quota = self.config.initial_quota;
        self.spawned = 0;
        self.timer = Duration::ZERO;
        self.active = false;
    }

    fn start_new_wave(&mut self, out: &mut Vec<Command>) {
        self.wave = self.wave.next();
        self.quota = self.quota.saturating_add(self.config.quota_increment);
        self.spawned = 0;
        self.timer = Duration::ZERO;
        self.active = true;
        debug!(wave = self.wave.get(), quota = self.quota, "scheduling wave");
        out.push(Command::StartWave { wave: self.wave });
    }

    /// Advances the spawn timer, returning how many spawns were emitted.
    fn advance(&mut self, elapsed: Duration, path_available: bool, out: &mut Vec<Command>) -> usize {
        if !self.active {
            return 0;
        }

        self.timer = self.timer.saturating_add(elapsed);
        let mut emitted = 0;
        if self.spawned < self.quota && self.timer >= self.config.spawn_interval() {
            if path_available {
                let kind = self.pick_kind();
                out.push(Command::SpawnEnemy {
                    kind,
                    wave: self.wave,
                });
                self.spawned += 1;
                emitted = 1;
            }
            self.timer = Duration::ZERO;
        }

        if self.spawned >= self.quota {
            self.active = false;
        }
        emitted
    }

    fn pick_kind(&mut self) -> EnemyKind {
        EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(scheduler: &mut WaveScheduler) -> Vec<Command> {
        let mut out = Vec::new();
        scheduler.handle(
            &[Event::MapConfigured {
                columns: 20,
                rows: 20,
                path_length: 12,
            }],
            GamePhase::Welcome,
            0,
            true,
            &mut out,
        );
        out
    }

    fn tick(dt_ms: u64) -> [Event; 1] {
        [Event::TimeAdvanced {
            dt: Duration::from_millis(dt_ms),
        }]
    }

    #[test]
    fn map_configuration_starts_wave_one() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let out = configured(&mut scheduler);

        assert_eq!(
            out,
            vec![Command::StartWave {
                wave: WaveId::new(1)
            }]
        );
        assert_eq!(scheduler.quota(), 15);
        assert!(scheduler.is_wave_active());
    }

    #[test]
    fn quota_grows_by_increment_each_wave() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let mut out = Vec::new();
        for expected_wave in 1..=4u32 {
            scheduler.start_new_wave(&mut out);
            assert_eq!(scheduler.wave(), WaveId::new(expected_wave));
            assert_eq!(scheduler.quota(), 5 + 10 * expected_wave);
        }
    }

    #[test]
    fn spawns_once_per_interval_and_resets_timer() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let _ = configured(&mut scheduler);
        let mut out = Vec::new();

        scheduler.handle(&tick(1_000), GamePhase::ActiveGame, 1, true, &mut out);
        assert!(out.is_empty());

        scheduler.handle(&tick(5_000), GamePhase::ActiveGame, 1, true, &mut out);
        assert_eq!(out.len(), 1, "at most one spawn per advance");
        assert!(matches!(
            out[0],
            Command::SpawnEnemy {
                wave,
                ..
            } if wave == WaveId::new(1)
        ));

        out.clear();
        scheduler.handle(&tick(1_700), GamePhase::ActiveGame, 1, true, &mut out);
        assert!(out.is_empty(), "timer restarts from zero after a spawn");
        scheduler.handle(&tick(100), GamePhase::ActiveGame, 1, true, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(scheduler.spawned(), 2);
    }

    #[test]
    fn missing_path_skips_spawn_without_counting() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let _ = configured(&mut scheduler);
        let mut out = Vec::new();

        scheduler.handle(&tick(2_000), GamePhase::ActiveGame, 1, false, &mut out);

        assert!(out.is_empty());
        assert_eq!(scheduler.spawned(), 0);
        assert!(scheduler.is_wave_active());
    }

    #[test]
    fn paused_scheduler_ignores_time() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let _ = configured(&mut scheduler);
        let mut out = Vec::new();

        scheduler.handle(&tick(60_000), GamePhase::Paused, 0, true, &mut out);

        assert!(out.is_empty());
        assert_eq!(scheduler.spawned(), 0);
    }

    #[test]
    fn cleared_wave_starts_next_and_requests_pause() {
        let config = Config {
            initial_quota: 0,
            quota_increment: 1,
            ..Config::default()
        };
        let mut scheduler = WaveScheduler::new(config);
        let _ = configured(&mut scheduler);
        let mut out = Vec::new();

        scheduler.handle(&tick(1_800), GamePhase::ActiveGame, 0, true, &mut out);
        assert_eq!(out.len(), 1, "final spawn keeps the field occupied");
        assert!(!scheduler.is_wave_active());

        out.clear();
        scheduler.handle(&tick(100), GamePhase::ActiveGame, 1, true, &mut out);
        assert!(out.is_empty(), "live enemies hold the next wave back");

        scheduler.handle(&tick(100), GamePhase::ActiveGame, 0, true, &mut out);
        assert_eq!(
            out,
            vec![
                Command::StartWave {
                    wave: WaveId::new(2)
                },
                Command::Pause,
            ]
        );
        assert_eq!(scheduler.quota(), 2);
    }

    #[test]
    fn variant_sequence_is_deterministic_per_seed() {
        let kinds = |seed: u64| -> Vec<EnemyKind> {
            let mut scheduler = WaveScheduler::new(Config::new(Duration::from_millis(10), seed));
            let _ = configured(&mut scheduler);
            let mut out = Vec::new();
            for _ in 0..15 {
                scheduler.handle(&tick(10), GamePhase::ActiveGame, 1, true, &mut out);
            }
            out.iter()
                .filter_map(|command| match command {
                    Command::SpawnEnemy { kind, .. } => Some(*kind),
                    _ => None,
                })
                .collect()
        };

        let first = kinds(7);
        assert_eq!(first.len(), 15);
        assert_eq!(first, kinds(7));
    }

    #[test]
    fn configuration_defaults_match_reference_pacing() {
        let config = Config::default();
        assert_eq!(config.spawn_interval(), Duration::from_millis(1_800));
        assert_eq!(config.initial_quota, 5);
        assert_eq!(config.quota_increment, 10);
    }
}
