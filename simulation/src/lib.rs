#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step orchestrator that sequences the world and its systems.
//!
//! [`Simulation`] owns the authoritative [`World`] together with the wave,
//! targeting and combat systems. Drivers call [`Simulation::tick`] once per
//! fixed interval and use the player operations in between; every call
//! records the events it produced, readable through
//! [`Simulation::last_events`].

use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, EconomyConfig, EnemyView, Event, GamePhase, GridView, MapId, Path,
    ProjectileView, SessionSnapshot, TowerKind, TowerTarget, TowerView, WaveId,
};
use lane_defence_system_tower_combat::TowerCombat;
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_system_waves::WaveScheduler;
use lane_defence_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

pub use lane_defence_system_waves::Config as WaveConfig;
pub use lane_defence_world::{MapProvider, StandardMaps};

/// Tunable rules for a simulation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting resources, rewards and refund policy.
    pub economy: EconomyConfig,
    /// Wave pacing and the spawn RNG seed.
    pub waves: WaveConfig,
}

/// Single-threaded orchestrator for one play session.
#[derive(Debug)]
pub struct Simulation<M = StandardMaps> {
    world: World,
    maps: M,
    waves: WaveScheduler,
    targeting: TowerTargeting,
    combat: TowerCombat,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation<StandardMaps> {
    /// Creates a session that selects among the stock maps.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_maps(config, StandardMaps)
    }
}

impl<M: MapProvider> Simulation<M> {
    /// Creates a session that looks map layouts up through `maps`.
    #[must_use]
    pub fn with_maps(config: SimulationConfig, maps: M) -> Self {
        Self {
            world: World::with_economy(config.economy),
            maps,
            waves: WaveScheduler::new(config.waves),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Advances the session by one fixed step.
    ///
    /// Does nothing unless the game is running. Stages run in order: tower
    /// cooldowns, targeting and firing, projectiles, enemy movement, the
    /// casualty scan, then wave scheduling. A game over raised by the
    /// casualty scan skips wave scheduling.
    pub fn tick(&mut self, dt: Duration) {
        self.events.clear();
        if !query::phase(&self.world).is_running() {
            return;
        }

        self.dispatch(Command::Tick { dt });

        let phase = query::phase(&self.world);
        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting
            .handle(phase, &towers, &enemies, &mut self.targets);
        self.combat
            .handle(phase, towers, &self.targets, &mut self.commands);
        self.flush_commands();

        self.dispatch(Command::AdvanceProjectiles);
        self.dispatch(Command::AdvanceEnemies);
        self.dispatch(Command::ResolveCasualties);

        if query::phase(&self.world) == GamePhase::GameOver {
            return;
        }
        self.schedule_waves(0);
        trace!(
            enemies = query::enemy_count(&self.world),
            events = self.events.len(),
            "tick complete"
        );
    }

    /// Events produced by the most recent operation.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Installs the map registered under `map` and starts wave one.
    ///
    /// Only allowed before the session has started. Returns `false` for an
    /// unknown identifier or when map selection is closed.
    pub fn select_map(&mut self, map: MapId) -> bool {
        self.events.clear();
        let Some(layout) = self.maps.layout(map) else {
            debug!(map = map.get(), "unknown map requested");
            return false;
        };
        self.dispatch(Command::ConfigureMap { layout });
        self.schedule_waves(0);

        let selected = self
            .events
            .iter()
            .any(|event| matches!(event, Event::MapConfigured { .. }));
        if selected {
            info!(map = map.get(), "map selected");
        }
        selected
    }

    /// Starts or resumes play.
    pub fn begin(&mut self) -> bool {
        self.run_phase_command(Command::Begin)
    }

    /// Suspends play.
    pub fn pause(&mut self) -> bool {
        self.run_phase_command(Command::Pause)
    }

    /// Places a tower of `kind` on `cell`, debiting its cost.
    pub fn place_tower(&mut self, cell: CellCoord, kind: TowerKind) -> bool {
        self.run_player_command(Command::PlaceTower { kind, cell }, |event| {
            matches!(event, Event::TowerPlaced { .. })
        })
    }

    /// Sells the tower on `cell`, refunding gold.
    pub fn sell_tower(&mut self, cell: CellCoord) -> bool {
        self.run_player_command(Command::SellTower { cell }, |event| {
            matches!(event, Event::TowerSold { .. })
        })
    }

    /// Upgrades the tower on `cell` by one level.
    pub fn upgrade_tower(&mut self, cell: CellCoord) -> bool {
        self.run_player_command(Command::UpgradeTower { cell }, |event| {
            matches!(event, Event::TowerUpgraded { .. })
        })
    }

    /// Applies a raw command to the world and lets the wave scheduler observe
    /// the resulting events.
    pub fn submit(&mut self, command: Command) {
        self.events.clear();
        self.dispatch(command);
        self.schedule_waves(0);
    }

    /// Live enemies in pool order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Placed towers in placement order.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// In-flight projectiles.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Terrain grid including path and tower cells.
    #[must_use]
    pub fn grid(&self) -> GridView {
        query::grid_view(&self.world)
    }

    /// Path of the selected map, `None` before a map is chosen.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        query::path(&self.world)
    }

    /// Scalar session state.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        query::session(&self.world)
    }

    /// Active phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.session().score
    }

    /// Gold available for purchases.
    #[must_use]
    pub fn gold(&self) -> u32 {
        self.session().gold
    }

    /// Remaining player health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.session().health
    }

    /// Most recently started wave.
    #[must_use]
    pub fn wave(&self) -> WaveId {
        query::wave(&self.world)
    }

    /// Reports whether the current wave still has enemies left to spawn.
    #[must_use]
    pub fn is_wave_active(&self) -> bool {
        self.waves.is_wave_active()
    }

    fn dispatch(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Feeds events recorded from `start` onward to the wave scheduler and
    /// applies whatever it requests.
    fn schedule_waves(&mut self, start: usize) {
        let path_available = query::path(&self.world).is_some();
        self.waves.handle(
            &self.events[start..],
            query::phase(&self.world),
            query::enemy_count(&self.world),
            path_available,
            &mut self.commands,
        );
        self.flush_commands();
    }

    fn run_phase_command(&mut self, command: Command) -> bool {
        self.events.clear();
        self.dispatch(command);
        self.events
            .iter()
            .any(|event| matches!(event, Event::PhaseChanged { .. }))
    }

    fn run_player_command<F>(&mut self, command: Command, accepted: F) -> bool
    where
        F: Fn(&Event) -> bool,
    {
        self.events.clear();
        self.dispatch(command);
        self.events.iter().any(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_starts_in_choose_with_default_resources() {
        let simulation = Simulation::new(SimulationConfig::default());
        let session = simulation.session();

        assert_eq!(session.phase, GamePhase::Choose);
        assert_eq!(session.gold, 500);
        assert_eq!(session.health, 10);
        assert_eq!(session.score, 0);
        assert_eq!(session.wave, WaveId::new(0));
        assert!(simulation.path().is_none());
    }

    #[test]
    fn ticks_before_begin_are_ignored() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        assert!(simulation.select_map(MapId::new(1)));
        simulation.tick(Duration::from_secs(5));

        assert!(simulation.last_events().is_empty());
        assert!(simulation.enemies().is_empty());
    }

    #[test]
    fn unknown_map_is_rejected() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        assert!(!simulation.select_map(MapId::new(9)));
        assert_eq!(simulation.phase(), GamePhase::Choose);
    }

    #[test]
    fn map_can_only_be_selected_once() {
        let mut simulation = Simulation::new(SimulationConfig::default());
        assert!(simulation.select_map(MapId::new(2)));
        assert!(!simulation.select_map(MapId::new(3)));
        assert_eq!(simulation.wave(), WaveId::new(1));
    }
}
