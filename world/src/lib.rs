#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.

mod economy;
mod enemies;
mod grid;
mod maps;
mod projectiles;
mod towers;

use lane_defence_core::{
    CellCoord, Command, EconomyConfig, EnemyId, Event, GamePhase, MapLayout, Path, PhaseError,
    PlacementError, SaleError, Terrain, TowerId, TowerKind, UpgradeError, WaveId,
};
use tracing::{debug, error, info, trace};

use economy::Ledger;
use enemies::{CasualtyCause, EnemyPool};
use grid::TerrainGrid;
use projectiles::ProjectilePool;
use towers::TowerRegistry;

pub use maps::{MapProvider, StandardMaps};

const DEFAULT_GRID_COLUMNS: u32 = 20;
const DEFAULT_GRID_ROWS: u32 = 20;

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    phase: GamePhase,
    grid: TerrainGrid,
    path: Option<Path>,
    enemies: EnemyPool,
    towers: TowerRegistry,
    projectiles: ProjectilePool,
    ledger: Ledger,
    wave: WaveId,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the default economy rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_economy(EconomyConfig::default())
    }

    /// Creates a new world that settles gold, score and health with `economy`.
    ///
    /// The world starts in [`GamePhase::Choose`] on an open 20x20 grid with no
    /// path, so towers can be placed before a map is picked.
    #[must_use]
    pub fn with_economy(economy: EconomyConfig) -> Self {
        Self {
            phase: GamePhase::Choose,
            grid: TerrainGrid::open(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
            path: None,
            enemies: EnemyPool::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectilePool::new(),
            ledger: Ledger::new(economy),
            wave: WaveId::default(),
            tick_index: 0,
        }
    }

    fn transition(&mut self, to: GamePhase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = to;
        debug!(?from, ?to, "phase changed");
        out_events.push(Event::PhaseChanged { from, to });
    }

    fn reject_phase(&self, reason: PhaseError, out_events: &mut Vec<Event>) {
        debug!(current = ?self.phase, %reason, "phase change rejected");
        out_events.push(Event::PhaseChangeRejected {
            current: self.phase,
            reason,
        });
    }

    fn configure_map(&mut self, layout: MapLayout, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Choose {
            self.reject_phase(PhaseError::MapSelectionClosed, out_events);
            return;
        }

        let mut grid = TerrainGrid::from_layout(&layout);
        let displaced = self
            .towers
            .remove_where(|tower| grid.terrain(tower.cell) != Some(Terrain::Open));
        for tower in displaced {
            let refund = self.ledger.refund(tower.kind.cost());
            debug!(tower = tower.id.get(), refund, "tower displaced by new map");
            out_events.push(Event::TowerSold {
                tower: tower.id,
                kind: tower.kind,
                cell: tower.cell,
                refund,
            });
        }
        for tower in self.towers.iter() {
            grid.set(tower.cell, Terrain::Tower);
        }

        self.grid = grid;
        self.enemies.clear();
        self.projectiles.clear();
        self.wave = WaveId::default();
        out_events.push(Event::MapConfigured {
            columns: layout.columns(),
            rows: layout.rows(),
            path_length: layout.path().len(),
        });
        self.path = Some(layout.path().clone());
        self.transition(GamePhase::Welcome, out_events);
    }

    fn fire_tower(&mut self, tower_id: TowerId, targets: Vec<EnemyId>, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get_mut(tower_id) else {
            return;
        };
        if !tower.is_ready() {
            trace!(tower = tower_id.get(), "tower still cooling down");
            return;
        }

        let origin = tower.cell;
        let damage = tower.damage();
        let slow = tower.kind.slow_effect();
        tower.reset_cooldown();

        for target in targets {
            let Some(enemy) = self.enemies.get_mut(target) else {
                continue;
            };
            if let Some(effect) = slow {
                if enemy.apply_slow(effect) {
                    out_events.push(Event::EnemySlowed {
                        enemy: target,
                        magnitude: effect.magnitude,
                    });
                }
            }
            let projectile = self.projectiles.launch(origin, target, damage);
            out_events.push(Event::ProjectileFired {
                projectile,
                tower: tower_id,
                target,
            });
        }
    }

    fn resolve_casualties(&mut self, out_events: &mut Vec<Event>) {
        for casualty in self.enemies.take_casualties() {
            match casualty.cause {
                CasualtyCause::Killed => {
                    self.ledger.record_kill();
                    out_events.push(Event::EnemyKilled {
                        enemy: casualty.enemy,
                        kind: casualty.kind,
                    });
                }
                CasualtyCause::Escaped => {
                    let exhausted = self.ledger.record_escape();
                    out_events.push(Event::EnemyEscaped {
                        enemy: casualty.enemy,
                        kind: casualty.kind,
                    });
                    if exhausted && self.phase != GamePhase::GameOver {
                        info!(
                            score = self.ledger.score(),
                            wave = self.wave.get(),
                            "player health exhausted"
                        );
                        self.transition(GamePhase::GameOver, out_events);
                    }
                }
            }
        }
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let mut rejection = match self.grid.terrain(cell) {
            None => Some(PlacementError::OutOfBounds),
            Some(Terrain::Path) => Some(PlacementError::PathTile),
            Some(Terrain::Tower) => Some(PlacementError::Occupied),
            Some(Terrain::Open) => None,
        };
        if rejection.is_none() && !self.ledger.spend(kind.cost()) {
            rejection = Some(PlacementError::InsufficientGold);
        }
        if let Some(reason) = rejection {
            debug!(?kind, ?cell, %reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        let tower = self.towers.insert(kind, cell);
        self.grid.set(cell, Terrain::Tower);
        out_events.push(Event::TowerPlaced { tower, kind, cell });
    }

    fn sell_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(state) = self
            .towers
            .find_at(cell)
            .and_then(|tower| self.towers.remove(tower))
        else {
            debug!(?cell, "tower sale rejected");
            out_events.push(Event::TowerSaleRejected {
                cell,
                reason: SaleError::MissingTower,
            });
            return;
        };

        self.grid.set(cell, Terrain::Open);
        let refund = self.ledger.refund(state.kind.cost());
        out_events.push(Event::TowerSold {
            tower: state.id,
            kind: state.kind,
            cell,
            refund,
        });
    }

    fn upgrade_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let outcome = match self
            .towers
            .find_at(cell)
            .and_then(|tower| self.towers.get_mut(tower))
        {
            None => Err(UpgradeError::MissingTower),
            Some(tower) => match tower.upgrade_cost() {
                None => Err(UpgradeError::MaxLevel),
                Some(cost) => {
                    if self.ledger.spend(cost) {
                        tower.upgrade();
                        Ok((tower.id, tower.level(), cost))
                    } else {
                        Err(UpgradeError::InsufficientGold)
                    }
                }
            },
        };

        match outcome {
            Ok((tower, level, cost)) => {
                out_events.push(Event::TowerUpgraded { tower, level, cost });
            }
            Err(reason) => {
                debug!(?cell, %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { cell, reason });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Simulation commands (ticks, firing, movement, casualties) only take effect
/// while the session is in [`GamePhase::ActiveGame`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let running = world.phase.is_running();
    match command {
        Command::ConfigureMap { layout } => world.configure_map(layout, out_events),
        Command::Begin => match world.phase {
            GamePhase::Welcome | GamePhase::Paused => {
                world.transition(GamePhase::ActiveGame, out_events);
            }
            _ => world.reject_phase(PhaseError::CannotBegin, out_events),
        },
        Command::Pause => match world.phase {
            GamePhase::ActiveGame => world.transition(GamePhase::Paused, out_events),
            _ => world.reject_phase(PhaseError::CannotPause, out_events),
        },
        Command::Tick { dt } => {
            if !running {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            world.towers.tick_cooldowns();
            trace!(tick = world.tick_index, "tick");
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::FireTower { tower, targets } => {
            if running {
                world.fire_tower(tower, targets, out_events);
            }
        }
        Command::AdvanceProjectiles => {
            if running {
                world.projectiles.advance(&mut world.enemies, out_events);
            }
        }
        Command::AdvanceEnemies => {
            if let (true, Some(path)) = (running, world.path.as_ref()) {
                world.enemies.advance(path);
            }
        }
        Command::ResolveCasualties => {
            if running {
                world.resolve_casualties(out_events);
            }
        }
        Command::StartWave { wave } => {
            world.wave = wave;
            info!(wave = wave.get(), "wave started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy { kind, wave } => {
            if world.phase == GamePhase::GameOver {
                return;
            }
            let Some(path) = world.path.as_ref() else {
                trace!(?kind, "spawn skipped without a path");
                return;
            };
            match world.enemies.spawn(kind, kind.stats_for_wave(wave), path) {
                Ok(enemy) => out_events.push(Event::EnemySpawned {
                    enemy: enemy.id(),
                    kind,
                    cell: enemy.cell(),
                }),
                Err(error) => error!(?kind, wave = wave.get(), %error, "enemy construction failed"),
            }
        }
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::SellTower { cell } => world.sell_tower(cell, out_events),
        Command::UpgradeTower { cell } => world.upgrade_tower(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        EconomyConfig, EnemyView, GamePhase, GridView, Path, ProjectileView, SessionSnapshot,
        TowerView, WaveId,
    };

    use super::World;

    /// Reports the active session phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Reports the most recently started wave.
    #[must_use]
    pub fn wave(world: &World) -> WaveId {
        world.wave
    }

    /// Captures the scalar session state.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            phase: world.phase,
            score: world.ledger.score(),
            gold: world.ledger.gold(),
            health: world.ledger.health(),
            wave: world.wave,
        }
    }

    /// Economy rules the world settles transactions with.
    #[must_use]
    pub fn economy(world: &World) -> EconomyConfig {
        *world.ledger.config()
    }

    /// Path of the selected map, `None` before a map is chosen.
    #[must_use]
    pub fn path(world: &World) -> Option<&Path> {
        world.path.as_ref()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the live enemies in pool order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the in-flight projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.snapshots())
    }

    /// Captures the terrain grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView {
        world.grid.view()
    }
}
