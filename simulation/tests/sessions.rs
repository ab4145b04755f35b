use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, EconomyConfig, EnemyKind, Event, GamePhase, MapId, MapLayout, Path,
    PlacementError, SaleError, TowerKind, UpgradeError, WaveId, MAX_TOWER_LEVEL,
};
use lane_defence_simulation::{MapProvider, Simulation, SimulationConfig};

const STEP: Duration = Duration::from_millis(100);

/// Serves one hand-drawn layout for every map identifier.
#[derive(Debug)]
struct FixedMap {
    columns: u32,
    rows: u32,
    cells: Vec<CellCoord>,
}

impl FixedMap {
    fn single_cell() -> Self {
        Self {
            columns: 4,
            rows: 4,
            cells: vec![CellCoord::new(0, 0)],
        }
    }

    fn row(row: u32, length: u32) -> Self {
        Self {
            columns: length,
            rows: row + 3,
            cells: (0..length).map(|column| CellCoord::new(column, row)).collect(),
        }
    }
}

impl MapProvider for FixedMap {
    fn layout(&self, _map: MapId) -> Option<MapLayout> {
        let path = Path::new(self.cells.clone()).ok()?;
        MapLayout::new(self.columns, self.rows, path).ok()
    }
}

fn started(maps: FixedMap) -> Simulation<FixedMap> {
    let mut simulation = Simulation::with_maps(SimulationConfig::default(), maps);
    assert!(simulation.select_map(MapId::new(1)));
    assert!(simulation.begin());
    simulation
}

fn spawn(simulation: &mut Simulation<FixedMap>, kind: EnemyKind) {
    simulation.submit(Command::SpawnEnemy {
        kind,
        wave: WaveId::new(1),
    });
}

#[test]
fn occupied_cell_rejects_second_tower_and_keeps_gold() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    assert_eq!(simulation.gold(), 500);

    assert!(simulation.place_tower(CellCoord::new(5, 5), TowerKind::Basic));
    assert_eq!(simulation.gold(), 450);

    assert!(!simulation.place_tower(CellCoord::new(5, 5), TowerKind::Sniper));
    assert_eq!(simulation.gold(), 450);
    assert!(simulation.last_events().iter().any(|event| matches!(
        event,
        Event::TowerPlacementRejected {
            reason: PlacementError::Occupied,
            ..
        }
    )));
}

#[test]
fn ten_escapes_end_the_session() {
    let mut simulation = started(FixedMap::single_cell());
    assert_eq!(simulation.health(), 10);

    for escaped in 1..=10u32 {
        spawn(&mut simulation, EnemyKind::Basic);
        simulation.tick(STEP);
        assert_eq!(simulation.health(), 10 - escaped);
    }

    assert_eq!(simulation.phase(), GamePhase::GameOver);
    assert!(simulation.enemies().is_empty());

    spawn(&mut simulation, EnemyKind::Basic);
    simulation.tick(STEP);
    assert!(simulation.last_events().is_empty(), "game over halts ticking");
    assert!(simulation.enemies().is_empty());
    assert_eq!(simulation.health(), 0);
}

#[test]
fn slow_tower_slows_its_target_immediately() {
    let mut simulation = started(FixedMap::row(0, 10));
    assert!(simulation.place_tower(CellCoord::new(0, 1), TowerKind::Slow));
    spawn(&mut simulation, EnemyKind::Basic);

    simulation.tick(STEP);

    assert!(simulation
        .last_events()
        .iter()
        .any(|event| matches!(event, Event::EnemySlowed { magnitude, .. } if (*magnitude - 0.7).abs() < 1e-9)));
    let enemy = simulation
        .enemies()
        .into_vec()
        .pop()
        .expect("enemy still on the path");
    let base = EnemyKind::Basic.stats_for_wave(WaveId::new(1)).speed;
    assert!((enemy.speed - base * 0.3).abs() < 1e-9);
    assert!(
        (enemy.health - enemy.max_health).abs() < 1e-9,
        "slow projectiles carry no damage"
    );
}

#[test]
fn area_tower_hits_every_enemy_in_reach_on_the_same_tick() {
    let mut simulation = started(FixedMap::row(1, 10));
    assert!(simulation.place_tower(CellCoord::new(0, 2), TowerKind::Aoe));
    spawn(&mut simulation, EnemyKind::Basic);
    spawn(&mut simulation, EnemyKind::Basic);

    simulation.tick(STEP);

    let events = simulation.last_events();
    let fired = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count();
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileHit { .. }))
        .count();
    assert_eq!(fired, 2);
    assert_eq!(hits, 2);

    for enemy in simulation.enemies().iter() {
        assert!((enemy.max_health - enemy.health - TowerKind::Aoe.damage()).abs() < 1e-9);
    }
    assert!(simulation.projectiles().is_empty());
}

#[test]
fn area_tower_recharges_after_firing_at_nobody() {
    let mut simulation = started(FixedMap::row(1, 10));
    assert!(simulation.place_tower(CellCoord::new(9, 0), TowerKind::Aoe));

    simulation.tick(STEP);

    let tower = simulation
        .towers()
        .into_vec()
        .pop()
        .expect("tower placed");
    assert_eq!(tower.cooldown_remaining, tower.cooldown_ticks);
    assert!(!simulation
        .last_events()
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
}

#[test]
fn long_session_preserves_resource_and_cooldown_bounds() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    assert!(simulation.select_map(MapId::new(1)));
    let path = simulation.path().expect("map selected").clone();
    let mut placed = 0;
    for (column, row) in [(1, 1), (8, 3), (12, 6), (4, 10), (15, 14), (9, 17)] {
        let cell = CellCoord::new(column, row);
        if !path.contains(cell) && simulation.place_tower(cell, TowerKind::ALL[placed % 4]) {
            placed += 1;
        }
    }
    assert!(placed > 0);
    assert!(simulation.begin());

    let mut kills = 0u32;
    for _ in 0..4_000 {
        if simulation.phase() == GamePhase::Paused {
            assert!(simulation.begin());
        }
        simulation.tick(STEP);
        kills += simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count() as u32;

        assert!(simulation.health() <= 10);
        for enemy in simulation.enemies().iter() {
            assert!(enemy.health >= 0.0);
            assert!(enemy.health <= enemy.max_health);
            assert!(path.contains(enemy.cell));
        }
        for tower in simulation.towers().iter() {
            assert!(tower.cooldown_remaining <= tower.cooldown_ticks);
        }
        if simulation.phase() == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(simulation.score(), kills * 10);
    assert!(simulation.wave() >= WaveId::new(1));
}

#[test]
fn finished_wave_starts_the_next_one_paused() {
    let config = SimulationConfig {
        waves: lane_defence_simulation::WaveConfig {
            initial_quota: 0,
            quota_increment: 1,
            spawn_interval_ms: 100,
            ..Default::default()
        },
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::with_maps(config, FixedMap::single_cell());
    assert!(simulation.select_map(MapId::new(1)));
    assert!(simulation.begin());

    simulation.tick(STEP);
    assert_eq!(simulation.enemies().len(), 1);
    assert!(!simulation.is_wave_active());

    simulation.tick(STEP);
    assert_eq!(simulation.health(), 9);
    assert_eq!(simulation.wave(), WaveId::new(2));
    assert_eq!(simulation.phase(), GamePhase::Paused);
    assert!(simulation.is_wave_active());
}

#[test]
fn upgrades_stop_at_max_level_and_sales_refund_purchase_cost() {
    let config = SimulationConfig {
        economy: EconomyConfig {
            starting_gold: 2_000,
            ..EconomyConfig::default()
        },
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(config);
    let cell = CellCoord::new(1, 1);
    assert!(simulation.place_tower(cell, TowerKind::Basic));

    for _ in 0..4 {
        assert!(simulation.upgrade_tower(cell));
    }
    let gold = simulation.gold();
    assert_eq!(gold, 2_000 - 50 - (50 + 100 + 200 + 400));

    assert!(!simulation.upgrade_tower(cell));
    assert_eq!(simulation.gold(), gold);
    assert_eq!(
        simulation.last_events(),
        &[Event::TowerUpgradeRejected {
            cell,
            reason: UpgradeError::MaxLevel,
        }]
    );
    let tower = simulation.towers().into_vec()[0];
    assert_eq!(tower.level, MAX_TOWER_LEVEL);
    assert_eq!(tower.upgrade_cost, None);

    assert!(simulation.sell_tower(cell));
    assert_eq!(simulation.gold(), gold + TowerKind::Basic.cost());
    assert!(simulation.towers().is_empty());

    assert!(!simulation.sell_tower(cell));
    assert_eq!(simulation.gold(), gold + TowerKind::Basic.cost());
    assert_eq!(
        simulation.last_events(),
        &[Event::TowerSaleRejected {
            cell,
            reason: SaleError::MissingTower,
        }]
    );
}
