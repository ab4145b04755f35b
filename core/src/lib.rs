#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects drivers, the
//! authoritative world, and pure systems. Drivers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u8 = 5;

/// Slow effect applied by [`TowerKind::Slow`] when it fires.
pub const SLOW_TOWER_EFFECT: SlowEffect = SlowEffect::new(0.7, 600);

/// Describes the overall phase of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial phase in which the player picks a map.
    Choose,
    /// A map has been selected and the session awaits its first start.
    Welcome,
    /// The simulation advances on every tick.
    ActiveGame,
    /// The simulation is suspended until the player resumes it.
    Paused,
    /// Player health was exhausted; terminal.
    GameOver,
}

impl GamePhase {
    /// Reports whether the phase runs the simulation tick.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::ActiveGame)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a map layout, resetting path, enemies, projectiles and waves.
    ConfigureMap {
        /// Grid dimensions and path supplied by the map provider.
        layout: MapLayout,
    },
    /// Requests a transition into [`GamePhase::ActiveGame`].
    Begin,
    /// Requests a transition into [`GamePhase::Paused`].
    Pause,
    /// Advances the simulation clock and tower cooldowns by one step.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Discharges a ready tower at the provided enemies.
    FireTower {
        /// Tower that fires.
        tower: TowerId,
        /// Enemies receiving one projectile each. May be empty for area towers.
        targets: Vec<EnemyId>,
    },
    /// Moves every projectile one homing step and resolves impacts.
    AdvanceProjectiles,
    /// Moves every enemy along the path and ticks status effects.
    AdvanceEnemies,
    /// Removes dead and escaped enemies and settles the ledger.
    ResolveCasualties,
    /// Records that a new wave began.
    StartWave {
        /// Number of the wave that started.
        wave: WaveId,
    },
    /// Requests that a new enemy enter the path.
    SpawnEnemy {
        /// Variant of the enemy to create.
        kind: EnemyKind,
        /// Wave used to scale the enemy's base statistics.
        wave: WaveId,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that will host the tower.
        cell: CellCoord,
    },
    /// Requests the sale of the tower on the provided cell.
    SellTower {
        /// Cell hosting the tower.
        cell: CellCoord,
    },
    /// Requests an upgrade of the tower on the provided cell.
    UpgradeTower {
        /// Cell hosting the tower.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that was active before the transition.
        from: GamePhase,
        /// Phase that is active after the transition.
        to: GamePhase,
    },
    /// Reports that a requested phase transition was not permitted.
    PhaseChangeRejected {
        /// Phase that remains active.
        current: GamePhase,
        /// Specific reason the transition failed.
        reason: PhaseError,
    },
    /// Confirms that a map layout was installed.
    MapConfigured {
        /// Number of columns in the new grid.
        columns: u32,
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of cells composing the enemy path.
        path_length: usize,
    },
    /// Confirms that a new wave started.
    WaveStarted {
        /// Number of the wave that started.
        wave: WaveId,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Cell occupied after spawning.
        cell: CellCoord,
    },
    /// Reports that a slow effect took hold of an enemy.
    EnemySlowed {
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Fraction of base speed removed by the effect.
        magnitude: f64,
    },
    /// Reports that an enemy died and was removed.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached the end of the path and was removed.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell hosting the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Type of tower that was removed.
        kind: TowerKind,
        /// Cell that hosted the tower.
        cell: CellCoord,
        /// Gold returned to the player.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached after the upgrade.
        level: u8,
        /// Gold spent on the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes on.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target.
    ProjectileHit {
        /// Projectile that struck.
        projectile: ProjectileId,
        /// Enemy that received the damage.
        target: EnemyId,
        /// Damage applied to the enemy.
        damage: f64,
    },
    /// Reports that a projectile lost its target before impact.
    ProjectileDiscarded {
        /// Projectile that was dropped.
        projectile: ProjectileId,
        /// Enemy handle that no longer resolves.
        target: EnemyId,
    },
}

/// Identifier of a selectable map layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(u32);

impl MapId {
    /// Creates a new map identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy. Identifiers are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ordinal of an attack wave. Wave zero means no wave has started yet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the squared Euclidean distance between two cell coordinates.
    #[must_use]
    pub fn distance_squared(self, other: CellCoord) -> u64 {
        let dx = u64::from(self.column().abs_diff(other.column()));
        let dy = u64::from(self.row().abs_diff(other.row()));
        dx * dx + dy * dy
    }

    /// Reports whether `other` lies within a Euclidean radius of `range` cells.
    #[must_use]
    pub fn within_euclidean(self, other: CellCoord, range: u32) -> bool {
        let range = u64::from(range);
        self.distance_squared(other) <= range * range
    }

    /// Moves one cell toward `target` along each axis that differs.
    ///
    /// Diagonal steps are allowed, so the result is never further than one
    /// cell from `self` on either axis and never overshoots `target`.
    #[must_use]
    pub fn step_toward(self, target: CellCoord) -> CellCoord {
        CellCoord::new(
            step_axis(self.column, target.column),
            step_axis(self.row, target.row),
        )
    }
}

fn step_axis(from: u32, to: u32) -> u32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => from + 1,
        std::cmp::Ordering::Greater => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}

/// Ordered, non-empty sequence of cells that enemies traverse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from the provided cells.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyPath`] when `cells` is empty.
    pub fn new(cells: Vec<CellCoord>) -> Result<Self, ConstructionError> {
        if cells.is_empty() {
            return Err(ConstructionError::EmptyPath);
        }
        Ok(Self { cells })
    }

    /// Cells composing the path in traversal order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; paths cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell where enemies enter the path.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.cells[0]
    }

    /// Index of the final cell.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.cells.len() - 1
    }

    /// Cell at `index`, clamped to the final cell.
    #[must_use]
    pub fn cell(&self, index: usize) -> CellCoord {
        self.cells[index.min(self.last_index())]
    }

    /// Reports whether the path passes through `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }
}

/// Grid dimensions and enemy path supplied by the map layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    columns: u32,
    rows: u32,
    path: Path,
}

impl MapLayout {
    /// Creates a layout, validating that the path lies inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyGrid`] for zero-sized grids and
    /// [`ConstructionError::PathOutOfBounds`] when a path cell is outside.
    pub fn new(columns: u32, rows: u32, path: Path) -> Result<Self, ConstructionError> {
        if columns == 0 || rows == 0 {
            return Err(ConstructionError::EmptyGrid);
        }
        if let Some(cell) = path
            .cells()
            .iter()
            .find(|cell| cell.column() >= columns || cell.row() >= rows)
        {
            return Err(ConstructionError::PathOutOfBounds {
                column: cell.column(),
                row: cell.row(),
            });
        }
        Ok(Self {
            columns,
            rows,
            path,
        })
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Path enemies follow on this layout.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }
}

/// Variants of enemies. Behaviour is identical; only base statistics differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Balanced enemy.
    Basic,
    /// Durable but slow enemy.
    Circle,
    /// Fragile but fast enemy.
    Triangle,
}

impl EnemyKind {
    /// Every enemy variant in spawn-table order.
    pub const ALL: [EnemyKind; 3] = [Self::Triangle, Self::Circle, Self::Basic];

    /// Health of a freshly spawned enemy before wave scaling.
    #[must_use]
    pub const fn base_health(self) -> f64 {
        match self {
            Self::Basic => 50.0,
            Self::Circle => 100.0,
            Self::Triangle => 35.0,
        }
    }

    /// Cells advanced per tick before wave scaling.
    #[must_use]
    pub const fn base_speed(self) -> f64 {
        match self {
            Self::Basic => 0.065,
            Self::Circle => 0.04,
            Self::Triangle => 0.09,
        }
    }

    /// Statistics scaled for the provided wave.
    ///
    /// Health grows by 20% and speed by 5% of the base value per wave.
    #[must_use]
    pub fn stats_for_wave(self, wave: WaveId) -> EnemyStats {
        let wave = f64::from(wave.get());
        EnemyStats {
            health: self.base_health() * (1.0 + 0.2 * wave),
            speed: self.base_speed() * (1.0 + 0.05 * wave),
        }
    }
}

/// Health and speed assigned to an enemy at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Initial and maximum health.
    pub health: f64,
    /// Base speed in cells per tick.
    pub speed: f64,
}

/// How a tower chooses what to shoot at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetingRule {
    /// First enemy in pool order within a Euclidean radius.
    FirstInRange,
    /// Every enemy within a Manhattan radius.
    AllInRange,
}

/// Status effect that scales an enemy's speed for a number of ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// Fraction of base speed removed, within `[0, 1]`.
    pub magnitude: f64,
    /// Number of ticks the effect lasts.
    pub duration_ticks: u32,
}

impl SlowEffect {
    /// Creates a slow effect description.
    #[must_use]
    pub const fn new(magnitude: f64, duration_ticks: u32) -> Self {
        Self {
            magnitude,
            duration_ticks,
        }
    }
}

/// Statistic increase granted by a single upgrade level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeBonus {
    /// Damage added to each projectile.
    pub damage: f64,
    /// Cells added to the targeting radius.
    pub range: u32,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Short range, quick firing tower.
    Basic,
    /// Long range, heavy hitting tower with a long reload.
    Sniper,
    /// Tower that slows its target instead of damaging it.
    Slow,
    /// Tower that hits every enemy in a small diamond around it.
    Aoe,
}

impl TowerKind {
    /// Every tower variant.
    pub const ALL: [TowerKind; 4] = [Self::Basic, Self::Sniper, Self::Slow, Self::Aoe];

    /// Targeting radius in cells at level one.
    #[must_use]
    pub const fn range(self) -> u32 {
        match self {
            Self::Basic => 4,
            Self::Sniper => 20,
            Self::Slow => 5,
            Self::Aoe => 2,
        }
    }

    /// Damage carried by each projectile at level one.
    #[must_use]
    pub const fn damage(self) -> f64 {
        match self {
            Self::Basic => 3.0,
            Self::Sniper => 100.0,
            Self::Slow => 0.0,
            Self::Aoe => 4.0,
        }
    }

    /// Ticks the tower waits after firing.
    #[must_use]
    pub const fn cooldown_ticks(self) -> u32 {
        match self {
            Self::Basic => 3,
            Self::Sniper => 150,
            Self::Slow => 4,
            Self::Aoe => 2,
        }
    }

    /// Gold required to place the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 50,
            Self::Sniper => 75,
            Self::Slow => 60,
            Self::Aoe => 80,
        }
    }

    /// Rule the tower uses to acquire targets.
    #[must_use]
    pub const fn targeting(self) -> TargetingRule {
        match self {
            Self::Aoe => TargetingRule::AllInRange,
            Self::Basic | Self::Sniper | Self::Slow => TargetingRule::FirstInRange,
        }
    }

    /// Status effect applied to the target when the tower fires.
    #[must_use]
    pub const fn slow_effect(self) -> Option<SlowEffect> {
        match self {
            Self::Slow => Some(SLOW_TOWER_EFFECT),
            Self::Basic | Self::Sniper | Self::Aoe => None,
        }
    }

    /// Increase applied per upgrade level.
    #[must_use]
    pub const fn upgrade_bonus(self) -> UpgradeBonus {
        match self {
            Self::Basic => UpgradeBonus {
                damage: 2.0,
                range: 1,
            },
            Self::Sniper => UpgradeBonus {
                damage: 50.0,
                range: 2,
            },
            Self::Slow => UpgradeBonus {
                damage: 0.0,
                range: 1,
            },
            Self::Aoe => UpgradeBonus {
                damage: 2.0,
                range: 1,
            },
        }
    }
}

/// Terrain classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Buildable ground.
    Open,
    /// Part of the enemy path; never buildable.
    Path,
    /// Hosts a tower.
    Tower,
}

impl Terrain {
    /// Single-character symbol used in textual grid dumps.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Open => '-',
            Self::Path => 'w',
            Self::Tower => 't',
        }
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Path cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Index of `cell` within the path.
    pub path_index: usize,
    /// Remaining health, never negative.
    pub health: f64,
    /// Health assigned at spawn time.
    pub max_health: f64,
    /// Speed after status effects.
    pub speed: f64,
    /// Indicates whether the enemy reached the final path cell.
    pub reached_end: bool,
}

/// Read-only snapshot describing all live enemies in pool order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Identifiers grow monotonically, so sorting by identifier reproduces
    /// spawn order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in pool order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell hosting the tower.
    pub cell: CellCoord,
    /// Current targeting radius including upgrades.
    pub range: u32,
    /// Current projectile damage including upgrades.
    pub damage: f64,
    /// Ticks remaining until the tower may fire again.
    pub cooldown_remaining: u32,
    /// Ticks the tower waits after firing.
    pub cooldown_ticks: u32,
    /// Current upgrade level, starting at one.
    pub level: u8,
    /// Gold required for the next upgrade, `None` at the maximum level.
    pub upgrade_cost: Option<u32>,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// Read-only snapshot describing all towers in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Cell currently occupied by the projectile.
    pub cell: CellCoord,
    /// Enemy the projectile homes on.
    pub target: EnemyId,
    /// Damage applied on impact.
    pub damage: f64,
}

/// Read-only snapshot describing all in-flight projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Owned copy of the terrain grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridView {
    columns: u32,
    rows: u32,
    cells: Vec<Terrain>,
}

impl GridView {
    /// Captures a grid from row-major terrain cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32, cells: Vec<Terrain>) -> Self {
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Terrain of the provided cell, `None` outside the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column).copied()
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> impl Iterator<Item = Terrain> + '_ {
        self.cells.iter().copied()
    }

    /// Renders the grid as one line of terrain symbols per row.
    #[must_use]
    pub fn render(&self) -> String {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells
            .chunks(width)
            .map(|row| row.iter().map(|terrain| terrain.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Scalar session state exposed to drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Active phase.
    pub phase: GamePhase,
    /// Accumulated score.
    pub score: u32,
    /// Gold available for purchases.
    pub gold: u32,
    /// Remaining player health.
    pub health: u32,
    /// Number of the most recent wave.
    pub wave: WaveId,
}

/// Targets acquired by a tower for the current tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that acquired the targets.
    pub tower: TowerId,
    /// Enemies selected, in pool order.
    pub enemies: Vec<EnemyId>,
}

/// Tunable economy rules applied by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gold available when a session starts.
    pub starting_gold: u32,
    /// Player health when a session starts.
    pub starting_health: u32,
    /// Score granted per killed enemy.
    pub kill_score: u32,
    /// Gold granted per killed enemy.
    pub kill_gold: u32,
    /// Percentage of the purchase cost returned on sale.
    pub refund_percent: u32,
}

impl EconomyConfig {
    /// Gold refunded when selling a tower bought for `cost`.
    #[must_use]
    pub fn refund_for(&self, cost: u32) -> u32 {
        let refund = u64::from(cost) * u64::from(self.refund_percent) / 100;
        u32::try_from(refund).unwrap_or(u32::MAX)
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 500,
            starting_health: 10,
            kill_score: 10,
            kill_gold: 5,
            refund_percent: 100,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell is outside the grid")]
    OutOfBounds,
    /// The requested cell is part of the enemy path.
    #[error("cell is part of the enemy path")]
    PathTile,
    /// Another tower already occupies the cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum SaleError {
    /// No tower occupies the requested cell.
    #[error("no tower on the cell")]
    MissingTower,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum UpgradeError {
    /// No tower occupies the requested cell.
    #[error("no tower on the cell")]
    MissingTower,
    /// The tower already reached the maximum level.
    #[error("tower is already at the maximum level")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons a phase transition request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PhaseError {
    /// Maps can only be selected while choosing.
    #[error("a map can only be selected before the session starts")]
    MapSelectionClosed,
    /// The session can only begin from the welcome or paused phases.
    #[error("the session cannot begin from its current phase")]
    CannotBegin,
    /// Only a running session can be paused.
    #[error("only a running session can be paused")]
    CannotPause,
}

/// Invariant violations detected while constructing engine values.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    /// A path must contain at least one cell.
    #[error("path must contain at least one cell")]
    EmptyPath,
    /// A grid must have non-zero dimensions.
    #[error("grid dimensions must be non-zero")]
    EmptyGrid,
    /// A path cell lies outside the grid.
    #[error("path cell ({column}, {row}) lies outside the grid")]
    PathOutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// Enemy health must be positive.
    #[error("enemy health must be positive (got {health})")]
    NonPositiveHealth {
        /// Health that was provided.
        health: f64,
    },
    /// Enemy speed must not be negative.
    #[error("enemy speed cannot be negative (got {speed})")]
    NegativeSpeed {
        /// Speed that was provided.
        speed: f64,
    },
}
