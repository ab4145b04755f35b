//! Live enemy storage and per-tick movement.

use lane_defence_core::{
    CellCoord, ConstructionError, EnemyId, EnemyKind, EnemySnapshot, EnemyStats, Path, SlowEffect,
};

/// Single enemy walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    cell: CellCoord,
    path_index: usize,
    progress: f64,
    health: f64,
    max_health: f64,
    base_speed: f64,
    speed: f64,
    slow_remaining: u32,
    slow_magnitude: f64,
    reached_end: bool,
}

impl Enemy {
    /// Creates an enemy standing on the first cell of `path`.
    pub(crate) fn new(
        id: EnemyId,
        kind: EnemyKind,
        stats: EnemyStats,
        path: &Path,
    ) -> Result<Self, ConstructionError> {
        if stats.health.is_nan() || stats.health <= 0.0 {
            return Err(ConstructionError::NonPositiveHealth {
                health: stats.health,
            });
        }
        if stats.speed.is_nan() || stats.speed < 0.0 {
            return Err(ConstructionError::NegativeSpeed { speed: stats.speed });
        }
        Ok(Self {
            id,
            kind,
            cell: path.start(),
            path_index: 0,
            progress: 0.0,
            health: stats.health,
            max_health: stats.health,
            base_speed: stats.speed,
            speed: stats.speed,
            slow_remaining: 0,
            slow_magnitude: 0.0,
            reached_end: false,
        })
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining health, clamped at zero.
    pub(crate) fn health(&self) -> f64 {
        self.health.max(0.0)
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn reached_end(&self) -> bool {
        self.reached_end
    }

    pub(crate) fn take_damage(&mut self, damage: f64) {
        self.health -= damage;
    }

    /// Applies `effect` unless a stronger slow is still active.
    ///
    /// Returns `true` when the effect took hold.
    pub(crate) fn apply_slow(&mut self, effect: SlowEffect) -> bool {
        if effect.magnitude > self.slow_magnitude || self.slow_remaining == 0 {
            self.slow_magnitude = effect.magnitude;
            self.slow_remaining = effect.duration_ticks;
            self.speed = self.base_speed * (1.0 - effect.magnitude);
            return true;
        }
        false
    }

    /// Moves the enemy along `path` by its current speed and ticks its slow.
    pub(crate) fn advance(&mut self, path: &Path) {
        let last_index = path.last_index();
        if self.path_index < last_index {
            self.progress += self.speed;
            while self.progress >= 1.0 && self.path_index < last_index {
                self.progress -= 1.0;
                self.path_index += 1;
            }
            self.cell = path.cell(self.path_index);
        }
        self.reached_end = self.path_index >= last_index;
        self.tick_slow();
    }

    fn tick_slow(&mut self) {
        if self.slow_remaining == 0 {
            return;
        }
        self.slow_remaining -= 1;
        if self.slow_remaining == 0 {
            self.speed = self.base_speed;
            self.slow_magnitude = 0.0;
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            path_index: self.path_index,
            health: self.health(),
            max_health: self.max_health,
            speed: self.speed,
            reached_end: self.reached_end,
        }
    }
}

/// Why an enemy left the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CasualtyCause {
    Killed,
    Escaped,
}

/// Enemy removed by the casualty scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Casualty {
    pub(crate) enemy: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) cause: CasualtyCause,
}

/// Owns live enemies in spawn order.
#[derive(Debug)]
pub(crate) struct EnemyPool {
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyPool {
    pub(crate) fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Creates an enemy at the start of `path`, allocating a fresh identifier.
    pub(crate) fn spawn(
        &mut self,
        kind: EnemyKind,
        stats: EnemyStats,
        path: &Path,
    ) -> Result<&Enemy, ConstructionError> {
        let enemy = Enemy::new(self.next_enemy_id, kind, stats, path)?;
        self.next_enemy_id = EnemyId::new(self.next_enemy_id.get().saturating_add(1));
        self.enemies.push(enemy);
        let index = self.enemies.len() - 1;
        Ok(&self.enemies[index])
    }

    /// Drops every enemy. Identifiers keep growing so stale handles never resolve.
    pub(crate) fn clear(&mut self) {
        self.enemies.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.enemies.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .binary_search_by_key(&id, Enemy::id)
            .ok()
            .map(|index| &mut self.enemies[index])
    }

    pub(crate) fn advance(&mut self, path: &Path) {
        for enemy in &mut self.enemies {
            enemy.advance(path);
        }
    }

    /// Removes dead and escaped enemies, reporting them in pool order.
    ///
    /// Death takes precedence over escape for an enemy flagged as both.
    pub(crate) fn take_casualties(&mut self) -> Vec<Casualty> {
        let mut casualties = Vec::new();
        self.enemies.retain(|enemy| {
            let cause = if enemy.is_dead() {
                CasualtyCause::Killed
            } else if enemy.reached_end() {
                CasualtyCause::Escaped
            } else {
                return true;
            };
            casualties.push(Casualty {
                enemy: enemy.id(),
                kind: enemy.kind(),
                cause,
            });
            false
        });
        casualties
    }
}
