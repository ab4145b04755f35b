//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use lane_defence_core::{CellCoord, TowerId, TowerKind, TowerSnapshot, MAX_TOWER_LEVEL};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    level: u8,
    range: u32,
    damage: f64,
    cooldown_remaining: u32,
    upgrade_cost: u32,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            level: 1,
            range: kind.range(),
            damage: kind.damage(),
            cooldown_remaining: 0,
            upgrade_cost: kind.cost(),
        }
    }

    pub(crate) fn level(&self) -> u8 {
        self.level
    }

    pub(crate) fn damage(&self) -> f64 {
        self.damage
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Gold needed for the next level, `None` once the tower is maxed out.
    pub(crate) fn upgrade_cost(&self) -> Option<u32> {
        (self.level < MAX_TOWER_LEVEL).then_some(self.upgrade_cost)
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    pub(crate) fn reset_cooldown(&mut self) {
        self.cooldown_remaining = self.kind.cooldown_ticks();
    }

    /// Raises the level by one, applying the kind's bonus and doubling the next cost.
    pub(crate) fn upgrade(&mut self) {
        let bonus = self.kind.upgrade_bonus();
        self.level += 1;
        self.damage += bonus.damage;
        self.range += bonus.range;
        self.upgrade_cost = self.upgrade_cost.saturating_mul(2);
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            range: self.range,
            damage: self.damage,
            cooldown_remaining: self.cooldown_remaining,
            cooldown_ticks: self.kind.cooldown_ticks(),
            level: self.level,
            upgrade_cost: self.upgrade_cost(),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly placed tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, cell));
        id
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the tower standing on `cell`, if any.
    pub(crate) fn find_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Removes every tower matching `reject`, returning them in identifier order.
    pub(crate) fn remove_where<F>(&mut self, mut reject: F) -> Vec<TowerState>
    where
        F: FnMut(&TowerState) -> bool,
    {
        let doomed: Vec<TowerId> = self
            .entries
            .values()
            .filter(|tower| reject(*tower))
            .map(|tower| tower.id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }

    pub(crate) fn tick_cooldowns(&mut self) {
        for tower in self.entries.values_mut() {
            tower.tick_cooldown();
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
