#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use lane_defence_core::{
    CellCoord, EnemyId, EnemyView, GamePhase, TargetingRule, TowerSnapshot, TowerTarget, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Single-target towers appear only when an enemy is in
    /// range; area towers always appear, possibly with no enemies, so that a
    /// ready area tower still cycles its cooldown.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if !phase.is_running() || towers.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter() {
            match tower.kind.targeting() {
                TargetingRule::FirstInRange => {
                    if let Some(enemy) = self.first_in_range(tower) {
                        out.push(TowerTarget {
                            tower: tower.id,
                            enemies: vec![enemy],
                        });
                    }
                }
                TargetingRule::AllInRange => out.push(TowerTarget {
                    tower: tower.id,
                    enemies: self.all_in_range(tower),
                }),
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                cell: snapshot.cell,
            }));
    }

    fn first_in_range(&self, tower: &TowerSnapshot) -> Option<EnemyId> {
        self.enemy_workspace
            .iter()
            .find(|candidate| tower.cell.within_euclidean(candidate.cell, tower.range))
            .map(|candidate| candidate.id)
    }

    fn all_in_range(&self, tower: &TowerSnapshot) -> Vec<EnemyId> {
        self.enemy_workspace
            .iter()
            .filter(|candidate| tower.cell.manhattan_distance(candidate.cell) <= tower.range)
            .map(|candidate| candidate.id)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    cell: CellCoord,
}

#[cfg(test)]
mod tests {
    use super::TowerTargeting;
    use lane_defence_core::{
        CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, GamePhase, TowerId, TowerKind,
        TowerSnapshot, TowerTarget, TowerView,
    };

    fn tower_snapshot(id: u32, kind: TowerKind, cell: (u32, u32)) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(cell.0, cell.1),
            range: kind.range(),
            damage: kind.damage(),
            cooldown_remaining: 0,
            cooldown_ticks: kind.cooldown_ticks(),
            level: 1,
            upgrade_cost: Some(kind.cost()),
        }
    }

    fn enemy_snapshot(id: u32, cell: (u32, u32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            cell: CellCoord::new(cell.0, cell.1),
            path_index: 0,
            health: 50.0,
            max_health: 50.0,
            speed: 0.065,
            reached_end: false,
        }
    }

    #[test]
    fn single_target_tower_picks_first_enemy_in_pool_order() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, (5, 5))]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(3, (5, 6)),
            enemy_snapshot(2, (8, 5)),
            enemy_snapshot(7, (5, 5)),
        ]);

        let mut out = Vec::new();
        system.handle(GamePhase::ActiveGame, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemies: vec![EnemyId::new(2)],
            }]
        );
    }

    #[test]
    fn euclidean_range_is_inclusive() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Basic, (0, 0))]);
        let mut out = Vec::new();

        let edge = EnemyView::from_snapshots(vec![enemy_snapshot(1, (0, 4))]);
        system.handle(GamePhase::ActiveGame, &towers, &edge, &mut out);
        assert_eq!(out.len(), 1);

        let beyond = EnemyView::from_snapshots(vec![enemy_snapshot(2, (3, 3))]);
        system.handle(GamePhase::ActiveGame, &towers, &beyond, &mut out);
        assert!(out.is_empty(), "distance sqrt(18) exceeds range 4");
    }

    #[test]
    fn area_tower_selects_every_enemy_within_manhattan_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(4, TowerKind::Aoe, (5, 5))]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(0, (6, 5)),
            enemy_snapshot(1, (4, 4)),
            enemy_snapshot(2, (10, 10)),
        ]);

        let mut out = Vec::new();
        system.handle(GamePhase::ActiveGame, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(4),
                enemies: vec![EnemyId::new(0), EnemyId::new(1)],
            }]
        );
    }

    #[test]
    fn area_tower_reports_empty_assignment_without_enemies() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower_snapshot(1, TowerKind::Sniper, (0, 0)),
            tower_snapshot(2, TowerKind::Aoe, (9, 9)),
        ]);
        let enemies = EnemyView::from_snapshots(Vec::new());

        let mut out = Vec::new();
        system.handle(GamePhase::ActiveGame, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(2),
                enemies: Vec::new(),
            }]
        );
    }

    #[test]
    fn inactive_phases_clear_previous_targets() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, TowerKind::Slow, (2, 2))]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(1, (2, 3))]);
        let mut out = Vec::new();

        system.handle(GamePhase::ActiveGame, &towers, &enemies, &mut out);
        assert_eq!(out.len(), 1);

        for phase in [GamePhase::Paused, GamePhase::Welcome, GamePhase::GameOver] {
            system.handle(phase, &towers, &enemies, &mut out);
            assert!(out.is_empty(), "{phase:?} must not produce targets");
        }
    }

    #[test]
    fn upgraded_range_extends_reach() {
        let mut system = TowerTargeting::new();
        let mut snapshot = tower_snapshot(1, TowerKind::Basic, (0, 0));
        snapshot.range += 1;
        let towers = TowerView::from_snapshots(vec![snapshot]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(1, (3, 4))]);

        let mut out = Vec::new();
        system.handle(GamePhase::ActiveGame, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }
}
