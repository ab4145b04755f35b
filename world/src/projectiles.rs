//! In-flight projectiles homing on enemy handles.

use lane_defence_core::{CellCoord, EnemyId, Event, ProjectileId, ProjectileSnapshot};

use crate::enemies::EnemyPool;

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    cell: CellCoord,
    target: EnemyId,
    damage: f64,
}

/// Owns every projectile currently travelling toward a target.
#[derive(Debug)]
pub(crate) struct ProjectilePool {
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectilePool {
    pub(crate) fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    /// Launches a projectile from `origin` toward `target`.
    pub(crate) fn launch(&mut self, origin: CellCoord, target: EnemyId, damage: f64) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        self.projectiles.push(Projectile {
            id,
            cell: origin,
            target,
            damage,
        });
        id
    }

    pub(crate) fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Moves each projectile one step toward its target's current cell.
    ///
    /// A projectile sharing its target's cell after the step hits and is
    /// removed; one whose target no longer resolves is discarded.
    pub(crate) fn advance(&mut self, enemies: &mut EnemyPool, out_events: &mut Vec<Event>) {
        self.projectiles.retain_mut(|projectile| {
            let Some(enemy) = enemies.get_mut(projectile.target) else {
                out_events.push(Event::ProjectileDiscarded {
                    projectile: projectile.id,
                    target: projectile.target,
                });
                return false;
            };

            projectile.cell = projectile.cell.step_toward(enemy.cell());
            if projectile.cell != enemy.cell() {
                return true;
            }

            enemy.take_damage(projectile.damage);
            out_events.push(Event::ProjectileHit {
                projectile: projectile.id,
                target: projectile.target,
                damage: projectile.damage,
            });
            false
        });
    }

    pub(crate) fn snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                cell: projectile.cell,
                target: projectile.target,
                damage: projectile.damage,
            })
            .collect()
    }
}
