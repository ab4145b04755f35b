#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits tower firing commands from targeting data.

use lane_defence_core::{
    Command, GamePhase, TargetingRule, TowerId, TowerSnapshot, TowerTarget, TowerView,
};
use tracing::trace;

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTower` entries for towers ready to fire.
    ///
    /// Single-target towers fire only with an acquired enemy. Area towers fire
    /// whenever they are ready, even at nobody, which restarts their cooldown.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if !phase.is_running() {
            return;
        }

        if tower_targets.is_empty() {
            return;
        }

        let towers = towers.into_vec();
        if towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            let Some(snapshot) = find_tower(&towers, target.tower) else {
                continue;
            };
            if !snapshot.is_ready() {
                continue;
            }
            let area = snapshot.kind.targeting() == TargetingRule::AllInRange;
            if target.enemies.is_empty() && !area {
                continue;
            }
            trace!(
                tower = target.tower.get(),
                targets = target.enemies.len(),
                "tower firing"
            );
            self.scratch.push(Command::FireTower {
                tower: target.tower,
                targets: target.enemies.clone(),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_tower(towers: &[TowerSnapshot], tower: TowerId) -> Option<&TowerSnapshot> {
    towers
        .binary_search_by_key(&tower, |snapshot| snapshot.id)
        .ok()
        .map(|index| &towers[index])
}
