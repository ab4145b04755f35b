//! Gold, score and player health bookkeeping.

use lane_defence_core::EconomyConfig;

#[derive(Clone, Debug)]
pub(crate) struct Ledger {
    config: EconomyConfig,
    gold: u32,
    score: u32,
    health: u32,
}

impl Ledger {
    pub(crate) fn new(config: EconomyConfig) -> Self {
        Self {
            config,
            gold: config.starting_gold,
            score: 0,
            health: config.starting_health,
        }
    }

    pub(crate) fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub(crate) fn gold(&self) -> u32 {
        self.gold
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    /// Debits `cost` when affordable. Gold never goes negative.
    pub(crate) fn spend(&mut self, cost: u32) -> bool {
        match self.gold.checked_sub(cost) {
            Some(remaining) => {
                self.gold = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn refund(&mut self, purchase_cost: u32) -> u32 {
        let refund = self.config.refund_for(purchase_cost);
        self.gold = self.gold.saturating_add(refund);
        refund
    }

    pub(crate) fn record_kill(&mut self) {
        self.score = self.score.saturating_add(self.config.kill_score);
        self.gold = self.gold.saturating_add(self.config.kill_gold);
    }

    /// Removes one point of health, returning `true` once health is exhausted.
    pub(crate) fn record_escape(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_never_overdraws() {
        let mut ledger = Ledger::new(EconomyConfig::default());
        assert!(ledger.spend(450));
        assert!(!ledger.spend(51));
        assert_eq!(ledger.gold(), 50);
        assert!(ledger.spend(50));
        assert_eq!(ledger.gold(), 0);
    }

    #[test]
    fn kills_credit_score_and_gold() {
        let mut ledger = Ledger::new(EconomyConfig::default());
        ledger.record_kill();
        ledger.record_kill();
        assert_eq!(ledger.score(), 20);
        assert_eq!(ledger.gold(), 510);
    }

    #[test]
    fn health_saturates_at_zero() {
        let mut ledger = Ledger::new(EconomyConfig {
            starting_health: 2,
            ..EconomyConfig::default()
        });
        assert!(!ledger.record_escape());
        assert!(ledger.record_escape());
        assert!(ledger.record_escape());
        assert_eq!(ledger.health(), 0);
    }

    #[test]
    fn refund_follows_configured_percentage() {
        let mut ledger = Ledger::new(EconomyConfig {
            refund_percent: 50,
            ..EconomyConfig::default()
        });
        assert_eq!(ledger.refund(80), 40);
        assert_eq!(ledger.gold(), 540);
    }
}
