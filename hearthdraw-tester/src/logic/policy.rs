use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use hearthdraw_game::{ImpactKind, PlayerImpact};

/// Keeps the policy stream apart from the deck stream of the same seed.
const POLICY_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Relative weights of the actions a simulated player takes each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionMix {
    pub draw: u32,
    pub upgrade: u32,
    pub impact: u32,
    pub save_reload: u32,
}

impl ActionMix {
    pub const fn draws_only() -> Self {
        Self {
            draw: 1,
            upgrade: 0,
            impact: 0,
            save_reload: 0,
        }
    }

    pub const fn total(&self) -> u32 {
        self.draw + self.upgrade + self.impact + self.save_reload
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Idle,
    Draw,
    Upgrade,
    Impact,
    SaveReload,
}

/// Seeded decision maker for simulated sessions.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    rng: ChaCha8Rng,
    mix: ActionMix,
    issued_impacts: Vec<PlayerImpact>,
}

impl SessionPolicy {
    pub fn new(seed: u64, mix: ActionMix) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ POLICY_SALT),
            mix,
            issued_impacts: Vec::new(),
        }
    }

    pub fn next_action(&mut self) -> Action {
        let total = self.mix.total();
        if total == 0 {
            return Action::Idle;
        }
        let mut roll = self.rng.gen_range(0..total);
        for (weight, action) in [
            (self.mix.draw, Action::Draw),
            (self.mix.upgrade, Action::Upgrade),
            (self.mix.impact, Action::Impact),
            (self.mix.save_reload, Action::SaveReload),
        ] {
            if roll < weight {
                return action;
            }
            roll -= weight;
        }
        Action::Idle
    }

    pub fn pick_building(&mut self, building_count: usize) -> Option<usize> {
        (building_count > 0).then(|| self.rng.gen_range(0..building_count))
    }

    /// Next external impact. Roughly one in four replays an earlier delivery
    /// and one in twenty carries a bogus amount.
    pub fn next_impact(&mut self, seed: u64, now_ticks: i64) -> PlayerImpact {
        if !self.issued_impacts.is_empty() && self.rng.gen_bool(0.25) {
            let index = self.rng.gen_range(0..self.issued_impacts.len());
            return self.issued_impacts[index].clone();
        }

        let (kind, amount) = match self.rng.gen_range(0..4) {
            0 => (ImpactKind::CoinsGranted, self.rng.gen_range(10..=200)),
            1 => (ImpactKind::CoinsStolen, self.rng.gen_range(10..=300)),
            2 => (ImpactKind::EnergyGranted, self.rng.gen_range(1..=6)),
            _ => (ImpactKind::EnergyRemoved, self.rng.gen_range(1..=8)),
        };
        let amount = if self.rng.gen_bool(0.05) { 0 } else { amount };
        let impact = PlayerImpact::new(
            format!("impact-{seed:x}-{}", self.issued_impacts.len()),
            kind,
            amount,
        )
        .by_player(format!("rival-{}", self.rng.gen_range(1..=4)))
        .at_ticks(now_ticks);
        self.issued_impacts.push(impact.clone());
        impact
    }
}
