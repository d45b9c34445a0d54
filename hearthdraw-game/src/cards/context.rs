//! Applies reward effects to the player's accounts.

use log::debug;

use super::{DrawModifiers, RewardEffect};
use crate::currency::{CurrencyAccount, Wallet};
use crate::energy::EnergyAccount;
use crate::minigames::MinigameLauncher;
use crate::numbers::scale_amount;

/// What one draw actually delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawTally {
    /// Multiplier applied to resource rewards in this draw.
    pub multiplier: i32,
    /// Observed coin delta from reward effects.
    pub coins_granted: i32,
    /// Observed energy delta from reward effects.
    pub energy_granted: i32,
    pub minigames_launched: Vec<String>,
    pub scaled_reward_applied: bool,
    /// Pending multiplier left for the following draw.
    pub next_multiplier: i32,
}

/// Borrowed view of everything reward effects may touch.
pub struct RewardContext<'a> {
    energy: &'a mut EnergyAccount,
    currency: &'a mut CurrencyAccount,
    modifiers: &'a mut DrawModifiers,
    minigames: &'a mut dyn MinigameLauncher,
    current_multiplier: i32,
    tally: DrawTally,
}

impl<'a> RewardContext<'a> {
    pub fn new(
        energy: &'a mut EnergyAccount,
        currency: &'a mut CurrencyAccount,
        modifiers: &'a mut DrawModifiers,
        minigames: &'a mut dyn MinigameLauncher,
    ) -> Self {
        Self {
            energy,
            currency,
            modifiers,
            minigames,
            current_multiplier: 1,
            tally: DrawTally::default(),
        }
    }

    #[must_use]
    pub fn energy(&self) -> &EnergyAccount {
        self.energy
    }

    pub fn energy_mut(&mut self) -> &mut EnergyAccount {
        self.energy
    }

    #[must_use]
    pub fn currency(&self) -> &CurrencyAccount {
        self.currency
    }

    #[must_use]
    pub fn modifiers(&self) -> &DrawModifiers {
        self.modifiers
    }

    /// Start a draw. The returned scope ends the draw when finished or
    /// dropped, so the multiplier bookkeeping completes on every path.
    pub fn begin_draw(&mut self) -> DrawScope<'_, 'a> {
        self.modifiers.begin_draw();
        self.current_multiplier = self.modifiers.current_multiplier();
        self.tally = DrawTally {
            multiplier: self.current_multiplier,
            ..DrawTally::default()
        };
        DrawScope {
            context: self,
            ended: false,
        }
    }

    fn end_draw(&mut self) -> DrawTally {
        self.modifiers
            .complete_draw(self.tally.scaled_reward_applied);
        self.current_multiplier = 1;
        let mut tally = std::mem::take(&mut self.tally);
        tally.next_multiplier = self.modifiers.pending_multiplier();
        tally
    }

    fn apply(&mut self, effect: &RewardEffect) {
        match effect {
            RewardEffect::GrantCurrency { amount } => self.grant_currency(*amount),
            RewardEffect::GrantEnergy { amount } => self.grant_energy(*amount),
            RewardEffect::DoubleNextDraw => self.modifiers.add_double_next_draw(),
            RewardEffect::LaunchMinigame { minigame_id } => {
                self.minigames.launch(minigame_id);
                self.tally.minigames_launched.push(minigame_id.clone());
            }
        }
    }

    fn grant_currency(&mut self, base_amount: i32) {
        if base_amount == 0 {
            return;
        }
        let scaled = scale_amount(base_amount, self.current_multiplier);
        let before = self.currency.coins();
        self.currency.add(scaled);
        let delta = self.currency.coins() - before;
        self.tally.coins_granted = self.tally.coins_granted.saturating_add(delta);
        self.tally.scaled_reward_applied = true;
        debug!(
            "granted {delta} coins (base {base_amount} x{})",
            self.current_multiplier
        );
    }

    fn grant_energy(&mut self, base_amount: i32) {
        if base_amount == 0 {
            return;
        }
        let scaled = scale_amount(base_amount, self.current_multiplier);
        let before = self.energy.current();
        self.energy.add(scaled);
        let delta = self.energy.current() - before;
        self.tally.energy_granted = self.tally.energy_granted.saturating_add(delta);
        self.tally.scaled_reward_applied = true;
        debug!(
            "granted {delta} energy (base {base_amount} x{})",
            self.current_multiplier
        );
    }
}

/// An in-progress draw. Dropping it without [`DrawScope::finish`] still
/// completes the multiplier bookkeeping.
pub struct DrawScope<'c, 'a> {
    context: &'c mut RewardContext<'a>,
    ended: bool,
}

impl DrawScope<'_, '_> {
    pub fn apply(&mut self, effect: &RewardEffect) {
        self.context.apply(effect);
    }

    #[must_use]
    pub fn multiplier(&self) -> i32 {
        self.context.current_multiplier
    }

    pub fn finish(mut self) -> DrawTally {
        self.ended = true;
        self.context.end_draw()
    }
}

impl Drop for DrawScope<'_, '_> {
    fn drop(&mut self) {
        if !self.ended {
            self.context.end_draw();
        }
    }
}
