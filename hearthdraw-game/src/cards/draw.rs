//! The "spend energy, draw, apply effects" transaction.

use log::debug;
use rand::rngs::SmallRng;
use thiserror::Error;

use super::{Card, DeckError, DrawTally, RewardContext, WeightedDeck};
use crate::error::InsufficientResource;
use crate::rng::{CountingRng, DECK_STREAM};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Nothing was spent.
    #[error(transparent)]
    InsufficientEnergy(#[from] InsufficientResource),
    /// The draw cost was refunded.
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Result of a successful draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub card: Card,
    pub energy_spent: i32,
    pub rewards: DrawTally,
}

/// Deck, draw price and roll stream for one player session.
#[derive(Debug, Clone)]
pub struct CardDrawUseCase {
    deck: WeightedDeck,
    draw_cost: i32,
    rng: CountingRng<SmallRng>,
}

impl CardDrawUseCase {
    /// Use case with a deterministic roll stream derived from `seed`.
    #[must_use]
    pub fn new(deck: WeightedDeck, draw_cost: i32, seed: u64) -> Self {
        Self::with_rng(deck, draw_cost, CountingRng::from_user_seed(seed, DECK_STREAM))
    }

    #[must_use]
    pub const fn with_rng(deck: WeightedDeck, draw_cost: i32, rng: CountingRng<SmallRng>) -> Self {
        Self {
            deck,
            draw_cost,
            rng,
        }
    }

    #[must_use]
    pub const fn deck(&self) -> &WeightedDeck {
        &self.deck
    }

    #[must_use]
    pub const fn draw_cost(&self) -> i32 {
        self.draw_cost
    }

    /// Random words taken from the deck stream so far.
    #[must_use]
    pub const fn rolls(&self) -> u64 {
        self.rng.draws()
    }

    /// Spend the draw cost, pick a card and apply its effects in order.
    ///
    /// # Errors
    ///
    /// - [`DrawError::InsufficientEnergy`] when the cost cannot be paid; no
    ///   state changes.
    /// - [`DrawError::Deck`] when no card can be drawn; the cost is refunded.
    pub fn try_draw(&mut self, context: &mut RewardContext<'_>) -> Result<DrawOutcome, DrawError> {
        context.energy_mut().try_spend(self.draw_cost)?;

        let card = match self.deck.try_draw(&mut self.rng) {
            Ok(card) => card,
            Err(err) => {
                if self.draw_cost > 0 {
                    context.energy_mut().add(self.draw_cost);
                    debug!("refunded {} energy after failed draw: {err}", self.draw_cost);
                }
                return Err(err.into());
            }
        };

        let mut scope = context.begin_draw();
        for effect in &card.effects {
            scope.apply(effect);
        }
        let rewards = scope.finish();

        debug!(
            "drew '{}' (x{} multiplier, next x{})",
            card.id, rewards.multiplier, rewards.next_multiplier
        );
        Ok(DrawOutcome {
            card: card.clone(),
            energy_spent: self.draw_cost.max(0),
            rewards,
        })
    }
}
