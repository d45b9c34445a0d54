//! Reward cards: weighted deck, draw multipliers and the draw transaction.

pub mod config;
pub mod context;
pub mod deck;
pub mod draw;
pub mod modifiers;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use config::{CardConfig, DeckConfig, EffectConfig, EffectKind};
pub use context::{DrawScope, DrawTally, RewardContext};
pub use deck::{DeckError, WeightedDeck};
pub use draw::{CardDrawUseCase, DrawError, DrawOutcome};
pub use modifiers::{DOUBLE_NEXT_DRAW_STEP, DrawModifiers};

/// Effect applied when a card is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardEffect {
    /// Coins, scaled by the active draw multiplier.
    GrantCurrency { amount: i32 },
    /// Energy, scaled by the active draw multiplier. May exceed the regen cap.
    GrantEnergy { amount: i32 },
    /// Stack a bonus multiplier onto the next draw.
    DoubleNextDraw,
    /// Hand off to an external minigame.
    LaunchMinigame { minigame_id: String },
}

pub type EffectList = SmallVec<[RewardEffect; 2]>;

/// A card in the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    /// Relative draw weight. Negative weights count as zero.
    pub weight: i32,
    #[serde(default)]
    pub effects: EffectList,
}

impl Card {
    #[must_use]
    pub fn new(id: impl Into<String>, weight: i32, effects: impl IntoIterator<Item = RewardEffect>) -> Self {
        Self {
            id: id.into(),
            weight,
            effects: effects.into_iter().collect(),
        }
    }

    /// Cards without an id cannot be referenced and are dropped from decks.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
