//! Deck configuration as produced by asset loading.
//!
//! Descriptors that cannot be turned into an effect are dropped here, at
//! load time, so draws never see them.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{Card, RewardEffect, WeightedDeck};

pub const FALLBACK_CARD_ID: &str = "fallback_add_coins";
pub const FALLBACK_COINS: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    AddCoins,
    AddEnergy,
    DoubleNextDraw,
    LaunchMinigame,
    #[serde(other)]
    Unsupported,
}

/// Raw effect descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub effect_type: EffectKind,
    #[serde(default)]
    pub int_value: i32,
    #[serde(default)]
    pub string_value: String,
}

impl EffectConfig {
    /// Convert into an effect, or `None` when the descriptor is unusable.
    #[must_use]
    pub fn to_effect(&self) -> Option<RewardEffect> {
        match self.effect_type {
            EffectKind::AddCoins => Some(RewardEffect::GrantCurrency {
                amount: self.int_value,
            }),
            EffectKind::AddEnergy => Some(RewardEffect::GrantEnergy {
                amount: self.int_value,
            }),
            EffectKind::DoubleNextDraw => Some(RewardEffect::DoubleNextDraw),
            EffectKind::LaunchMinigame => {
                let minigame_id = self.string_value.trim();
                (!minigame_id.is_empty()).then(|| RewardEffect::LaunchMinigame {
                    minigame_id: minigame_id.to_string(),
                })
            }
            EffectKind::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    pub card_id: String,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

const fn default_weight() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeckConfig {
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

impl DeckConfig {
    /// Parse a deck from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a deck.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Runtime cards in config order, skipping entries without an id and
    /// effects that cannot be built. Negative weights become zero.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter_map(|config| {
                let card_id = config.card_id.trim();
                if card_id.is_empty() {
                    warn!("skipping deck entry without card_id");
                    return None;
                }
                let effects = config.effects.iter().filter_map(|effect| {
                    let built = effect.to_effect();
                    if built.is_none() {
                        warn!("dropping unusable {:?} effect on card '{card_id}'", effect.effect_type);
                    }
                    built
                });
                Some(Card::new(card_id, config.weight.max(0), effects))
            })
            .collect()
    }

    /// Build the runtime deck. An empty result is replaced with a single
    /// fallback card granting [`FALLBACK_COINS`].
    #[must_use]
    pub fn build_deck(&self) -> WeightedDeck {
        let mut cards = self.cards();
        if cards.is_empty() {
            warn!("deck config produced no cards; using fallback deck");
            cards.push(fallback_card());
        }
        WeightedDeck::new(cards)
    }
}

#[must_use]
pub fn fallback_card() -> Card {
    Card::new(
        FALLBACK_CARD_ID,
        1,
        [RewardEffect::GrantCurrency {
            amount: FALLBACK_COINS,
        }],
    )
}
