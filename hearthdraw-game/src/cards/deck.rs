//! Weighted random selection over a fixed card set.

use log::warn;
use rand::Rng;
use thiserror::Error;

use super::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck has no cards to draw")]
    Empty,
}

/// Cards with a cached cumulative-weight table.
///
/// A positive-weight card is drawn with probability `weight / total`.
/// Zero-weight cards are only reachable when every weight is zero, in which
/// case the draw is uniform.
#[derive(Debug, Clone, Default)]
pub struct WeightedDeck {
    cards: Vec<Card>,
    cumulative: Vec<i32>,
    total_weight: i32,
}

impl WeightedDeck {
    /// Build a deck, dropping cards without an id.
    #[must_use]
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards: Vec<Card> = cards
            .into_iter()
            .filter(|card| {
                let keep = card.is_valid();
                if !keep {
                    warn!("dropping card without id from deck");
                }
                keep
            })
            .collect();

        let mut running = 0i32;
        let cumulative = cards
            .iter()
            .map(|card| {
                running = running.saturating_add(card.weight.max(0));
                running
            })
            .collect();

        Self {
            cards,
            cumulative,
            total_weight: running,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub const fn total_weight(&self) -> i32 {
        self.total_weight
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn find(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Pick a card.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] when the deck holds no cards.
    pub fn try_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Card, DeckError> {
        let index = self.draw_index(rng)?;
        Ok(&self.cards[index])
    }

    /// Pick a card index.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] when the deck holds no cards.
    pub fn draw_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::Empty);
        }
        if self.total_weight <= 0 {
            return Ok(rng.gen_range(0..self.cards.len()));
        }
        // Inclusive range: no `total + 1` is formed, so i32::MAX totals are safe.
        let roll = rng.gen_range(1..=self.total_weight);
        Ok(self.index_for_roll(roll))
    }

    /// First card whose cumulative weight reaches `roll`.
    fn index_for_roll(&self, roll: i32) -> usize {
        let index = self.cumulative.partition_point(|&weight| weight < roll);
        index.min(self.cards.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::RewardEffect;
    use crate::rng::{CountingRng, DECK_STREAM};

    fn card(id: &str, weight: i32) -> Card {
        Card::new(id, weight, [RewardEffect::GrantCurrency { amount: 1 }])
    }

    #[test]
    fn empty_deck_reports_failure() {
        let deck = WeightedDeck::new(Vec::new());
        let mut rng = CountingRng::from_user_seed(1, DECK_STREAM);
        assert_eq!(deck.try_draw(&mut rng).unwrap_err(), DeckError::Empty);
    }

    #[test]
    fn invalid_cards_are_dropped() {
        let deck = WeightedDeck::new([card("", 5), card("   ", 2), card("coins", 1)]);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.total_weight(), 1);
    }

    #[test]
    fn cumulative_weights_clamp_and_saturate() {
        let deck = WeightedDeck::new([card("a", -4), card("b", i32::MAX), card("c", 7)]);
        assert_eq!(deck.cumulative, vec![0, i32::MAX, i32::MAX]);
        assert_eq!(deck.total_weight(), i32::MAX);
    }

    #[test]
    fn roll_lookup_is_a_lower_bound() {
        let deck = WeightedDeck::new([card("a", 2), card("zero", 0), card("b", 3)]);
        assert_eq!(deck.cumulative, vec![2, 2, 5]);
        assert_eq!(deck.index_for_roll(1), 0);
        assert_eq!(deck.index_for_roll(2), 0);
        assert_eq!(deck.index_for_roll(3), 2);
        assert_eq!(deck.index_for_roll(5), 2);
        assert_eq!(deck.index_for_roll(99), 2);
    }

    #[test]
    fn weighted_selection_converges_to_ratio() {
        let deck = WeightedDeck::new([card("light", 1), card("heavy", 3)]);
        let mut rng = CountingRng::from_user_seed(0x5EED, DECK_STREAM);
        let draws = 40_000;
        let mut heavy = 0u32;
        for _ in 0..draws {
            if deck.try_draw(&mut rng).unwrap().id == "heavy" {
                heavy += 1;
            }
        }
        let share = f64::from(heavy) / f64::from(draws);
        assert!((share - 0.75).abs() < 0.02, "heavy share {share}");
    }

    #[test]
    fn zero_weight_cards_never_win_against_positive_weights() {
        let deck = WeightedDeck::new([card("never", 0), card("always", 4), card("never2", 0)]);
        let mut rng = CountingRng::from_user_seed(3, DECK_STREAM);
        for _ in 0..2_000 {
            assert_eq!(deck.try_draw(&mut rng).unwrap().id, "always");
        }
    }

    #[test]
    fn all_zero_weights_select_uniformly() {
        let deck = WeightedDeck::new([card("a", 0), card("b", 0), card("c", 0), card("d", 0)]);
        let mut rng = CountingRng::from_user_seed(11, DECK_STREAM);
        let mut counts = [0u32; 4];
        for _ in 0..20_000 {
            counts[deck.draw_index(&mut rng).unwrap()] += 1;
        }
        for count in counts {
            let share = f64::from(count) / 20_000.0;
            assert!((share - 0.25).abs() < 0.02, "share {share}");
        }
    }

    #[test]
    fn max_total_weight_draws_without_overflow() {
        let deck = WeightedDeck::new([card("a", i32::MAX - 1), card("b", 1)]);
        assert_eq!(deck.total_weight(), i32::MAX);
        let mut rng = CountingRng::from_user_seed(5, DECK_STREAM);
        for _ in 0..100 {
            assert!(deck.try_draw(&mut rng).is_ok());
        }
    }
}
