//! Coin balance and the wallet abstraction consumed by village upgrades.

use crate::error::InsufficientResource;
use crate::events::{CoinsChanged, ListenerId, Listeners};

/// Anything that can pay for upgrades.
pub trait Wallet {
    fn balance(&self) -> i32;

    fn can_afford(&self, amount: i32) -> bool;

    /// Credit coins. Non-positive amounts are ignored.
    fn add(&mut self, amount: i32);

    /// Debit coins, leaving the balance untouched on failure.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientResource`] when the balance is below `amount`.
    fn try_spend(&mut self, amount: i32) -> Result<(), InsufficientResource>;
}

/// Non-negative coin balance that saturates at `i32::MAX`.
#[derive(Debug, Default)]
pub struct CurrencyAccount {
    coins: i32,
    listeners: Listeners<CoinsChanged>,
}

impl CurrencyAccount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account opened with a starting balance (negative values open empty).
    #[must_use]
    pub fn with_balance(coins: i32) -> Self {
        Self {
            coins: coins.max(0),
            listeners: Listeners::default(),
        }
    }

    #[must_use]
    pub const fn coins(&self) -> i32 {
        self.coins
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&CoinsChanged) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn set_coins(&mut self, coins: i32) {
        let previous = self.coins;
        self.coins = coins;
        if previous != coins {
            self.listeners.notify(&CoinsChanged {
                previous,
                current: coins,
            });
        }
    }
}

impl Wallet for CurrencyAccount {
    fn balance(&self) -> i32 {
        self.coins
    }

    fn can_afford(&self, amount: i32) -> bool {
        amount <= 0 || self.coins >= amount
    }

    fn add(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.set_coins(self.coins.saturating_add(amount));
    }

    fn try_spend(&mut self, amount: i32) -> Result<(), InsufficientResource> {
        if amount <= 0 {
            return Ok(());
        }
        if self.coins < amount {
            return Err(InsufficientResource::coins(amount, self.coins));
        }
        self.set_coins(self.coins - amount);
        Ok(())
    }
}
