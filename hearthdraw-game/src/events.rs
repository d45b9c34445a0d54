//! Change notifications emitted by resource accounts.
//!
//! Listeners are registered explicitly on each account and only fire when
//! a mutation changed an observable value.

use std::fmt;

/// Handle returned by `subscribe`, used to remove a listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Energy pool changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyChanged {
    pub previous: i32,
    pub current: i32,
    pub regen_max: i32,
    pub storage_max: i32,
}

/// Coin balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinsChanged {
    pub previous: i32,
    pub current: i32,
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered set of callbacks for one event type.
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns `true` when a listener with this id was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}
