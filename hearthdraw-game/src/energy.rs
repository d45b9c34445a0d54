//! Regenerating energy pool.
//!
//! Passive regeneration fills the pool up to `regen_max`. Anything above
//! that ("extra" energy, up to `storage_max`) only arrives through explicit
//! grants. While the pool sits at or above the regen cap the anchor keeps
//! moving forward so time is not banked.

use std::fmt;
use std::rc::Rc;

use crate::clock::Clock;
use crate::error::InsufficientResource;
use crate::events::{EnergyChanged, ListenerId, Listeners};
use crate::regen;

pub struct EnergyAccount {
    clock: Rc<dyn Clock>,
    current: i32,
    regen_max: i32,
    storage_max: i32,
    regen_interval_seconds: i32,
    last_regen_ticks: i64,
    listeners: Listeners<EnergyChanged>,
}

impl fmt::Debug for EnergyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyAccount")
            .field("current", &self.current)
            .field("regen_max", &self.regen_max)
            .field("storage_max", &self.storage_max)
            .field("regen_interval_seconds", &self.regen_interval_seconds)
            .field("last_regen_ticks", &self.last_regen_ticks)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl EnergyAccount {
    /// Build an account, normalizing out-of-range parameters.
    ///
    /// `regen_max` is at least 1, `storage_max` at least `regen_max`, the
    /// interval at least one second and `current` is clamped into
    /// `0..=storage_max`. A non-positive anchor is replaced by the clock's
    /// current time.
    #[must_use]
    pub fn new(
        clock: Rc<dyn Clock>,
        current: i32,
        regen_max: i32,
        storage_max: i32,
        regen_interval_seconds: i32,
        last_regen_ticks: i64,
    ) -> Self {
        let regen_max = regen_max.max(1);
        let storage_max = storage_max.max(regen_max);
        let last_regen_ticks = if last_regen_ticks <= 0 {
            clock.now_ticks()
        } else {
            last_regen_ticks
        };
        Self {
            clock,
            current: current.clamp(0, storage_max),
            regen_max,
            storage_max,
            regen_interval_seconds: regen::normalize_interval(regen_interval_seconds),
            last_regen_ticks,
            listeners: Listeners::default(),
        }
    }

    /// Account whose storage cap equals its regen cap.
    #[must_use]
    pub fn without_storage(
        clock: Rc<dyn Clock>,
        current: i32,
        max: i32,
        regen_interval_seconds: i32,
        last_regen_ticks: i64,
    ) -> Self {
        Self::new(
            clock,
            current,
            max,
            max,
            regen_interval_seconds,
            last_regen_ticks,
        )
    }

    /// Energy as of the last regen pass. Call [`Self::apply_regen`] first for
    /// an up-to-date value.
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> i32 {
        self.regen_max
    }

    #[must_use]
    pub const fn storage_max(&self) -> i32 {
        self.storage_max
    }

    #[must_use]
    pub const fn regen_interval_seconds(&self) -> i32 {
        self.regen_interval_seconds
    }

    #[must_use]
    pub const fn last_regen_ticks(&self) -> i64 {
        self.last_regen_ticks
    }

    /// Energy held above the regen cap.
    #[must_use]
    pub const fn extra(&self) -> i32 {
        if self.current <= self.regen_max {
            0
        } else {
            self.current - self.regen_max
        }
    }

    #[must_use]
    pub fn seconds_until_next(&self) -> i32 {
        regen::seconds_until_next(
            self.clock.now_ticks(),
            self.last_regen_ticks,
            self.regen_interval_seconds,
        )
    }

    /// Replace the time source, keeping every other field.
    pub fn attach_clock(&mut self, clock: Rc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&EnergyChanged) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Credit energy earned since the anchor.
    pub fn apply_regen(&mut self) {
        let before = self.current;
        self.regen_now();
        self.notify_if_changed(before);
    }

    /// Spend `cost` energy. Non-positive costs always succeed.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientResource`] when the pool, after regen, holds
    /// less than `cost`. Only the regen pass is kept in that case.
    pub fn try_spend(&mut self, cost: i32) -> Result<(), InsufficientResource> {
        if cost <= 0 {
            return Ok(());
        }
        let before = self.current;
        self.regen_now();
        if self.current < cost {
            self.notify_if_changed(before);
            return Err(InsufficientResource::energy(cost, self.current));
        }
        self.current -= cost;
        self.notify_if_changed(before);
        Ok(())
    }

    /// Grant (or remove, for negative amounts) energy, clamped to
    /// `0..=storage_max`. This is the only path above the regen cap.
    pub fn add(&mut self, amount: i32) {
        if amount == 0 {
            return;
        }
        let before = self.current;
        self.regen_now();
        self.current = self
            .current
            .saturating_add(amount)
            .clamp(0, self.storage_max);
        self.notify_if_changed(before);
    }

    fn regen_now(&mut self) {
        let now = self.clock.now_ticks();
        if self.current >= self.regen_max {
            self.skip_anchor_forward(now);
            return;
        }

        let gained = regen::gained(now, self.last_regen_ticks, self.regen_interval_seconds);
        if gained <= 0 {
            return;
        }

        let applied = gained.min(self.regen_max - self.current);
        self.current += applied;
        self.last_regen_ticks =
            regen::advance(self.last_regen_ticks, applied, self.regen_interval_seconds);

        if self.current >= self.regen_max {
            self.skip_anchor_forward(now);
        }
    }

    // At the cap, whole elapsed intervals are discarded; the partial one stays.
    fn skip_anchor_forward(&mut self, now: i64) {
        let skipped = regen::gained(now, self.last_regen_ticks, self.regen_interval_seconds);
        if skipped > 0 {
            self.last_regen_ticks =
                regen::advance(self.last_regen_ticks, skipped, self.regen_interval_seconds);
        }
    }

    fn notify_if_changed(&mut self, previous: i32) {
        if previous == self.current {
            return;
        }
        let event = EnergyChanged {
            previous,
            current: self.current,
            regen_max: self.regen_max,
            storage_max: self.storage_max,
        };
        self.listeners.notify(&event);
    }
}
