//! Pending multiplier carried between draws.

/// Bonus added by one "double next draw" effect.
pub const DOUBLE_NEXT_DRAW_STEP: i32 = 2;

/// Multiplier state machine: idle, then in a draw between
/// [`DrawModifiers::begin_draw`] and [`DrawModifiers::complete_draw`].
///
/// A pending multiplier is captured when a draw starts. If that draw
/// delivers a scaled resource reward the captured value is consumed and
/// only bonuses earned during the same draw carry over. A draw that scales
/// nothing leaves the pending multiplier in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawModifiers {
    pending_multiplier: i32,
    draw_start_multiplier: i32,
    added_during_draw: i32,
    in_draw: bool,
}

impl DrawModifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplier waiting for the next draw (0 means no bonus).
    #[must_use]
    pub const fn pending_multiplier(&self) -> i32 {
        self.pending_multiplier
    }

    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.in_draw
    }

    pub fn begin_draw(&mut self) {
        self.draw_start_multiplier = self.pending_multiplier;
        self.added_during_draw = 0;
        self.in_draw = true;
    }

    /// Factor applied to resource rewards of the current draw.
    #[must_use]
    pub const fn current_multiplier(&self) -> i32 {
        if self.draw_start_multiplier <= 0 {
            1
        } else {
            self.draw_start_multiplier
        }
    }

    pub fn add_double_next_draw(&mut self) {
        self.pending_multiplier = self.pending_multiplier.saturating_add(DOUBLE_NEXT_DRAW_STEP);
        self.added_during_draw = self.added_during_draw.saturating_add(DOUBLE_NEXT_DRAW_STEP);
    }

    pub fn complete_draw(&mut self, scaled_reward_applied: bool) {
        if scaled_reward_applied && self.draw_start_multiplier > 0 {
            self.pending_multiplier = self.added_during_draw;
        }
        self.draw_start_multiplier = 0;
        self.added_during_draw = 0;
        self.in_draw = false;
    }
}
