//! Fire-and-forget hand-off to minigames living outside the core.

/// Starts a minigame by id. Launching has no guaranteed effect on core state.
pub trait MinigameLauncher {
    fn launch(&mut self, minigame_id: &str);
}

/// Launcher that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMinigameLauncher;

impl MinigameLauncher for NullMinigameLauncher {
    fn launch(&mut self, _minigame_id: &str) {}
}

/// Launcher that remembers requested ids in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingMinigameLauncher {
    launched: Vec<String>,
}

impl RecordingMinigameLauncher {
    #[must_use]
    pub fn launched(&self) -> &[String] {
        &self.launched
    }
}

impl MinigameLauncher for RecordingMinigameLauncher {
    fn launch(&mut self, minigame_id: &str) {
        self.launched.push(minigame_id.to_string());
    }
}
