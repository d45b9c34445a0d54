//! In-memory snapshot persistence.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::ProfileStore;
use crate::player::PlayerProfileSnapshot;

/// Snapshots keyed by player id. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    snapshots: Rc<RefCell<HashMap<String, PlayerProfileSnapshot>>>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.borrow().is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    type Error = Infallible;

    fn save_profile(&self, snapshot: &PlayerProfileSnapshot) -> Result<(), Self::Error> {
        self.snapshots
            .borrow_mut()
            .insert(snapshot.player_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load_profile(&self, player_id: &str) -> Result<Option<PlayerProfileSnapshot>, Self::Error> {
        Ok(self.snapshots.borrow().get(player_id).cloned())
    }

    fn delete_profile(&self, player_id: &str) -> Result<(), Self::Error> {
        self.snapshots.borrow_mut().remove(player_id);
        Ok(())
    }
}
