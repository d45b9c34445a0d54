//! Player profile, external impact ledger and persistence snapshots.

pub mod impact;
pub mod profile;
pub mod snapshot;

pub use impact::{ImpactKind, ImpactOutcome, ImpactStatus, PlayerImpact};
pub use profile::{DEFAULT_PLAYER_ID, PlayerProfile};
pub use snapshot::PlayerProfileSnapshot;
