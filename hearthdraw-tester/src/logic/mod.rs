pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::ActionMix;
pub use seeds::resolve_seed_inputs;
pub use simulation::{SimulationPlan, SimulationSummary};
pub use tester::*;
