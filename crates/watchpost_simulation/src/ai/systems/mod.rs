//! AI systems (ECS glue around the controller)

pub mod fsm;
pub mod reactions;

// Re-export all systems
pub use fsm::*;
pub use reactions::*;
