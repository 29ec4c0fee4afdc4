pub mod encoder;
pub mod engine;
pub mod error;
pub mod grid;

pub use encoder::{CommandEncoder, EncodedCommand};
pub use engine::{Completion, DispatchEngine, SLOT_A, SLOT_B, SLOT_C, SLOT_COUNT, VECTOR_ADD_ARITY};
pub use error::DispatchError;
pub use grid::LaunchConfig;
