pub mod reporter;
pub mod verify;

pub use reporter::{Reporter, SAMPLE_EDGE};
pub use verify::{expected_value, verify_pattern, verify_sum, VerificationError};
