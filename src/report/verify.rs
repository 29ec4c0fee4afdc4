use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("C[{index}] = {actual:?}, expected {expected:?}")]
    Mismatch { index: usize, expected: f32, actual: f32 },
    #[error("output holds {found} elements, inputs hold {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// `C[i]` for the `A[i] = i`, `B[i] = 2i` fill, rounded the way the device
/// rounds it: each input is stored as `f32`, then one `f32` add.
pub fn expected_value(index: usize) -> f32 {
    index as f32 + (index * 2) as f32
}

/// Checks `C[i] == 3i` for every index. Exact comparison against
/// `expected_value`, which also holds past 2^24 where `f32` stops
/// representing every integer.
pub fn verify_pattern(output: &[f32]) -> Result<(), VerificationError> {
    let first_bad = output
        .par_iter()
        .enumerate()
        .find_first(|(i, v)| **v != expected_value(*i));

    match first_bad {
        Some((index, actual)) => Err(VerificationError::Mismatch {
            index,
            expected: expected_value(index),
            actual: *actual,
        }),
        None => Ok(()),
    }
}

/// Checks `C[i] == A[i] + B[i]` for arbitrary inputs.
pub fn verify_sum(a: &[f32], b: &[f32], c: &[f32]) -> Result<(), VerificationError> {
    for found in [b.len(), c.len()] {
        if found != a.len() {
            return Err(VerificationError::LengthMismatch { expected: a.len(), found });
        }
    }

    let first_bad = c
        .par_iter()
        .zip(a.par_iter().zip(b.par_iter()))
        .enumerate()
        .find_first(|(_, (c, (a, b)))| **c != **a + **b);

    match first_bad {
        Some((index, (c, (a, b)))) => Err(VerificationError::Mismatch {
            index,
            expected: *a + *b,
            actual: *c,
        }),
        None => Ok(()),
    }
}
