use std::io::{self, Write};
use std::ops::Range;
use std::time::Duration;

pub const SAMPLE_EDGE: usize = 5;

/// Prints the elapsed time and the head and tail of the output.
pub struct Reporter {
    edge: usize,
}

impl Default for Reporter {
    fn default() -> Self {
        Self { edge: SAMPLE_EDGE }
    }
}

impl Reporter {
    pub fn new(edge: usize) -> Self {
        Self { edge }
    }

    /// Leading and trailing index ranges. They never overlap, so short
    /// outputs print each element once.
    pub fn sample_ranges(&self, count: usize) -> (Range<usize>, Range<usize>) {
        let head_end = self.edge.min(count);
        let tail_start = count.saturating_sub(self.edge).max(head_end);
        (0..head_end, tail_start..count)
    }

    pub fn report<W: Write>(&self, out: &mut W, output: &[f32], elapsed: Duration) -> io::Result<()> {
        writeln!(out, "Elapsed (s): {}", elapsed.as_secs_f64())?;
        writeln!(out, "Sample results:")?;

        let (head, tail) = self.sample_ranges(output.len());
        for i in head {
            writeln!(out, "C[{}] = {:?}", i, output[i])?;
        }
        writeln!(out, "...")?;
        for i in tail {
            writeln!(out, "C[{}] = {:?}", i, output[i])?;
        }

        out.flush()
    }
}
