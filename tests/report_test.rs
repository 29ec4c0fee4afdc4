use std::time::Duration;

use vecadd_engine::gpu::memory::write_pattern;
use vecadd_engine::report::{
    expected_value, verify_pattern, verify_sum, Reporter, VerificationError,
};

fn pattern_output(n: usize) -> Vec<f32> {
    (0..n).map(expected_value).collect()
}

fn render(output: &[f32], elapsed: Duration) -> String {
    let mut buf = Vec::new();
    Reporter::default().report(&mut buf, output, elapsed).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn report_prints_head_separator_and_tail() {
    let text = render(&pattern_output(10), Duration::from_millis(1500));

    let expected = "\
Elapsed (s): 1.5
Sample results:
C[0] = 0.0
C[1] = 3.0
C[2] = 6.0
C[3] = 9.0
C[4] = 12.0
...
C[5] = 15.0
C[6] = 18.0
C[7] = 21.0
C[8] = 24.0
C[9] = 27.0
";
    assert_eq!(text, expected);
}

#[test]
fn report_uses_trailing_indices_for_large_outputs() {
    let text = render(&pattern_output(1_000_000), Duration::from_millis(2));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "Elapsed (s): 0.002");
    assert_eq!(lines[7], "...");
    assert_eq!(lines[8], "C[999995] = 2999985.0");
    assert_eq!(lines[12], "C[999999] = 2999997.0");
}

#[test]
fn short_output_prints_each_index_once() {
    let text = render(&pattern_output(3), Duration::ZERO);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines, vec!["Elapsed (s): 0", "Sample results:", "C[0] = 0.0", "C[1] = 3.0", "C[2] = 6.0", "..."]);
}

#[test]
fn sample_ranges_never_overlap() {
    let r = Reporter::default();

    assert_eq!(r.sample_ranges(10), (0..5, 5..10));
    assert_eq!(r.sample_ranges(7), (0..5, 5..7));
    assert_eq!(r.sample_ranges(2), (0..2, 2..2));
    assert_eq!(Reporter::new(2).sample_ranges(100), (0..2, 98..100));
}

#[test]
fn pattern_output_verifies() {
    assert_eq!(verify_pattern(&pattern_output(1_000_000)), Ok(()));
}

#[test]
fn first_wrong_element_is_reported() {
    let mut out = pattern_output(100);
    out[42] = 0.0;
    out[77] = 1.0;

    assert_eq!(
        verify_pattern(&out),
        Err(VerificationError::Mismatch { index: 42, expected: 126.0, actual: 0.0 })
    );
}

#[test]
fn sum_check_catches_bad_element() {
    let a = vec![1.0f32, 2.0, 3.0];
    let b = vec![10.0f32, 20.0, 30.0];

    assert_eq!(verify_sum(&a, &b, &[11.0, 22.0, 33.0]), Ok(()));
    assert_eq!(
        verify_sum(&a, &b, &[11.0, 21.0, 33.0]),
        Err(VerificationError::Mismatch { index: 1, expected: 22.0, actual: 21.0 })
    );
    assert_eq!(
        verify_sum(&a, &b, &[11.0]),
        Err(VerificationError::LengthMismatch { expected: 3, found: 1 })
    );
}

#[test]
fn pattern_check_follows_f32_rounding_past_2_pow_24() {
    let n = (1usize << 24) + 2;
    let mut a = vec![0.0f32; n];
    let mut b = vec![0.0f32; n];
    write_pattern(&mut a, &mut b).unwrap();
    let c: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x + y).collect();

    // 3 * 16777217 is not representable; the stored sum rounds twice.
    assert_ne!(c[n - 1], (3 * (n - 1)) as f32);
    assert_eq!(expected_value(n - 1), c[n - 1]);
    assert_eq!(verify_pattern(&c), Ok(()));
}
