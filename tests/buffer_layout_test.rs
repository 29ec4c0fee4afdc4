use vecadd_engine::gpu::memory::{write_pattern, BufferLayout, GpuMemoryError};

#[test]
fn byte_length_is_count_times_element_size() {
    let layout = BufferLayout::new::<f32>(1_000_000).unwrap();

    assert_eq!(layout.count(), 1_000_000);
    assert_eq!(layout.element_size(), 4);
    assert_eq!(layout.byte_length(), 4_000_000);
}

#[test]
fn scalar_count_buffer_is_four_bytes() {
    let layout = BufferLayout::new::<u32>(1).unwrap();
    assert_eq!(layout.byte_length(), 4);
}

#[test]
fn whole_element_byte_length_is_accepted() {
    let layout = BufferLayout::from_bytes::<f32>(40).unwrap();
    assert_eq!(layout.count(), 10);
    assert_eq!(layout, BufferLayout::new::<f32>(10).unwrap());
}

#[test]
fn partial_element_byte_length_is_rejected() {
    assert!(matches!(
        BufferLayout::from_bytes::<f32>(41),
        Err(GpuMemoryError::Misaligned { byte_length: 41, element_size: 4 })
    ));
}

#[test]
fn empty_layout_is_rejected() {
    assert!(matches!(BufferLayout::new::<f32>(0), Err(GpuMemoryError::EmptyBuffer)));
    assert!(matches!(BufferLayout::from_bytes::<f32>(0), Err(GpuMemoryError::EmptyBuffer)));
}

#[test]
fn overflowing_layout_is_rejected() {
    assert!(matches!(
        BufferLayout::new::<f32>(usize::MAX / 2),
        Err(GpuMemoryError::TooLarge { element_size: 4, .. })
    ));
}

#[test]
fn pattern_gives_i_and_two_i() {
    let mut a = vec![-1.0f32; 10];
    let mut b = vec![-1.0f32; 10];

    write_pattern(&mut a, &mut b).unwrap();

    let expected_a: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let expected_b: Vec<f32> = (0..10).map(|i| (2 * i) as f32).collect();
    assert_eq!(a, expected_a);
    assert_eq!(b, expected_b);
}

#[test]
fn pattern_sum_is_three_i_at_full_size() {
    let n = 1_000_000;
    let mut a = vec![0.0f32; n];
    let mut b = vec![0.0f32; n];

    write_pattern(&mut a, &mut b).unwrap();

    for i in [0, 1, 4, n / 2, n - 5, n - 1] {
        assert_eq!(a[i] + b[i], (3 * i) as f32);
    }
}

#[test]
fn pattern_requires_equal_lengths() {
    let mut a = vec![0.0f32; 4];
    let mut b = vec![0.0f32; 5];

    assert!(matches!(
        write_pattern(&mut a, &mut b),
        Err(GpuMemoryError::LengthMismatch { expected: 4, found: 5 })
    ));
}
