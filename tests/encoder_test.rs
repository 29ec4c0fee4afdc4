use vecadd_engine::gpu::dispatch::{
    CommandEncoder, DispatchError, LaunchConfig, SLOT_A, SLOT_B, SLOT_C, SLOT_COUNT,
    VECTOR_ADD_ARITY,
};

fn launch(count: usize, group: u32) -> LaunchConfig {
    LaunchConfig::for_elements(count, group).unwrap()
}

fn bind_all(enc: &mut CommandEncoder) {
    enc.set_buffer(SLOT_A, 0x1000).unwrap();
    enc.set_buffer(SLOT_B, 0x2000).unwrap();
    enc.set_buffer(SLOT_C, 0x3000).unwrap();
    enc.set_buffer(SLOT_COUNT, 0x4000).unwrap();
}

#[test]
fn complete_command_keeps_slot_order() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);
    // Bind out of order; the command must still be in slot order.
    enc.set_buffer(SLOT_COUNT, 0x4000).unwrap();
    enc.set_buffer(SLOT_A, 0x1000).unwrap();
    enc.set_buffer(SLOT_C, 0x3000).unwrap();
    enc.set_buffer(SLOT_B, 0x2000).unwrap();
    enc.dispatch_threads(launch(10, 256)).unwrap();

    let cmd = enc.end_encoding().unwrap();

    assert_eq!(cmd.bindings(), &[0x1000, 0x2000, 0x3000, 0x4000]);
    assert_eq!(cmd.launch_config().total_threads(), 256);
}

#[test]
fn unbound_slot_fails_at_end_of_encoding() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);
    enc.set_buffer(SLOT_A, 0x1000).unwrap();
    enc.set_buffer(SLOT_B, 0x2000).unwrap();
    enc.set_buffer(SLOT_COUNT, 0x4000).unwrap();
    enc.dispatch_threads(launch(10, 256)).unwrap();

    assert!(matches!(enc.end_encoding(), Err(DispatchError::UnboundSlot(2))));
}

#[test]
fn slot_out_of_range_is_invalid() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);

    let err = enc.set_buffer(4, 0x5000).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidBinding { slot: 4, .. }));
}

#[test]
fn null_pointer_is_invalid() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);

    let err = enc.set_buffer(SLOT_A, 0).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidBinding { slot: 0, .. }));
}

#[test]
fn rebinding_a_slot_is_rejected() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);
    enc.set_buffer(SLOT_B, 0x2000).unwrap();

    assert!(matches!(
        enc.set_buffer(SLOT_B, 0x2100),
        Err(DispatchError::DuplicateBinding(1))
    ));
}

#[test]
fn only_one_dispatch_per_command() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);
    bind_all(&mut enc);
    enc.dispatch_threads(launch(10, 256)).unwrap();

    assert!(matches!(
        enc.dispatch_threads(launch(10, 256)),
        Err(DispatchError::AlreadyEncoded)
    ));
}

#[test]
fn command_without_dispatch_is_rejected() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 1024);
    bind_all(&mut enc);

    assert!(matches!(enc.end_encoding(), Err(DispatchError::NotEncoded)));
}

#[test]
fn group_larger_than_pipeline_limit_is_a_mismatch() {
    let mut enc = CommandEncoder::new(VECTOR_ADD_ARITY, 128);
    bind_all(&mut enc);

    assert!(matches!(
        enc.dispatch_threads(launch(1000, 256)),
        Err(DispatchError::PipelineMismatch(_))
    ));
}
