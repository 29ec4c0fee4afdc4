use vecadd_engine::gpu::arch::{arch_for_capability, FALLBACK_ARCH};
use vecadd_engine::gpu::nvrtc::clamp_arch;

#[test]
fn capability_maps_to_virtual_arch() {
    assert_eq!(arch_for_capability(8, 9), "compute_89");
    assert_eq!(arch_for_capability(7, 5), "compute_75");
    assert_eq!(arch_for_capability(9, 0), "compute_90");
}

#[test]
fn old_devices_use_the_fallback() {
    assert_eq!(arch_for_capability(3, 5), FALLBACK_ARCH);
    assert_eq!(arch_for_capability(5, 0), FALLBACK_ARCH);
    assert_eq!(arch_for_capability(5, 2), "compute_52");
}

#[test]
fn newer_device_than_compiler_is_clamped() {
    let supported = [52, 60, 70, 75, 80, 86, 89, 90];

    assert_eq!(clamp_arch("compute_120", &supported), "compute_90");
    assert_eq!(clamp_arch("compute_86", &supported), "compute_86");
    assert_eq!(clamp_arch("compute_87", &supported), "compute_86");
}

#[test]
fn clamp_keeps_unparseable_or_unsupported_requests() {
    assert_eq!(clamp_arch("sm_80", &[52, 80]), "sm_80");
    assert_eq!(clamp_arch("compute_35", &[52, 80]), "compute_52");
    assert_eq!(clamp_arch("compute_80", &[]), "compute_80");
}
