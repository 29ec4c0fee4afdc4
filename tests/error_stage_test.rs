use vecadd_engine::config::{ComputeConfig, ConfigError};
use vecadd_engine::gpu::dispatch::DispatchError;
use vecadd_engine::gpu::launcher::LaunchError;
use vecadd_engine::gpu::loader::{CompileError, CudaLoaderError};
use vecadd_engine::gpu::memory::GpuMemoryError;
use vecadd_engine::gpu::nvrtc::NvrtcError;
use vecadd_engine::gpu::runtime::GpuRuntimeError;
use vecadd_engine::gpu::safety::{describe, CudaStatus};
use vecadd_engine::ComputeError;

#[test]
fn missing_function_maps_to_entry_point_not_found() {
    let err: ComputeError = CudaLoaderError::FunctionNotFound {
        name: "vector_sub".into(),
        status: CudaStatus(500),
    }
    .into();

    assert!(matches!(&err, ComputeError::EntryPointNotFound { name, .. } if name == "vector_sub"));
    assert_eq!(err.stage(), "entry-point");
    assert!(err.is_setup());
    assert!(err.to_string().contains("vector_sub"));
}

#[test]
fn module_load_failure_is_a_compile_error() {
    let err: ComputeError = CudaLoaderError::ModuleLoadFailed(CudaStatus(218)).into();

    assert!(matches!(err, ComputeError::CompileError(CompileError::Module(_))));
    assert_eq!(err.stage(), "compile");
    assert!(err.to_string().contains("CUDA_ERROR_INVALID_PTX"));
}

#[test]
fn compiler_log_survives_into_the_message() {
    let err: ComputeError = CompileError::Nvrtc(NvrtcError::CompilationError {
        name: "vector_add".into(),
        log: "vector_add.cu(3): error: identifier \"x\" is undefined".into(),
    })
    .into();

    assert_eq!(err.stage(), "compile");
    assert!(err.to_string().contains("identifier \"x\" is undefined"));
}

#[test]
fn stages_separate_setup_from_submission() {
    let device: ComputeError = GpuRuntimeError::NoDevice.into();
    let alloc: ComputeError = GpuMemoryError::EmptyBuffer.into();
    let submit: ComputeError =
        DispatchError::Launch(LaunchError::LaunchFailed(CudaStatus(701))).into();

    assert_eq!(device.stage(), "device");
    assert_eq!(alloc.stage(), "allocation");
    assert_eq!(submit.stage(), "submission");
    assert!(device.is_setup());
    assert!(alloc.is_setup());
    assert!(!submit.is_setup());
}

#[test]
fn device_loss_is_its_own_kind() {
    let lost = DispatchError::Launch(LaunchError::DeviceLost(CudaStatus(700)));
    let failed = DispatchError::Launch(LaunchError::LaunchFailed(CudaStatus(701)));

    assert!(lost.is_device_lost());
    assert!(!failed.is_device_lost());
    assert!(lost.to_string().contains("CUDA_ERROR_ILLEGAL_ADDRESS"));
}

#[test]
fn status_names_known_codes() {
    assert_eq!(describe(0), "CUDA_SUCCESS");
    assert_eq!(describe(100), "CUDA_ERROR_NO_DEVICE");
    assert_eq!(describe(12345), "CUDA_ERROR_UNRECOGNIZED");
    assert_eq!(CudaStatus(2).to_string(), "CUDA_ERROR_OUT_OF_MEMORY (2)");
}

#[test]
fn default_config_is_the_fixed_workload() {
    let cfg = ComputeConfig::default();

    assert_eq!(cfg.element_count, 1_000_000);
    assert_eq!(cfg.threadgroup_size, 256);
    assert_eq!(cfg.entry_point, "vector_add");
    assert_eq!(cfg.validate(), Ok(()));
}

#[test]
fn invalid_configs_are_rejected() {
    let zero = ComputeConfig::with_elements(0);
    let no_group = ComputeConfig { threadgroup_size: 0, ..ComputeConfig::default() };
    let no_entry = ComputeConfig { entry_point: String::new(), ..ComputeConfig::default() };

    assert_eq!(zero.validate(), Err(ConfigError::ZeroElements));
    assert_eq!(no_group.validate(), Err(ConfigError::ZeroGroupSize));
    assert_eq!(no_entry.validate(), Err(ConfigError::EmptyEntryPoint));

    let err: ComputeError = ConfigError::ZeroElements.into();
    assert_eq!(err.stage(), "config");
}

#[cfg(target_pointer_width = "64")]
#[test]
fn count_must_fit_the_kernel_argument() {
    let cfg = ComputeConfig::with_elements(u32::MAX as usize + 1);
    assert_eq!(cfg.validate(), Err(ConfigError::TooManyElements(u32::MAX as usize + 1)));
}
