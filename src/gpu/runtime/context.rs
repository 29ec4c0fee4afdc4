use libloading::{Library, Symbol};
use log::{debug, info};
use std::ffi::{c_char, c_void, CStr};
use std::ptr;

use super::{GpuRuntimeError, MissingSymbol};
use crate::gpu::safety::error_codes::{CUDA_ERROR_INVALID_HANDLE, CUDA_ERROR_NO_DEVICE};
use crate::gpu::safety::{CudaStatus, GpuSafety};

pub type CUdevice = i32;
pub type CUcontext = *mut c_void;
pub type CUstream = *mut c_void;

const CU_DEVICE_ATTRIBUTE_MANAGED_MEMORY: i32 = 83;

#[cfg(target_os = "windows")]
const DRIVER_CANDIDATES: &[&str] = &["nvcuda.dll"];
#[cfg(not(target_os = "windows"))]
const DRIVER_CANDIDATES: &[&str] = &["libcuda.so.1", "libcuda.so"];

/// Owned connection to one CUDA device: driver library, context and the
/// single stream every submission goes through.
///
/// Nothing here is global. Several runtimes can live in one process; every
/// object created from a runtime borrows it, so it outlives them all.
pub struct GpuRuntime {
    driver: Library,
    device: CUdevice,
    context: CUcontext,
    stream: CUstream,
    device_name: String,
}

impl GpuRuntime {
    /// Loads the driver and opens device 0. There is no CPU fallback: a
    /// missing driver or an empty device list is an error.
    pub fn new() -> Result<Self, GpuRuntimeError> {
        let driver = load_driver()?;
        debug!("CUDA driver loaded");

        let (device, device_name, context) = unsafe { open_device(&driver)? };

        // From here on the context is released by Drop if anything fails.
        let mut rt = Self {
            driver,
            device,
            context,
            stream: ptr::null_mut(),
            device_name,
        };

        unsafe {
            let cu_stream_create: Symbol<unsafe extern "C" fn(*mut CUstream, u32) -> i32> =
                rt.symbol(b"cuStreamCreate\0")?;
            let mut stream: CUstream = ptr::null_mut();
            GpuSafety::check(cu_stream_create(&mut stream, 0), "cuStreamCreate")
                .map_err(GpuRuntimeError::StreamCreateFailed)?;
            if stream.is_null() {
                return Err(GpuRuntimeError::StreamCreateFailed(CudaStatus(
                    CUDA_ERROR_INVALID_HANDLE,
                )));
            }
            rt.stream = stream;
        }

        info!("CUDA device ready: {}", rt.device_name);
        Ok(rt)
    }

    /// Resolves a driver entry point. Callers map the error into their own
    /// stage error through `From<MissingSymbol>`.
    pub(crate) unsafe fn symbol<T>(&self, name: &[u8]) -> Result<Symbol<'_, T>, MissingSymbol> {
        unsafe { lookup(&self.driver, name) }
    }

    /// Makes this runtime's context current on the calling thread.
    pub(crate) fn bind(&self) -> Result<(), GpuRuntimeError> {
        unsafe {
            let cu_ctx_set_current: Symbol<unsafe extern "C" fn(CUcontext) -> i32> =
                self.symbol(b"cuCtxSetCurrent\0")?;
            GpuSafety::check(cu_ctx_set_current(self.context), "cuCtxSetCurrent")
                .map_err(GpuRuntimeError::ContextBindFailed)
        }
    }

    pub fn device(&self) -> CUdevice {
        self.device
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub(crate) fn context(&self) -> CUcontext {
        self.context
    }

    pub(crate) fn stream(&self) -> CUstream {
        self.stream
    }
}

impl Drop for GpuRuntime {
    fn drop(&mut self) {
        unsafe {
            if !self.stream.is_null() {
                if let Ok(destroy) =
                    self.symbol::<unsafe extern "C" fn(CUstream) -> i32>(b"cuStreamDestroy_v2\0")
                {
                    let _ = GpuSafety::check(destroy(self.stream), "cuStreamDestroy_v2");
                }
            }
            if !self.context.is_null() {
                if let Ok(destroy) =
                    self.symbol::<unsafe extern "C" fn(CUcontext) -> i32>(b"cuCtxDestroy_v2\0")
                {
                    let _ = GpuSafety::check(destroy(self.context), "cuCtxDestroy_v2");
                }
            }
        }
        debug!("CUDA context released");
    }
}

fn load_driver() -> Result<Library, GpuRuntimeError> {
    let mut last_err = String::from("no candidate library names");
    for name in DRIVER_CANDIDATES {
        match unsafe { Library::new(name) } {
            Ok(lib) => return Ok(lib),
            Err(e) => last_err = format!("{}: {}", name, e),
        }
    }
    Err(GpuRuntimeError::DriverNotFound(last_err))
}

unsafe fn lookup<'lib, T>(driver: &'lib Library, name: &[u8]) -> Result<Symbol<'lib, T>, MissingSymbol> {
    unsafe {
        driver.get(name).map_err(|_| {
            let trimmed = name.strip_suffix(b"\0").unwrap_or(name);
            MissingSymbol(String::from_utf8_lossy(trimmed).into())
        })
    }
}

unsafe fn open_device(driver: &Library) -> Result<(CUdevice, String, CUcontext), GpuRuntimeError> {
    unsafe {
        let cu_init: Symbol<unsafe extern "C" fn(u32) -> i32> = lookup(driver, b"cuInit\0")?;
        let res = cu_init(0);
        if res == CUDA_ERROR_NO_DEVICE {
            return Err(GpuRuntimeError::NoDevice);
        }
        GpuSafety::check(res, "cuInit").map_err(GpuRuntimeError::InitFailed)?;

        let cu_device_get_count: Symbol<unsafe extern "C" fn(*mut i32) -> i32> =
            lookup(driver, b"cuDeviceGetCount\0")?;
        let mut count = 0;
        GpuSafety::check(cu_device_get_count(&mut count), "cuDeviceGetCount")
            .map_err(GpuRuntimeError::DeviceQueryFailed)?;
        if count <= 0 {
            return Err(GpuRuntimeError::NoDevice);
        }
        debug!("{} CUDA device(s) visible", count);

        let cu_device_get: Symbol<unsafe extern "C" fn(*mut CUdevice, i32) -> i32> =
            lookup(driver, b"cuDeviceGet\0")?;
        let mut device: CUdevice = 0;
        GpuSafety::check(cu_device_get(&mut device, 0), "cuDeviceGet")
            .map_err(GpuRuntimeError::DeviceQueryFailed)?;

        let device_name = query_device_name(driver, device)?;

        let cu_device_get_attr: Symbol<unsafe extern "C" fn(*mut i32, i32, CUdevice) -> i32> =
            lookup(driver, b"cuDeviceGetAttribute\0")?;
        let mut managed = 0;
        GpuSafety::check(
            cu_device_get_attr(&mut managed, CU_DEVICE_ATTRIBUTE_MANAGED_MEMORY, device),
            "cuDeviceGetAttribute(MANAGED_MEMORY)",
        )
        .map_err(GpuRuntimeError::DeviceQueryFailed)?;
        if managed == 0 {
            return Err(GpuRuntimeError::ManagedMemoryUnsupported(device_name));
        }

        let cu_ctx_create: Symbol<unsafe extern "C" fn(*mut CUcontext, u32, CUdevice) -> i32> =
            lookup(driver, b"cuCtxCreate_v2\0")?;
        let mut context: CUcontext = ptr::null_mut();
        GpuSafety::check(cu_ctx_create(&mut context, 0, device), "cuCtxCreate_v2")
            .map_err(GpuRuntimeError::ContextCreateFailed)?;

        Ok((device, device_name, context))
    }
}

unsafe fn query_device_name(driver: &Library, device: CUdevice) -> Result<String, GpuRuntimeError> {
    unsafe {
        let cu_device_get_name: Symbol<unsafe extern "C" fn(*mut c_char, i32, CUdevice) -> i32> =
            lookup(driver, b"cuDeviceGetName\0")?;

        let mut buf = [0 as c_char; 256];
        GpuSafety::check(
            cu_device_get_name(buf.as_mut_ptr(), buf.len() as i32, device),
            "cuDeviceGetName",
        )
        .map_err(GpuRuntimeError::DeviceQueryFailed)?;

        Ok(CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned())
    }
}
