use libloading::{Library, Symbol};
use log::{debug, warn};
use std::ffi::{c_char, CStr, CString};
use std::ptr;

use super::NvrtcError;

type NvrtcProgramT = *mut std::os::raw::c_void;

const NVRTC_SUCCESS: i32 = 0;

#[cfg(target_os = "windows")]
const NVRTC_CANDIDATES: &[&str] = &[
    "nvrtc64_120_0.dll",
    "nvrtc64_112_0.dll",
];
#[cfg(not(target_os = "windows"))]
const NVRTC_CANDIDATES: &[&str] = &[
    "libnvrtc.so",
    "libnvrtc.so.12",
    "libnvrtc.so.11.2",
];

type CreateFn = unsafe extern "C" fn(
    *mut NvrtcProgramT,
    *const c_char,
    *const c_char,
    i32,
    *const *const c_char,
    *const *const c_char,
) -> i32;
type CompileFn = unsafe extern "C" fn(NvrtcProgramT, i32, *const *const c_char) -> i32;
type GetSizeFn = unsafe extern "C" fn(NvrtcProgramT, *mut usize) -> i32;
type GetBufFn = unsafe extern "C" fn(NvrtcProgramT, *mut c_char) -> i32;
type DestroyFn = unsafe extern "C" fn(*mut NvrtcProgramT) -> i32;
type ErrorStringFn = unsafe extern "C" fn(i32) -> *const c_char;
type NumArchsFn = unsafe extern "C" fn(*mut i32) -> i32;
type ArchsFn = unsafe extern "C" fn(*mut i32) -> i32;

/// Output of one successful NVRTC compilation.
pub struct NvrtcProgram {
    /// NUL-terminated PTX image, ready for `cuModuleLoadData`.
    pub ptx: CString,
    /// Compiler log. Usually empty; warnings end up here.
    pub log: String,
    pub arch: String,
}

pub struct NvrtcCompiler {
    lib: Library,
}

impl NvrtcCompiler {
    pub fn new() -> Result<Self, NvrtcError> {
        let mut last_err = String::from("no candidate library names");
        for name in NVRTC_CANDIDATES {
            match unsafe { Library::new(name) } {
                Ok(lib) => {
                    debug!("NVRTC loaded from {}", name);
                    return Ok(Self { lib });
                }
                Err(e) => last_err = format!("{}: {}", name, e),
            }
        }
        Err(NvrtcError::LoadError(last_err))
    }

    unsafe fn get<T>(&self, name: &[u8]) -> Result<Symbol<'_, T>, NvrtcError> {
        unsafe {
            self.lib.get(name).map_err(|_| {
                let trimmed = name.strip_suffix(b"\0").unwrap_or(name);
                NvrtcError::MissingSymbol(String::from_utf8_lossy(trimmed).into())
            })
        }
    }

    /// Virtual architectures this NVRTC build can target, as numbers
    /// (`52`, `86`, ...). `None` on releases without the query.
    pub fn supported_archs(&self) -> Option<Vec<i32>> {
        unsafe {
            let num: Symbol<NumArchsFn> = self.get(b"nvrtcGetNumSupportedArchs\0").ok()?;
            let list: Symbol<ArchsFn> = self.get(b"nvrtcGetSupportedArchs\0").ok()?;

            let mut n = 0;
            if num(&mut n) != NVRTC_SUCCESS || n <= 0 {
                return None;
            }
            let mut archs = vec![0i32; n as usize];
            if list(archs.as_mut_ptr()) != NVRTC_SUCCESS {
                return None;
            }
            Some(archs)
        }
    }

    /// Clamps a `compute_XY` request to the newest architecture this NVRTC
    /// supports. The driver JITs older PTX forward, so this never loses
    /// correctness.
    pub fn resolve_arch(&self, requested: &str) -> String {
        match self.supported_archs() {
            Some(archs) => clamp_arch(requested, &archs),
            None => requested.to_string(),
        }
    }

    /// Compiles CUDA C `source` to PTX for `arch`. `name` only labels the
    /// program in diagnostics.
    pub fn compile(&self, source: &str, name: &str, arch: &str) -> Result<NvrtcProgram, NvrtcError> {
        let src_c = CString::new(source).map_err(|_| NvrtcError::InvalidSource(name.into()))?;
        let name_c = CString::new(format!("{}.cu", name))
            .map_err(|_| NvrtcError::InvalidSource(name.into()))?;

        let options = [
            CString::new(format!("--gpu-architecture={}", arch))
                .map_err(|_| NvrtcError::InvalidSource(name.into()))?,
            CString::new("--fmad=false").map_err(|_| NvrtcError::InvalidSource(name.into()))?,
        ];
        let opt_ptrs: Vec<*const c_char> = options.iter().map(|s| s.as_ptr()).collect();

        unsafe {
            let create: Symbol<CreateFn> = self.get(b"nvrtcCreateProgram\0")?;
            let destroy: Symbol<DestroyFn> = self.get(b"nvrtcDestroyProgram\0")?;

            let mut prog: NvrtcProgramT = ptr::null_mut();
            let res = create(
                &mut prog,
                src_c.as_ptr(),
                name_c.as_ptr(),
                0,
                ptr::null(),
                ptr::null(),
            );
            if res != NVRTC_SUCCESS || prog.is_null() {
                return Err(NvrtcError::CreateFailed {
                    name: name.into(),
                    reason: self.error_string(res),
                });
            }

            let result = self.compile_program(prog, name, arch, &opt_ptrs);
            let _ = destroy(&mut prog);
            result
        }
    }

    unsafe fn compile_program(
        &self,
        prog: NvrtcProgramT,
        name: &str,
        arch: &str,
        options: &[*const c_char],
    ) -> Result<NvrtcProgram, NvrtcError> {
        unsafe {
            let compile: Symbol<CompileFn> = self.get(b"nvrtcCompileProgram\0")?;
            let get_ptx_size: Symbol<GetSizeFn> = self.get(b"nvrtcGetPTXSize\0")?;
            let get_ptx: Symbol<GetBufFn> = self.get(b"nvrtcGetPTX\0")?;

            let res = compile(prog, options.len() as i32, options.as_ptr());
            let log = self.program_log(prog)?;

            if res != NVRTC_SUCCESS {
                let log = if log.is_empty() { self.error_string(res) } else { log };
                return Err(NvrtcError::CompilationError { name: name.into(), log });
            }
            if !log.is_empty() {
                warn!("NVRTC log for '{}':\n{}", name, log);
            }

            let mut size: usize = 0;
            if get_ptx_size(prog, &mut size) != NVRTC_SUCCESS || size == 0 {
                return Err(NvrtcError::PtxUnavailable {
                    name: name.into(),
                    reason: "nvrtcGetPTXSize failed".into(),
                });
            }

            let mut buffer = vec![0 as c_char; size];
            let res = get_ptx(prog, buffer.as_mut_ptr());
            if res != NVRTC_SUCCESS {
                return Err(NvrtcError::PtxUnavailable {
                    name: name.into(),
                    reason: self.error_string(res),
                });
            }

            let ptx = CStr::from_ptr(buffer.as_ptr()).to_owned();
            debug!("compiled '{}' for {} ({} bytes of PTX)", name, arch, size);

            Ok(NvrtcProgram { ptx, log, arch: arch.to_string() })
        }
    }

    unsafe fn program_log(&self, prog: NvrtcProgramT) -> Result<String, NvrtcError> {
        unsafe {
            let get_log_size: Symbol<GetSizeFn> = self.get(b"nvrtcGetProgramLogSize\0")?;
            let get_log: Symbol<GetBufFn> = self.get(b"nvrtcGetProgramLog\0")?;

            let mut log_size: usize = 0;
            if get_log_size(prog, &mut log_size) != NVRTC_SUCCESS || log_size <= 1 {
                return Ok(String::new());
            }
            let mut buf = vec![0 as c_char; log_size];
            if get_log(prog, buf.as_mut_ptr()) != NVRTC_SUCCESS {
                return Ok(String::new());
            }
            Ok(CStr::from_ptr(buf.as_ptr()).to_string_lossy().trim_end().to_string())
        }
    }

    fn error_string(&self, code: i32) -> String {
        unsafe {
            match self.get::<ErrorStringFn>(b"nvrtcGetErrorString\0") {
                Ok(f) => {
                    let s = f(code);
                    if s.is_null() {
                        format!("nvrtc error {}", code)
                    } else {
                        CStr::from_ptr(s).to_string_lossy().into_owned()
                    }
                }
                Err(_) => format!("nvrtc error {}", code),
            }
        }
    }
}

/// Picks the newest supported arch not above `requested`; the oldest
/// supported one when `requested` predates them all.
pub fn clamp_arch(requested: &str, supported: &[i32]) -> String {
    let wanted = match requested
        .strip_prefix("compute_")
        .and_then(|n| n.parse::<i32>().ok())
    {
        Some(n) => n,
        None => return requested.to_string(),
    };

    let best = supported
        .iter()
        .copied()
        .filter(|a| *a <= wanted)
        .max()
        .or_else(|| supported.iter().copied().min());

    match best {
        Some(a) => format!("compute_{}", a),
        None => requested.to_string(),
    }
}
