use thiserror::Error;

#[derive(Debug, Error)]
pub enum NvrtcError {
    #[error("NVRTC library not found: {0}")]
    LoadError(String),
    #[error("missing NVRTC symbol: {0}")]
    MissingSymbol(String),
    #[error("kernel '{0}' contains an interior NUL byte")]
    InvalidSource(String),
    #[error("nvrtcCreateProgram failed for '{name}': {reason}")]
    CreateFailed { name: String, reason: String },
    #[error("NVRTC compilation of '{name}' failed:\n{log}")]
    CompilationError { name: String, log: String },
    #[error("could not retrieve PTX for '{name}': {reason}")]
    PtxUnavailable { name: String, reason: String },
}
