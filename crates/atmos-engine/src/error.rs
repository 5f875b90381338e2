//! Error and status types.
//!
//! [`Error`] is what every fallible engine operation returns. [`Status`] is
//! the closed, numeric view of the same outcomes for hosts that bridge the
//! engine into a C-style callback API.

use atmos_config::ConfigError;
use atmos_core::ParamError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the engine.
///
/// Variants returned from [`Engine::process`](crate::Engine::process) carry
/// only `&'static str` payloads, so the audio path never allocates.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was rejected.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The engine only runs at [`SUPPORTED_SAMPLE_RATE`](crate::SUPPORTED_SAMPLE_RATE).
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),

    /// A buffer could not be allocated at creation time.
    #[error("out of memory")]
    OutOfMemory,

    /// A file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No scenario with this name.
    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    /// A file exists but could not be read.
    #[error("load failed: {0}")]
    LoadFailed(String),

    /// A file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A block is empty, larger than the engine's maximum, or its sample
    /// slice is shorter than `frames · channels`.
    #[error("buffer too small")]
    BufferTooSmall,

    /// The operation needs state that does not exist yet.
    #[error("not initialized")]
    NotInitialized,
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Numeric status of this error.
    pub fn status(&self) -> Status {
        match self {
            Error::InvalidParameter(_) | Error::UnsupportedSampleRate(_) => Status::InvalidParam,
            Error::OutOfMemory => Status::OutOfMemory,
            Error::FileNotFound(_) => Status::FileNotFound,
            Error::InvalidPreset(_) => Status::InvalidPreset,
            Error::LoadFailed(_) => Status::LoadFailed,
            Error::Parse(_) => Status::ParseError,
            Error::BufferTooSmall => Status::BufferTooSmall,
            Error::NotInitialized => Status::NotInitialized,
        }
    }
}

impl From<ParamError> for Error {
    fn from(e: ParamError) -> Self {
        Error::InvalidParameter(e.field())
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ReadFile { path, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    Error::FileNotFound(path)
                } else {
                    Error::LoadFailed(format!("{}: {source}", path.display()))
                }
            }
            ConfigError::TomlParse(err) => Error::Parse(err.to_string()),
            ConfigError::TomlSerialize(err) => Error::Parse(err.to_string()),
            ConfigError::ScenarioNotFound(name) => Error::InvalidPreset(name),
            ConfigError::InvalidWeight { .. } => {
                Error::InvalidParameter("blend weight must be finite and non-negative")
            }
            ConfigError::EmptyBlend => Error::InvalidParameter("blend needs a positive weight"),
            ConfigError::Validation(p) => p.into(),
        }
    }
}

/// Closed set of operation outcomes with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// Success.
    Ok = 0,
    /// Invalid parameter.
    InvalidParam = -1,
    /// Out of memory.
    OutOfMemory = -2,
    /// File not found.
    FileNotFound = -3,
    /// Invalid preset.
    InvalidPreset = -4,
    /// Load failed.
    LoadFailed = -5,
    /// Parse error.
    ParseError = -6,
    /// Buffer too small.
    BufferTooSmall = -7,
    /// Not initialized.
    NotInitialized = -8,
}

impl Status {
    /// Every status, in code order from 0 downwards.
    pub const ALL: [Status; 9] = [
        Status::Ok,
        Status::InvalidParam,
        Status::OutOfMemory,
        Status::FileNotFound,
        Status::InvalidPreset,
        Status::LoadFailed,
        Status::ParseError,
        Status::BufferTooSmall,
        Status::NotInitialized,
    ];

    /// Numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Status for a numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::InvalidParam => "Invalid parameter",
            Status::OutOfMemory => "Out of memory",
            Status::FileNotFound => "File not found",
            Status::InvalidPreset => "Invalid preset",
            Status::LoadFailed => "Load failed",
            Status::ParseError => "Parse error",
            Status::BufferTooSmall => "Buffer too small",
            Status::NotInitialized => "Not initialized",
        }
    }

    /// Status of an operation result.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        e.status()
    }
}
