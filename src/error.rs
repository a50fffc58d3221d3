use std::path::PathBuf;

/// Reasons an [`Engine`](crate::Engine) cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Cells must be 1, 2, 4 or 8 bytes wide.
    #[error("cell width must be one of 1, 2, 4, 8 (got {width})")]
    InvalidCellWidth { width: u32 },

    #[error("program too large ({len} bytes, limit is 2^31)")]
    ProgramTooLarge { len: usize },

    /// `cells * width` exceeds the 2^31 byte ceiling.
    #[error("tape too large ({cells} cells of {width} bytes, limit is 2^31 bytes)")]
    TapeTooLarge { cells: u32, width: u32 },

    /// The allocator refused the request.
    #[error("failed to allocate {what} ({bytes} bytes)")]
    AllocationFailed { what: &'static str, bytes: u64 },
}

/// Errors surfaced by [`Engine::run`](crate::Engine::run).
///
/// `ip` is the position of the instruction that failed; it was not consumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The tape pointer would leave the tape, or a cell access happened outside it.
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr}, op='{op}')")]
    MemoryRange { ip: usize, ptr: usize, op: char },

    /// A bracket had to jump but has no partner.
    #[error("Unmatched bracket '{op}' at instruction {ip}")]
    Branch { ip: usize, op: char },
}

impl EngineError {
    /// Program position of the failing instruction.
    pub fn ip(&self) -> usize {
        match self {
            EngineError::MemoryRange { ip, .. } | EngineError::Branch { ip, .. } => *ip,
        }
    }
}

/// Errors raised while loading a program file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file too big: {} (limit is 2^31 bytes)", path.display())]
    TooLarge { path: PathBuf },
}
