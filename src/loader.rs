use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::engine::SIZE_LIMIT;
use crate::error::LoadError;

/// Read a program file as raw bytes.
///
/// Files of 2^31 bytes or more are rejected without reading past the limit.
pub fn load_program(path: &Path) -> Result<Vec<u8>, LoadError> {
    let io_err = |source| LoadError::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_err)?;
    let mut program = Vec::new();
    file.take(SIZE_LIMIT).read_to_end(&mut program).map_err(io_err)?;

    if program.len() as u64 >= SIZE_LIMIT {
        return Err(LoadError::TooLarge { path: path.to_path_buf() });
    }
    tracing::debug!(path = %path.display(), len = program.len(), "program loaded");
    Ok(program)
}
