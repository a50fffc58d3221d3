//! Fixed-size memory tape with one of four cell widths.
//!
//! Cells are native signed integers and all arithmetic wraps at the cell
//! width. Indices are not bounds-checked here beyond the slice itself; the
//! engine validates the tape pointer before every access.

use std::collections::TryReserveError;

use crate::error::ConfigError;

/// Width of a single tape cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellWidth {
    W8,
    W16,
    W32,
    W64,
}

impl CellWidth {
    /// Parse a width given in bytes.
    pub fn from_bytes(bytes: u32) -> Result<Self, ConfigError> {
        match bytes {
            1 => Ok(CellWidth::W8),
            2 => Ok(CellWidth::W16),
            4 => Ok(CellWidth::W32),
            8 => Ok(CellWidth::W64),
            width => Err(ConfigError::InvalidCellWidth { width }),
        }
    }

    pub fn bytes(self) -> u32 {
        match self {
            CellWidth::W8 => 1,
            CellWidth::W16 => 2,
            CellWidth::W32 => 4,
            CellWidth::W64 => 8,
        }
    }
}

#[derive(Debug, Clone)]
enum Cells {
    W8(Vec<i8>),
    W16(Vec<i16>),
    W32(Vec<i32>),
    W64(Vec<i64>),
}

// Run `$body` with `$v` bound to the concrete cell vector.
macro_rules! with_cells {
    ($cells:expr, $v:ident => $body:expr) => {
        match $cells {
            Cells::W8($v) => $body,
            Cells::W16($v) => $body,
            Cells::W32($v) => $body,
            Cells::W64($v) => $body,
        }
    };
}

/// The zero-initialised data tape.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Cells,
}

/// Zeroed vector of `len` elements, or an error if it cannot be allocated.
pub(crate) fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, T::default());
    Ok(v)
}

impl Tape {
    /// Allocate a zeroed tape of `len` cells. Allocation failure is reported
    /// rather than aborting the process.
    pub fn new(len: usize, width: CellWidth) -> Result<Self, ConfigError> {
        let cells = match width {
            CellWidth::W8 => try_zeroed(len).map(Cells::W8),
            CellWidth::W16 => try_zeroed(len).map(Cells::W16),
            CellWidth::W32 => try_zeroed(len).map(Cells::W32),
            CellWidth::W64 => try_zeroed(len).map(Cells::W64),
        };
        let cells = cells.map_err(|_| ConfigError::AllocationFailed {
            what: "tape",
            bytes: (len as u64).saturating_mul(u64::from(width.bytes())),
        })?;
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        with_cells!(&self.cells, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> CellWidth {
        match self.cells {
            Cells::W8(_) => CellWidth::W8,
            Cells::W16(_) => CellWidth::W16,
            Cells::W32(_) => CellWidth::W32,
            Cells::W64(_) => CellWidth::W64,
        }
    }

    /// Sign-extended value of cell `index`, or `None` if it is off the tape.
    pub fn get(&self, index: usize) -> Option<i64> {
        with_cells!(&self.cells, v => v.get(index).map(|&c| i64::from(c)))
    }

    pub fn increment(&mut self, index: usize) {
        with_cells!(&mut self.cells, v => v[index] = v[index].wrapping_add(1))
    }

    pub fn decrement(&mut self, index: usize) {
        with_cells!(&mut self.cells, v => v[index] = v[index].wrapping_sub(1))
    }

    /// Store a byte read from input. End of input (`None`) stores all ones.
    pub fn store_input(&mut self, index: usize, input: Option<u8>) {
        match input {
            // Zero-extend the byte, then truncate to the cell width.
            Some(b) => with_cells!(&mut self.cells, v => v[index] = u64::from(b) as _),
            None => with_cells!(&mut self.cells, v => v[index] = -1),
        }
    }

    /// Low eight bits of cell `index`.
    pub fn low_byte(&self, index: usize) -> u8 {
        with_cells!(&self.cells, v => v[index] as u8)
    }

    pub fn is_zero(&self, index: usize) -> bool {
        with_cells!(&self.cells, v => v[index] == 0)
    }
}
