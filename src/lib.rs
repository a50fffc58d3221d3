//! A single-step Brainfuck engine.
//!
//! The engine operates on a fixed tape of zeroed cells (65,536 one-byte cells
//! by default, widths of 1, 2, 4 or 8 bytes available) and advances exactly
//! one instruction per [`Engine::step`].
//!
//! Features and behaviors:
//! - Jump tables are built once, so every step is O(1).
//! - Strict pointer bounds: moving left from cell 0 or right past the last
//!   cell yields [`Status::MemoryRangeError`] and does not consume the
//!   instruction.
//! - Unmatched brackets are accepted at load time and only fail with
//!   [`Status::BranchError`] when a jump from them is actually needed.
//! - Input `,` reads a single byte from stdin; on EOF the current cell is set
//!   to all ones (-1).
//! - Output `.` writes the low eight bits of the current cell.
//! - Any other byte is a comment.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_engine::{Engine, Status};
//!
//! let code = b"++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut bf = Engine::with_default_tape(code).expect("default tape is valid");
//! while bf.step() == Status::Normal {}
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod program;
pub mod tape;
mod theme;

pub use engine::{Engine, Status};
pub use error::{ConfigError, EngineError, LoadError};
pub use loader::load_program;
pub use program::{Instruction, ProgramIndex};
pub use tape::{CellWidth, Tape};
