//! The execution engine.
//!
//! An [`Engine`] owns one program, its [`ProgramIndex`] and a [`Tape`]. Each
//! call to [`Engine::step`] consumes at most one instruction and reports a
//! [`Status`]; [`Engine::run`] is the host loop that steps until something
//! other than [`Status::Normal`] comes back.
//!
//! Behaviors:
//! - Bytes other than `+-<>,.[]` are no-ops; after any instruction the engine
//!   jumps straight to the next meaningful one.
//! - The tape pointer is checked before every access; leaving the tape is a
//!   [`Status::MemoryRangeError`] and the instruction is not consumed.
//! - An unmatched bracket is only an error when its branch is taken.
//! - `,` stores the input byte, or all ones for the cell width on EOF.
//! - `.` writes the low eight bits of the current cell.

use std::fmt;
use std::io::{self, ErrorKind, Read, Write};

use crate::error::{ConfigError, EngineError};
use crate::program::{Instruction, ProgramIndex};
use crate::tape::{CellWidth, Tape};

/// Programs and tapes are both capped at 2^31 bytes.
pub const SIZE_LIMIT: u64 = 1 << 31;

/// Tape length used when the host does not choose one.
pub const DEFAULT_CELLS: u32 = 0x10000;

/// Cell width in bytes used when the host does not choose one.
pub const DEFAULT_CELL_WIDTH: u32 = 1;

/// Outcome of a single [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Keep stepping.
    Normal,
    /// The instruction pointer ran off the end of the program.
    Exit,
    /// The tape pointer was, or would have become, out of range.
    MemoryRangeError,
    /// A bracket had to jump but has no partner.
    BranchError,
}

impl Status {
    /// Anything but `Normal` ends a run.
    pub fn is_terminal(self) -> bool {
        self != Status::Normal
    }

    pub fn is_error(self) -> bool {
        matches!(self, Status::MemoryRangeError | Status::BranchError)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Normal => "normal",
            Status::Exit => "exit",
            Status::MemoryRangeError => "memory range error",
            Status::BranchError => "branch error",
        };
        f.write_str(s)
    }
}

type OutputSink = Box<dyn FnMut(u8) + Send>;
type InputProvider = Box<dyn FnMut() -> Option<u8> + Send>;

/// Interpreter state for one program.
pub struct Engine {
    program: Vec<u8>,
    index: ProgramIndex,
    tape: Tape,
    ip: usize,
    ptr: usize,
    // Optional hooks; stdin/stdout are used when unset.
    output_sink: Option<OutputSink>,
    input_provider: Option<InputProvider>,
}

impl Engine {
    /// Build an engine for `program` with a zeroed tape of `cells` cells,
    /// each `cell_width` bytes wide.
    pub fn new(program: &[u8], cells: u32, cell_width: u32) -> Result<Self, ConfigError> {
        let width = CellWidth::from_bytes(cell_width)?;
        if program.len() as u64 > SIZE_LIMIT {
            return Err(ConfigError::ProgramTooLarge { len: program.len() });
        }
        if u64::from(cells) * u64::from(cell_width) > SIZE_LIMIT {
            return Err(ConfigError::TapeTooLarge { cells, width: cell_width });
        }

        let tape = Tape::new(cells as usize, width)?;
        let mut copy = Vec::new();
        copy.try_reserve_exact(program.len()).map_err(|_| ConfigError::AllocationFailed {
            what: "program",
            bytes: program.len() as u64,
        })?;
        copy.extend_from_slice(program);

        let index = ProgramIndex::build(program);
        tracing::debug!(
            program_len = program.len(),
            cells,
            cell_width,
            "engine constructed"
        );

        Ok(Self {
            program: copy,
            index,
            tape,
            ip: 0,
            ptr: 0,
            output_sink: None,
            input_provider: None,
        })
    }

    /// Build an engine with the default 65536 one-byte cells.
    pub fn with_default_tape(program: &[u8]) -> Result<Self, ConfigError> {
        Self::new(program, DEFAULT_CELLS, DEFAULT_CELL_WIDTH)
    }

    /// Provide an output sink. When set, `.` hands each byte to the sink
    /// instead of writing to stdout.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Provide an input provider. When set, `,` reads from it instead of
    /// stdin. Returning `None` signals end of input.
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: FnMut() -> Option<u8> + Send + 'static,
    {
        self.input_provider = Some(Box::new(provider));
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn index(&self) -> &ProgramIndex {
        &self.index
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    pub fn tape_pointer(&self) -> usize {
        self.ptr
    }

    /// Execute at most one instruction.
    ///
    /// Returns `Exit` once the instruction pointer is past the end, and keeps
    /// returning it on further calls. On `MemoryRangeError` or `BranchError`
    /// the instruction pointer is left on the failing instruction.
    pub fn step(&mut self) -> Status {
        let len = self.program.len();
        if self.ip >= len {
            return Status::Exit;
        }

        let mut next_ip = self.index.next_exec(self.ip);

        if let Some(op) = Instruction::from_byte(self.program[self.ip]) {
            // Everything but pointer moves touches the current cell.
            let touches_cell = !matches!(op, Instruction::Left | Instruction::Right);
            if touches_cell && self.ptr >= self.tape.len() {
                return Status::MemoryRangeError;
            }

            match op {
                Instruction::Increment => self.tape.increment(self.ptr),
                Instruction::Decrement => self.tape.decrement(self.ptr),
                Instruction::Left => {
                    if self.ptr == 0 {
                        return Status::MemoryRangeError;
                    }
                    self.ptr -= 1;
                }
                Instruction::Right => {
                    if self.ptr + 1 >= self.tape.len() {
                        return Status::MemoryRangeError;
                    }
                    self.ptr += 1;
                }
                Instruction::Input => {
                    let input = self.read_input();
                    self.tape.store_input(self.ptr, input);
                }
                Instruction::Output => {
                    let byte = self.tape.low_byte(self.ptr);
                    self.write_output(byte);
                }
                Instruction::LoopStart => {
                    if self.tape.is_zero(self.ptr) {
                        let Some(end) = self.index.matching_bracket(self.ip) else {
                            return Status::BranchError;
                        };
                        next_ip = self.index.next_exec(end);
                    }
                }
                Instruction::LoopEnd => {
                    if !self.tape.is_zero(self.ptr) {
                        let Some(start) = self.index.matching_bracket(self.ip) else {
                            return Status::BranchError;
                        };
                        next_ip = self.index.next_exec(start);
                    }
                }
            }
        }

        self.ip = next_ip;
        if self.ip < len { Status::Normal } else { Status::Exit }
    }

    /// Step until the program exits or fails.
    ///
    /// Returns `Ok(())` on `Exit` or an [`EngineError`] describing the failing
    /// instruction. Buffered output is flushed either way.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let mut steps: u64 = 0;
        let status = loop {
            let status = self.step();
            if status.is_terminal() {
                break status;
            }
            steps += 1;
        };
        self.flush_output();
        tracing::debug!(steps, %status, ip = self.ip, ptr = self.ptr, "run finished");

        let op = self
            .program
            .get(self.ip)
            .and_then(|&b| Instruction::from_byte(b))
            .map(Instruction::as_char)
            .unwrap_or('?');
        match status {
            Status::MemoryRangeError => Err(EngineError::MemoryRange { ip: self.ip, ptr: self.ptr, op }),
            Status::BranchError => Err(EngineError::Branch { ip: self.ip, op }),
            Status::Normal | Status::Exit => Ok(()),
        }
    }

    fn read_input(&mut self) -> Option<u8> {
        if let Some(provider) = self.input_provider.as_mut() {
            return provider();
        }

        // Make pending output visible before blocking on input.
        self.flush_output();
        let mut buf = [0u8; 1];
        loop {
            match io::stdin().read(&mut buf) {
                Ok(0) => return None,
                Ok(_) => return Some(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed; treating as end of input");
                    return None;
                }
            }
        }
    }

    fn write_output(&mut self, byte: u8) {
        if let Some(sink) = self.output_sink.as_mut() {
            sink(byte);
            return;
        }
        if let Err(e) = io::stdout().write_all(&[byte]) {
            tracing::warn!(error = %e, "stdout write failed; byte dropped");
        }
    }

    fn flush_output(&self) {
        if self.output_sink.is_none() {
            if let Err(e) = io::stdout().flush() {
                tracing::warn!(error = %e, "stdout flush failed");
            }
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("program_len", &self.program.len())
            .field("cells", &self.tape.len())
            .field("width", &self.tape.width())
            .field("ip", &self.ip)
            .field("ptr", &self.ptr)
            .finish_non_exhaustive()
    }
}
