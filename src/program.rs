//! Instruction classification and the precomputed jump tables.
//!
//! [`ProgramIndex`] is built once per program and answers two questions in
//! O(1) while stepping:
//! - where is the next meaningful instruction after position `i`?
//! - where is the partner of the bracket at position `i`, if any?

/// Marker stored for positions without a bracket partner.
const NO_MATCH: u32 = u32::MAX;

/// The eight meaningful opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Increment,
    Decrement,
    Left,
    Right,
    Input,
    Output,
    LoopStart,
    LoopEnd,
}

impl Instruction {
    /// Classify a program byte; `None` means the byte is a no-op.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Instruction::Increment),
            b'-' => Some(Instruction::Decrement),
            b'<' => Some(Instruction::Left),
            b'>' => Some(Instruction::Right),
            b',' => Some(Instruction::Input),
            b'.' => Some(Instruction::Output),
            b'[' => Some(Instruction::LoopStart),
            b']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Left => '<',
            Instruction::Right => '>',
            Instruction::Input => ',',
            Instruction::Output => '.',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
        }
    }
}

/// True for the eight opcode bytes `+-<>,.[]`.
pub fn is_instruction(byte: u8) -> bool {
    Instruction::from_byte(byte).is_some()
}

/// Jump tables derived from a program, indexed by program position.
///
/// Positions are stored as `u32`; programs are capped at 2^31 bytes so the
/// one-past-end sentinel always fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIndex {
    next_exec: Vec<u32>,
    matching: Vec<u32>,
}

impl ProgramIndex {
    /// Build both tables. Unbalanced brackets are not an error here; they stay
    /// unmatched and are only reported if execution needs to jump from them.
    pub fn build(program: &[u8]) -> Self {
        let len = program.len();
        let mut matching = vec![NO_MATCH; len];

        // Forward pass: pair brackets using a local stack of open positions.
        let mut stack: Vec<u32> = Vec::new();
        for (i, &b) in program.iter().enumerate() {
            match b {
                b'[' => stack.push(i as u32),
                b']' => {
                    if let Some(open) = stack.pop() {
                        matching[i] = open;
                        matching[open as usize] = i as u32;
                    }
                }
                _ => {}
            }
        }

        // Backward pass: each slot points at the first instruction after it.
        let mut next_exec = vec![len as u32; len];
        if len > 0 {
            let mut next = len as u32;
            for i in (1..len).rev() {
                next_exec[i] = next;
                if is_instruction(program[i]) {
                    next = i as u32;
                }
            }
            next_exec[0] = next;
        }

        Self { next_exec, matching }
    }

    pub fn len(&self) -> usize {
        self.next_exec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next_exec.is_empty()
    }

    /// Smallest meaningful-instruction position strictly after `pos`, or
    /// `len()` when there is none.
    pub fn next_exec(&self, pos: usize) -> usize {
        self.next_exec[pos] as usize
    }

    /// Partner position of the bracket at `pos`.
    pub fn matching_bracket(&self, pos: usize) -> Option<usize> {
        match self.matching.get(pos) {
            Some(&m) if m != NO_MATCH => Some(m as usize),
            _ => None,
        }
    }
}
