//! Scripted `DecodeContext` for handler tests.

use evex::DecodeContext;
use evex::instr::{Instruction, TupleType};
use evex::register::Register;
use evex::shape::Shape;
use evex::state::{DecodedState, DecoderOptions};

/// Serves bytes from a fixed buffer and records what handlers asked for.
///
/// The memory readers consume one byte as an 8-bit displacement and, for VSIB,
/// use it as the index register number.
#[derive(Debug)]
pub struct MockContext {
    pub state: DecodedState,
    pub options: DecoderOptions,
    pub is_64bit: bool,
    pub bytes: Vec<u8>,
    pub pos: usize,
    pub invalid: bool,
    pub mem_reads: Vec<TupleType>,
    pub vsib_bases: Vec<Register>,
    pub evex_mvex_calls: usize,
}

impl MockContext {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            state: DecodedState::default(),
            options: DecoderOptions::empty(),
            is_64bit: true,
            bytes: bytes.to_vec(),
            pos: 0,
            invalid: false,
            mem_reads: Vec::new(),
            vsib_bases: Vec::new(),
            evex_mvex_calls: 0,
        }
    }

    pub fn unchecked(mut self) -> Self {
        self.options = DecoderOptions::NO_INVALID_CHECK;
        self
    }

    pub fn bits32(mut self) -> Self {
        self.is_64bit = false;
        self
    }

    /// Runs `shape` and returns the instruction with the invalid flag applied.
    pub fn resolve(&mut self, shape: &Shape) -> Instruction {
        let mut instr = Instruction::new();
        shape.resolve(self, &mut instr);
        self.finish(instr)
    }

    pub fn finish(&self, mut instr: Instruction) -> Instruction {
        if self.invalid {
            instr.set_invalid();
        }
        instr
    }
}

impl DecodeContext for MockContext {
    fn state(&self) -> &DecodedState {
        &self.state
    }

    fn options(&self) -> DecoderOptions {
        self.options
    }

    fn is_64bit_mode(&self) -> bool {
        self.is_64bit
    }

    fn set_invalid_instruction(&mut self) {
        self.invalid = true;
    }

    fn read_byte(&mut self) -> u8 {
        match self.bytes.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                b
            }
            None => {
                self.invalid = true;
                0
            }
        }
    }

    fn read_op_mem(&mut self, instr: &mut Instruction, tuple: TupleType) {
        self.mem_reads.push(tuple);
        let disp = self.read_byte();
        let mem = instr.memory_mut();
        mem.base = Register::Rax;
        mem.displacement = disp as i8 as i64;
        mem.displ_size = 1;
        mem.tuple_type = tuple;
    }

    fn read_op_mem_vsib(&mut self, instr: &mut Instruction, index_base: Register, tuple: TupleType) {
        self.mem_reads.push(tuple);
        self.vsib_bases.push(index_base);
        let index = self.read_byte();
        let mem = instr.memory_mut();
        mem.base = Register::Rax;
        mem.index = index_base.offset(index as u32);
        mem.tuple_type = tuple;
    }

    fn evex_mvex(&mut self, _instr: &mut Instruction) {
        self.evex_mvex_calls += 1;
    }
}
