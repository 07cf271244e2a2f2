//! EVEX (AVX-512) instruction decoding.
//!
//! The interesting part lives in `shape` and `shapes`: every EVEX instruction
//! form is described by a static `Shape` value, and a single resolver turns a
//! shape plus the decoded prefix bits into a filled-in `Instruction`. Around
//! that sit the handler tree (`handler`, `gateway`) that picks a shape, and a
//! small decoder shell (`decode`, `prefix`, `opcodes`) that drives everything
//! from raw bytes.

pub mod checks;
pub mod code;
pub mod decode;
pub mod gateway;
pub mod handler;
pub mod instr;
pub mod opcodes;
pub mod prefix;
pub mod register;
pub mod shape;
pub mod shapes;
pub mod state;

#[cfg(test)]
mod mock;

pub use self::code::Code;
pub use self::decode::{Bitness, Decoder};
pub use self::instr::{Instruction, MemoryOperand, OpKind, RoundingControl, TupleType};
pub use self::register::{RegClass, Register};
pub use self::state::{DecodedState, DecoderOptions, VectorLength};

/// Services a handler needs from the decoder driving it.
///
/// The decoder owns the byte cursor and the prefix state. Handlers read the
/// state, pull trailing bytes, and report illegal encodings through
/// `set_invalid_instruction`, which never aborts decoding.
pub trait DecodeContext {
    /// Prefix and ModRM fields of the instruction being decoded.
    fn state(&self) -> &DecodedState;

    fn options(&self) -> DecoderOptions;

    fn is_64bit_mode(&self) -> bool;

    /// Flags the current instruction as invalid.
    fn set_invalid_instruction(&mut self);

    /// Consumes the next byte of the instruction.
    ///
    /// Reading past the available bytes returns 0 and flags the instruction
    /// invalid.
    fn read_byte(&mut self) -> u8;

    /// Reads the SIB byte and displacement of a ModRM memory operand into
    /// `instr`'s memory operand.
    fn read_op_mem(&mut self, instr: &mut Instruction, tuple: TupleType);

    /// Like `read_op_mem`, but the SIB index selects a vector register
    /// starting at `index_base`.
    fn read_op_mem_vsib(&mut self, instr: &mut Instruction, index_base: Register, tuple: TupleType);

    /// Continues decoding at the combined EVEX/MVEX path. The ModRM-shaped
    /// byte after `0x62` has already been consumed.
    fn evex_mvex(&mut self, instr: &mut Instruction);

    /// Whether architecturally illegal bit patterns should be flagged.
    fn checks_enabled(&self) -> bool {
        !self.options().contains(DecoderOptions::NO_INVALID_CHECK)
    }
}
