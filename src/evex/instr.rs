//! Decoded instruction record.

use evex::code::Code;
use evex::register::Register;
use evex::state::VectorLength;

use std::fmt;

/// Maximum number of explicit operands of an EVEX instruction.
pub const MAX_OPERANDS: usize = 4;

/// What an operand slot holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OpKind {
    None,
    Register,
    Memory,
    Immediate8,
}

/// Static rounding mode selected by `EVEX.L'L` when `EVEX.b` is set on a
/// register form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum RoundingControl {
    None = 0,
    RoundToNearest = 1,
    RoundDown = 2,
    RoundUp = 3,
    RoundTowardZero = 4,
}

// `embedded` relies on rounding control being the vector length plus one.
const _: [(); 1] = [(); (RoundingControl::RoundToNearest as usize == VectorLength::L128 as usize + 1) as usize];
const _: [(); 1] = [(); (RoundingControl::RoundDown as usize == VectorLength::L256 as usize + 1) as usize];
const _: [(); 1] = [(); (RoundingControl::RoundUp as usize == VectorLength::L512 as usize + 1) as usize];
const _: [(); 1] = [(); (RoundingControl::RoundTowardZero as usize == VectorLength::Unknown as usize + 1) as usize];

impl RoundingControl {
    /// Reinterprets the vector length bits as a rounding mode.
    pub fn embedded(len: VectorLength) -> Self {
        match len {
            VectorLength::L128 => RoundingControl::RoundToNearest,
            VectorLength::L256 => RoundingControl::RoundDown,
            VectorLength::L512 => RoundingControl::RoundUp,
            VectorLength::Unknown => RoundingControl::RoundTowardZero,
        }
    }

    /// Assembler suffix, `None` when no rounding is encoded.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            RoundingControl::None => None,
            RoundingControl::RoundToNearest => Some("{rn-sae}"),
            RoundingControl::RoundDown => Some("{rd-sae}"),
            RoundingControl::RoundUp => Some("{ru-sae}"),
            RoundingControl::RoundTowardZero => Some("{rz-sae}"),
        }
    }
}

/// EVEX tuple type of a memory operand.
///
/// This determines the `N` that compressed 8-bit displacements are scaled by.
/// Element sizes are in bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TupleType {
    /// Not an EVEX memory operand, displacements are not scaled.
    None,
    /// Full vector, broadcasts a 32-bit element.
    Full32(VectorLength),
    /// Full vector, broadcasts a 64-bit element.
    Full64(VectorLength),
    /// Half vector, broadcasts a 32-bit element.
    Half32(VectorLength),
    /// Full vector, no broadcast.
    FullMem(VectorLength),
    HalfMem(VectorLength),
    QuarterMem(VectorLength),
    /// A single element of the given size.
    Tuple1Scalar(u8),
    /// A single element of the given size, independent of `EVEX.W`.
    Tuple1Fixed(u8),
    /// Two elements of the given size.
    Tuple2(u8),
    Tuple4(u8),
    Tuple8(u8),
    /// Four consecutive 128-bit blocks (`4FMAPS`/`4VNNIW`).
    Tuple1_4X,
    Mem128,
}

impl TupleType {
    /// Returns the displacement scale `N` for this tuple type.
    pub fn disp8_scale(&self, broadcast: bool) -> u32 {
        fn vector_bytes(len: VectorLength) -> u32 {
            len.bits() / 8
        }

        match *self {
            TupleType::None => 1,
            TupleType::Full32(_) if broadcast => 4,
            TupleType::Full64(_) if broadcast => 8,
            TupleType::Half32(_) if broadcast => 4,
            TupleType::Full32(len) | TupleType::Full64(len) | TupleType::FullMem(len) => {
                vector_bytes(len)
            }
            TupleType::Half32(len) | TupleType::HalfMem(len) => vector_bytes(len) / 2,
            TupleType::QuarterMem(len) => vector_bytes(len) / 4,
            TupleType::Tuple1Scalar(size) | TupleType::Tuple1Fixed(size) => size as u32,
            TupleType::Tuple2(size) => 2 * size as u32,
            TupleType::Tuple4(size) => 4 * size as u32,
            TupleType::Tuple8(size) => 8 * size as u32,
            TupleType::Tuple1_4X | TupleType::Mem128 => 16,
        }
    }
}

/// A decoded memory operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemoryOperand {
    /// Base register, `Register::None` for absolute addressing.
    pub base: Register,
    /// Index register, `Register::None` if there is none. For VSIB operands
    /// this is a vector register.
    pub index: Register,
    /// 1, 2, 4 or 8.
    pub scale: u8,
    /// Sign-extended displacement, already multiplied by the tuple type's `N`
    /// for 8-bit displacements.
    pub displacement: i64,
    /// Size in bytes of the encoded displacement (0, 1 or 4).
    pub displ_size: u8,
    pub tuple_type: TupleType,
}

impl Default for MemoryOperand {
    fn default() -> Self {
        Self {
            base: Register::None,
            index: Register::None,
            scale: 1,
            displacement: 0,
            displ_size: 0,
            tuple_type: TupleType::None,
        }
    }
}

impl fmt::Display for MemoryOperand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        let mut need_plus = false;
        if self.base != Register::None {
            write!(f, "{}", self.base)?;
            need_plus = true;
        }
        if self.index != Register::None {
            if need_plus {
                write!(f, "+")?;
            }
            write!(f, "{}*{}", self.index, self.scale)?;
            need_plus = true;
        }
        if self.displacement != 0 || !need_plus {
            if self.displacement < 0 {
                write!(f, "-{:#x}", -self.displacement)?;
            } else {
                if need_plus {
                    write!(f, "+")?;
                }
                write!(f, "{:#x}", self.displacement)?;
            }
        }
        write!(f, "]")
    }
}

/// A decoded EVEX instruction.
///
/// Created empty by the caller and filled in by exactly one handler. If
/// `is_invalid` returns `true`, the encoding is illegal and the remaining
/// fields should not be trusted, though `len` still covers every byte that was
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    code: Code,
    op_count: usize,
    op_kinds: [OpKind; MAX_OPERANDS],
    op_registers: [Register; MAX_OPERANDS],
    immediate8: u8,
    memory: MemoryOperand,
    op_mask: u32,
    zeroing_masking: bool,
    broadcast: bool,
    rounding_control: RoundingControl,
    suppress_all_exceptions: bool,
    invalid: bool,
    len: u32,
}

impl Default for Instruction {
    fn default() -> Self {
        Self::new()
    }
}

impl Instruction {
    pub fn new() -> Self {
        Self {
            code: Code::Invalid,
            op_count: 0,
            op_kinds: [OpKind::None; MAX_OPERANDS],
            op_registers: [Register::None; MAX_OPERANDS],
            immediate8: 0,
            memory: MemoryOperand::default(),
            op_mask: 0,
            zeroing_masking: false,
            broadcast: false,
            rounding_control: RoundingControl::None,
            suppress_all_exceptions: false,
            invalid: false,
            len: 0,
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn mnemonic(&self) -> &'static str {
        self.code.mnemonic()
    }

    pub fn op_count(&self) -> usize {
        self.op_count
    }

    /// Kind of operand `n`. Slots past `op_count` are `OpKind::None`.
    pub fn op_kind(&self, n: usize) -> OpKind {
        self.op_kinds.get(n).cloned().unwrap_or(OpKind::None)
    }

    /// Register held by operand `n`, `Register::None` unless it's a register
    /// operand.
    pub fn op_register(&self, n: usize) -> Register {
        self.op_registers.get(n).cloned().unwrap_or(Register::None)
    }

    pub fn immediate8(&self) -> u8 {
        self.immediate8
    }

    /// The memory operand, if any slot holds one.
    pub fn memory(&self) -> Option<&MemoryOperand> {
        if self.op_kinds[..self.op_count].contains(&OpKind::Memory) {
            Some(&self.memory)
        } else {
            None
        }
    }

    /// Opmask register number, 0 if the instruction is not masked.
    pub fn op_mask(&self) -> u32 {
        self.op_mask
    }

    pub fn op_mask_register(&self) -> Option<Register> {
        match self.op_mask {
            0 => None,
            n => Some(Register::K0.offset(n)),
        }
    }

    pub fn zeroing_masking(&self) -> bool {
        self.zeroing_masking
    }

    pub fn merging_masking(&self) -> bool {
        !self.zeroing_masking
    }

    pub fn is_broadcast(&self) -> bool {
        self.broadcast
    }

    pub fn rounding_control(&self) -> RoundingControl {
        self.rounding_control
    }

    pub fn suppress_all_exceptions(&self) -> bool {
        self.suppress_all_exceptions
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Length of the encoding in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn set_code(&mut self, code: Code) {
        self.code = code;
    }

    pub(crate) fn set_op_count(&mut self, count: usize) {
        self.op_count = count;
    }

    pub(crate) fn set_register(&mut self, n: usize, reg: Register) {
        self.op_kinds[n] = OpKind::Register;
        self.op_registers[n] = reg;
    }

    pub(crate) fn set_memory_kind(&mut self, n: usize) {
        self.op_kinds[n] = OpKind::Memory;
    }

    pub(crate) fn set_immediate8(&mut self, n: usize, imm: u8) {
        self.op_kinds[n] = OpKind::Immediate8;
        self.immediate8 = imm;
    }

    pub(crate) fn memory_mut(&mut self) -> &mut MemoryOperand {
        &mut self.memory
    }

    pub(crate) fn set_op_mask(&mut self, aaa: u32) {
        self.op_mask = aaa;
    }

    pub(crate) fn set_zeroing_masking(&mut self) {
        self.zeroing_masking = true;
    }

    pub(crate) fn set_broadcast(&mut self) {
        self.broadcast = true;
    }

    pub(crate) fn set_rounding_control(&mut self, rc: RoundingControl) {
        self.rounding_control = rc;
    }

    pub(crate) fn set_suppress_all_exceptions(&mut self) {
        self.suppress_all_exceptions = true;
    }

    pub(crate) fn set_invalid(&mut self) {
        self.invalid = true;
    }

    pub(crate) fn set_len(&mut self, len: u32) {
        self.len = len;
    }
}

/// Prints a plain Intel-style rendering, mostly for debugging and the command
/// line tools. Invalid instructions print as `(bad)`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.invalid {
            return f.write_str(Code::Invalid.mnemonic());
        }

        f.write_str(self.mnemonic())?;
        for n in 0..self.op_count {
            f.write_str(if n == 0 { " " } else { "," })?;
            match self.op_kinds[n] {
                OpKind::Register => write!(f, "{}", self.op_registers[n])?,
                OpKind::Memory => {
                    write!(f, "{}", self.memory)?;
                    if self.broadcast {
                        f.write_str("{bcst}")?;
                    }
                }
                OpKind::Immediate8 => write!(f, "{:#x}", self.immediate8)?,
                OpKind::None => {}
            }
            if n == 0 {
                if let Some(k) = self.op_mask_register() {
                    write!(f, "{{{}}}", k)?;
                }
                if self.zeroing_masking {
                    f.write_str("{z}")?;
                }
            }
        }
        if let Some(rc) = self.rounding_control.suffix() {
            write!(f, ",{}", rc)?;
        } else if self.suppress_all_exceptions {
            f.write_str(",{sae}")?;
        }
        Ok(())
    }
}
