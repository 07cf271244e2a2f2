//! EVEX instruction decoder.

use evex::DecodeContext;
use evex::gateway::EVEX_GATEWAY;
use evex::handler::Handler;
use evex::instr::{Instruction, MemoryOperand, TupleType};
use evex::opcodes;
use evex::prefix::EvexPrefix;
use evex::register::Register;
use evex::state::{DecodedState, DecoderOptions};
use memory::VirtualMemory;

/// Architectural limit on the length of a single instruction.
pub const MAX_INSTRUCTION_LEN: u32 = 15;

/// The escape byte that starts an EVEX instruction.
const EVEX_ESCAPE: u8 = 0x62;

/// Processor operating mode the code is decoded for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bitness {
    Bits32,
    Bits64,
}

/// EVEX machine instruction decoder.
///
/// Decoding never fails: every call to `decode_next` produces an
/// `Instruction`, which is flagged invalid if the bytes don't form a legal
/// EVEX instruction. `Instruction::len` tells how far the decoder advanced.
#[derive(Debug)]
pub struct Decoder<'a, M: VirtualMemory + 'a> {
    /// Virtual address of the next byte that will be loaded from memory.
    pos: u32,
    /// Length of the currently decoded instruction.
    len: u32,
    mem: &'a M,
    state: DecodedState,
    options: DecoderOptions,
    bitness: Bitness,
    /// Set by anything that finds the current instruction to be illegal.
    invalid: bool,
}

impl<'a, M: VirtualMemory> Decoder<'a, M> {
    /// Creates a new instruction decoder.
    ///
    /// # Parameters
    ///
    /// * `mem`: The virtual memory to read from.
    /// * `pc`: The virtual address at which to start decoding.
    /// * `bitness`: Operating mode of the code.
    pub fn new(mem: &'a M, pc: u32, bitness: Bitness) -> Self {
        Self {
            pos: pc,
            len: 0,
            mem,
            state: DecodedState::default(),
            options: DecoderOptions::empty(),
            bitness,
            invalid: false,
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the value of the program counter, the virtual address of the
    /// first byte of the next instruction we're going to decode.
    ///
    /// This is incremented as `decode_next` is called.
    pub fn current_address(&self) -> u32 {
        self.pos
    }

    pub fn bitness(&self) -> Bitness {
        self.bitness
    }

    /// Read and decode the next instruction in the stream.
    ///
    /// If the instruction runs past the end of the available memory, the
    /// missing bytes read as 0 and the instruction is invalid. Its length
    /// only counts the bytes that exist, so a length of 0 means there was
    /// nothing left to decode.
    pub fn decode_next(&mut self) -> Instruction {
        self.len = 0;
        self.invalid = false;
        self.state = DecodedState::default();

        let mut instr = Instruction::new();
        let escape = self.read_byte();
        if escape == EVEX_ESCAPE {
            let modrm = self.read_byte();
            self.state.set_modrm(modrm);
            EVEX_GATEWAY.decode(self, &mut instr);
        } else if !self.invalid {
            debug!("not an EVEX instruction: {:#04X} at {:#010X}", escape, self.pos.wrapping_sub(1));
            self.invalid = true;
        }

        if self.invalid {
            instr.set_invalid();
        }
        instr.set_len(self.len);
        instr
    }

    fn read_i32(&mut self) -> i32 {
        if self.len + 4 <= MAX_INSTRUCTION_LEN {
            if let Ok(value) = self.mem.load_i32(self.pos) {
                self.pos = self.pos.wrapping_add(4);
                self.len += 4;
                return value;
            }
        }

        // Slow path, stops at the first missing byte
        let mut value = 0u32;
        for shift in &[0, 8, 16, 24] {
            value |= (self.read_byte() as u32) << shift;
        }
        value as i32
    }

    /// Reads a ModRM memory operand. With `vsib`, the SIB index names a vector
    /// register counted from that base.
    fn read_memory(&mut self, instr: &mut Instruction, tuple: TupleType, vsib: Option<Register>) {
        let state = self.state;
        let gpr = match self.bitness {
            Bitness::Bits64 => Register::Rax,
            Bitness::Bits32 => Register::Eax,
        };

        let mut mem = MemoryOperand {
            tuple_type: tuple,
            ..MemoryOperand::default()
        };
        let mut disp_size = match state.mod_ {
            0 => 0,
            1 => 1,
            _ => 4,
        };

        if state.rm == 0b100 {
            let sib = self.read_byte() as u32;
            let (scale, index, base) = (sib >> 6, (sib >> 3) & 7, sib & 7);
            mem.scale = 1 << scale;

            let index = index + state.extra_index_register_base;
            match vsib {
                Some(index_base) => {
                    mem.index = index_base.offset(index + state.extra_index_register_base_vsib);
                }
                // this would encode esp/rsp, and means "no index"
                None if index == 0b100 => {}
                None => mem.index = gpr.offset(index),
            }

            if base == 0b101 && state.mod_ == 0 {
                disp_size = 4;
            } else {
                mem.base = gpr.offset(base + state.extra_base_register_base);
            }
        } else {
            if vsib.is_some() {
                debug!("VSIB operand without SIB byte");
                self.invalid = true;
            }

            if state.rm == 0b101 && state.mod_ == 0 {
                disp_size = 4;
                if self.bitness == Bitness::Bits64 {
                    mem.base = Register::Rip;
                }
            } else {
                mem.base = gpr.offset(state.rm + state.extra_base_register_base);
            }
        }

        match disp_size {
            1 => {
                let disp8 = self.read_byte() as i8 as i64;
                let n = tuple.disp8_scale(instr.is_broadcast()) as i64;
                mem.displacement = disp8 * n;
                mem.displ_size = 1;
            }
            4 => {
                mem.displacement = self.read_i32() as i64;
                mem.displ_size = 4;
            }
            _ => {}
        }

        *instr.memory_mut() = mem;
    }
}

impl<'a, M: VirtualMemory> DecodeContext for Decoder<'a, M> {
    fn state(&self) -> &DecodedState {
        &self.state
    }

    fn options(&self) -> DecoderOptions {
        self.options
    }

    fn is_64bit_mode(&self) -> bool {
        self.bitness == Bitness::Bits64
    }

    fn set_invalid_instruction(&mut self) {
        self.invalid = true;
    }

    /// Read a single byte from the instruction stream.
    fn read_byte(&mut self) -> u8 {
        if self.len == MAX_INSTRUCTION_LEN {
            // This would read the 16th byte, hitting the length limit.
            debug!("instruction at {:#010X} exceeds {} bytes",
                   self.pos.wrapping_sub(self.len), MAX_INSTRUCTION_LEN);
            self.invalid = true;
            return 0;
        }

        match self.mem.load(self.pos) {
            Ok(b) => {
                self.pos = self.pos.wrapping_add(1);
                self.len += 1;
                b
            }
            Err(e) => {
                debug!("out of data: {}", e);
                self.invalid = true;
                0
            }
        }
    }

    fn read_op_mem(&mut self, instr: &mut Instruction, tuple: TupleType) {
        self.read_memory(instr, tuple, None);
    }

    fn read_op_mem_vsib(&mut self, instr: &mut Instruction, index_base: Register, tuple: TupleType) {
        self.read_memory(instr, tuple, Some(index_base));
    }

    fn evex_mvex(&mut self, instr: &mut Instruction) {
        let p0 = self.state.modrm as u8;
        let p1 = self.read_byte();
        let p2 = self.read_byte();
        let prefix = EvexPrefix::new(p0, p1, p2);

        if prefix.is_mvex() {
            // Knights Corner only, the operand layout is entirely different
            debug!("MVEX encoding {:02X} {:02X} {:02X} not supported", p0, p1, p2);
            self.invalid = true;
            return;
        }

        let is_64bit = self.is_64bit_mode();
        prefix.apply(&mut self.state, is_64bit);
        let opcode = self.read_byte();
        let modrm = self.read_byte();
        self.state.set_modrm(modrm);

        let handler = match prefix.map() {
            Some(map) if prefix.reserved_bits_clear() => {
                let handler = opcodes::lookup(map, prefix.pp(), opcode, self.state.w());
                if handler.is_invalid() {
                    debug!("unsupported EVEX opcode {}.{} {:02X} W{}",
                           prefix.pp().name(), map.name(), opcode, self.state.w() as u8);
                }
                handler
            }
            _ => {
                debug!("reserved EVEX opcode map in P0 {:02X}", p0);
                &Handler::Invalid
            }
        };

        handler.decode(self, instr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evex::code::Code;
    use evex::instr::{OpKind, RoundingControl};
    use memory::ArrayMemory;

    fn decode_with(rawstr: &str, bitness: Bitness, options: DecoderOptions) -> Instruction {
        let mem = ArrayMemory::from_hex(rawstr).unwrap();
        let mut dec = Decoder::new(&mem, 0, bitness).with_options(options);
        dec.decode_next()
    }

    fn decode(rawstr: &str) -> Instruction {
        decode_with(rawstr, Bitness::Bits64, DecoderOptions::empty())
    }

    fn decodes_as(rawstr: &str, printed: &str) {
        let instr = decode(rawstr);
        assert!(!instr.is_invalid(), "{} decoded as invalid", rawstr);
        assert_eq!(instr.to_string(), printed);
        assert_eq!(instr.len() as usize, rawstr.split_whitespace().count());
    }

    fn is_invalid(rawstr: &str) -> bool {
        decode(rawstr).is_invalid()
    }

    /// Combined decoder and printer test. Expected output can be
    /// cross-checked with any AVX-512 capable disassembler.
    #[test]
    fn disassemble_smoke() {
        decodes_as("62 F1 74 48 58 C2", "vaddps zmm0,zmm1,zmm2");
        decodes_as("62 F1 74 38 58 C2", "vaddps zmm0,zmm1,zmm2,{rd-sae}");
        decodes_as("62 F1 74 58 58 C2", "vaddps zmm0,zmm1,zmm2,{ru-sae}");
        decodes_as("62 F1 74 CB 58 C2", "vaddps zmm0{k3}{z},zmm1,zmm2");
        decodes_as("62 F1 74 58 58 00", "vaddps zmm0,zmm1,[rax]{bcst}");
        decodes_as("62 01 0C 40 58 FD", "vaddps zmm31,zmm30,zmm29");
        decodes_as("62 F1 EE 78 2A C8", "vcvtsi2ss xmm1,xmm2,rax,{rz-sae}");
        decodes_as("62 F1 6F 78 2A C8", "vcvtsi2sd xmm1,xmm2,eax");
        decodes_as("62 F1 6D 48 74 CB", "vpcmpeqb k1,zmm2,zmm3");
        decodes_as("62 F1 7D 08 C5 C1 05", "vpextrw eax,xmm1,0x5");
        decodes_as("62 F2 7D 49 7C C0", "vpbroadcastd zmm0{k1},eax");
        decodes_as("62 F2 FD 49 7C C0", "vpbroadcastq zmm0{k1},rax");
        decodes_as("62 F2 7D 49 92 0C 90", "vgatherdps zmm1{k1},[rax+zmm2*4]");
        decodes_as("62 F1 7D 48 E7 08", "vmovntdq [rax],zmm1");
        decodes_as("62 F3 7D 08 16 C8 02", "vpextrd eax,xmm1,0x2");
        decodes_as("62 F1 74 19 C2 D2 00", "vcmpps k2{k1},zmm1,zmm2,0x0,{sae}");
        decodes_as("62 F1 6E 09 11 D9", "vmovss xmm1{k1},xmm2,xmm3");
        decodes_as("62 F1 7C 48 28 05 10 00 00 00", "vmovaps zmm0,[rip+0x10]");
    }

    #[test]
    fn compressed_displacement() {
        decodes_as("62 F1 74 48 58 40 01", "vaddps zmm0,zmm1,[rax+0x40]");
        decodes_as("62 F1 74 58 58 40 01", "vaddps zmm0,zmm1,[rax+0x4]{bcst}");
        decodes_as("62 F1 74 48 58 40 FF", "vaddps zmm0,zmm1,[rax-0x40]");
        decodes_as("62 F1 74 48 58 80 01 00 00 00", "vaddps zmm0,zmm1,[rax+0x1]");

        let instr = decode("62 F1 74 48 58 40 01");
        let mem = instr.memory().unwrap();
        assert_eq!(mem.displ_size, 1);
        assert_eq!(mem.tuple_type, TupleType::Full32(::evex::VectorLength::L512));
    }

    #[test]
    fn illegal_bit_patterns() {
        // opmask destination aliases the write mask
        assert!(is_invalid("62 F1 6D 49 74 CB"));
        // no 64-bit source form
        assert!(is_invalid("62 F2 FD 48 7A C0"));
        // gather destination is the index
        assert!(is_invalid("62 F2 7D 49 92 0C 88"));
        // gather without opmask
        assert!(is_invalid("62 F2 7D 48 92 0C 90"));
        // register form of a memory-only instruction
        assert!(is_invalid("62 F1 7D 48 E7 C8"));
        // reserved vector length
        assert!(is_invalid("62 F1 74 68 58 C2"));
        // W1 of a W0-only opcode
        assert!(is_invalid("62 F1 F4 48 58 C2"));
    }

    #[test]
    fn disabled_checks() {
        let instr = decode_with("62 F1 6D 49 74 CB", Bitness::Bits64, DecoderOptions::NO_INVALID_CHECK);
        assert!(!instr.is_invalid());
        assert_eq!(instr.to_string(), "vpcmpeqb k1{k1},zmm2,zmm3");

        // still invalid: wrong addressing form
        let instr = decode_with("62 F1 7D 48 E7 C8", Bitness::Bits64, DecoderOptions::NO_INVALID_CHECK);
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 6);
    }

    #[test]
    fn legacy_mode() {
        let bound = decode_with("62 00", Bitness::Bits32, DecoderOptions::empty());
        assert!(!bound.is_invalid());
        assert_eq!(bound.code(), Code::Bound);
        assert_eq!(bound.to_string(), "bound eax,[eax]");
        assert_eq!(bound.len(), 2);

        let add = decode_with("62 F1 74 48 58 C2", Bitness::Bits32, DecoderOptions::empty());
        assert_eq!(add.to_string(), "vaddps zmm0,zmm1,zmm2");

        // extension bits don't exist, W is only an opcode bit
        let add = decode_with("62 C1 0C 40 58 FD", Bitness::Bits32, DecoderOptions::empty());
        assert_eq!(add.to_string(), "vaddps zmm7,zmm6,zmm5");
        let bcst = decode_with("62 F2 FD 48 7A C0", Bitness::Bits32, DecoderOptions::empty());
        assert_eq!(bcst.to_string(), "vpbroadcastb zmm0,eax");

        let abs = decode_with("62 F1 7C 48 28 05 10 00 00 00", Bitness::Bits32, DecoderOptions::empty());
        assert_eq!(abs.to_string(), "vmovaps zmm0,[0x10]");
    }

    #[test]
    fn truncated() {
        let instr = decode("62 F1 74 48 58");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 5);

        let instr = decode("62 F1 74 48 58 80 01 00");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 8);

        let instr = decode("");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 0);
    }

    #[test]
    fn unsupported_prefixes_and_maps() {
        // MVEX
        let instr = decode("62 F1 70 48 58 C2");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 4);

        // map 0
        let instr = decode("62 F0 74 48 58 C2");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 6);

        // not EVEX at all
        let instr = decode("90");
        assert!(instr.is_invalid());
        assert_eq!(instr.len(), 1);

        assert!(is_invalid("62 F1 74 48 FF C2"));
    }

    #[test]
    fn operands() {
        let instr = decode("62 F1 74 58 58 C2");
        assert_eq!(instr.code(), Code::Vaddps512);
        assert_eq!(instr.op_count(), 3);
        assert_eq!(instr.op_kind(2), OpKind::Register);
        assert_eq!(instr.rounding_control(), RoundingControl::RoundUp);
        assert!(!instr.suppress_all_exceptions());
        assert!(!instr.is_broadcast());
        assert!(instr.memory().is_none());

        let instr = decode("62 F1 74 58 58 00");
        assert_eq!(instr.rounding_control(), RoundingControl::None);
        assert!(instr.is_broadcast());
        assert_eq!(instr.memory().map(|m| m.base), Some(Register::Rax));
    }

    #[test]
    fn length_limit() {
        let mem = ArrayMemory::new(vec![0x62; 20]);
        let mut dec = Decoder::new(&mem, 0, Bitness::Bits64);
        for _ in 0..MAX_INSTRUCTION_LEN {
            assert_eq!(dec.read_byte(), 0x62);
        }
        assert!(!dec.invalid);
        assert_eq!(dec.read_byte(), 0);
        assert!(dec.invalid);
        assert_eq!(dec.current_address(), MAX_INSTRUCTION_LEN);
    }

    #[test]
    fn stream() {
        let mem = ArrayMemory::from_hex("62 F1 74 48 58 C2 62 F1 7D 08 C5 C1 05 90").unwrap();
        let mut dec = Decoder::new(&mem, 0, Bitness::Bits64);
        assert_eq!(dec.decode_next().code(), Code::Vaddps512);
        assert_eq!(dec.current_address(), 6);
        assert_eq!(dec.decode_next().code(), Code::VpextrwR32);
        assert_eq!(dec.current_address(), 13);
        assert!(dec.decode_next().is_invalid());
        assert_eq!(dec.decode_next().len(), 0);
        assert_eq!(dec.current_address(), 14);
    }
}
