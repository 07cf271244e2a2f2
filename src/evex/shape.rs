//! Operand shapes and the resolver that applies them.
//!
//! A `Shape` is plain data: which operand comes from which field, which
//! register class it names, how the instruction code depends on `W`, and what
//! `b`, `aaa` and `z` mean for it. `Shape::resolve` is the only code that
//! interprets shapes.

use evex::DecodeContext;
use evex::checks::Checks;
use evex::code::Code;
use evex::instr::{Instruction, RoundingControl, TupleType, MAX_OPERANDS};
use evex::register::{RegClass, Register};
use evex::state::DecodedState;

/// Where an operand comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    /// End of the operand list.
    Absent,
    /// `ModRM.reg` extended by `R` (and `R'` for vector registers).
    Reg(RegClass),
    /// `EVEX.vvvv`, no further extension.
    Vvvv(RegClass),
    /// `ModRM.rm` as a register when `mod == 3`, memory otherwise.
    RegMem(RegClass),
    /// `ModRM.rm`, which must be a register.
    RegOnly(RegClass),
    /// `ModRM.rm`, which must be memory.
    Mem,
    /// VSIB memory operand, the index selecting a register of the class.
    Vsib(RegClass),
    /// Trailing immediate byte.
    Imm8,
}

/// How the instruction code is picked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodeSel {
    Single(Code),
    /// W0 and W1 forms. W1 is only taken in 64-bit mode, where it also widens
    /// `RegClass::Gpr` operands to 64 bits.
    ByW(Code, Code),
    /// Register and memory forms with different mnemonics.
    ByMod { reg: Code, mem: Code },
}

impl CodeSel {
    pub fn select(&self, wide: bool, register_form: bool) -> Code {
        match *self {
            CodeSel::Single(code) => code,
            CodeSel::ByW(w0, w1) => if wide { w1 } else { w0 },
            CodeSel::ByMod { reg, mem } => if register_form { reg } else { mem },
        }
    }
}

/// Meaning of `EVEX.b` on the register form of the `RegMem` operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rounding {
    /// `b` has no effect.
    Ignore,
    /// `b` selects static rounding, `L'L` becomes the rounding mode.
    Embedded,
    /// Like `Embedded`, but only for the W1 form in 64-bit mode.
    EmbeddedW1,
    /// `b` suppresses all exceptions.
    Sae,
    /// `b` makes the encoding illegal.
    Forbidden,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Masking {
    None,
    /// Opmask, merge masking only.
    Opmask,
    /// Opmask with optional zeroing.
    OpmaskZeroing,
}

/// Static description of one EVEX operand form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shape {
    pub roles: [Role; MAX_OPERANDS],
    pub code: CodeSel,
    pub tuple_w0: TupleType,
    pub tuple_w1: TupleType,
    /// Whether `b` on a memory operand means broadcast.
    pub broadcast: bool,
    pub rounding: Rounding,
    pub masking: Masking,
    pub checks: Checks,
}

impl Shape {
    /// Fills in `instr` from the context's prefix state, consuming trailing
    /// memory operand and immediate bytes.
    ///
    /// Illegal encodings are reported through the context and never cut
    /// decoding short, so the cursor always ends up behind the instruction.
    pub fn resolve<C: DecodeContext + ?Sized>(&self, ctx: &mut C, instr: &mut Instruction) {
        let state = *ctx.state();
        let checked = ctx.checks_enabled();
        let wide = state.w() && ctx.is_64bit_mode();

        if checked {
            let violated = self.checks.violations(&state);
            if !violated.is_empty() {
                trace!("illegal EVEX bits {:?} for {:?}", violated, self.code);
                ctx.set_invalid_instruction();
            }
        }

        let code = self.code.select(wide, state.is_register_form());
        instr.set_code(code);
        if code == Code::Invalid {
            ctx.set_invalid_instruction();
        }
        let tuple = if wide { self.tuple_w1 } else { self.tuple_w0 };

        let mut count = 0;
        for (n, role) in self.roles.iter().enumerate() {
            match *role {
                Role::Absent => break,
                Role::Reg(class) => {
                    let num = state.reg + class.reg_extension(&state);
                    instr.set_register(n, class.base(wide).offset(num));
                }
                Role::Vvvv(class) => {
                    instr.set_register(n, class.base(wide).offset(state.vvvv));
                }
                Role::RegMem(class) => {
                    if state.is_register_form() {
                        instr.set_register(n, rm_register(class, wide, &state));
                        self.apply_rounding(ctx, &state, wide, checked, instr);
                    } else {
                        self.read_memory(ctx, &state, checked, n, tuple, instr);
                    }
                }
                Role::RegOnly(class) => {
                    if state.is_register_form() {
                        instr.set_register(n, rm_register(class, wide, &state));
                    } else {
                        ctx.set_invalid_instruction();
                    }
                }
                Role::Mem => {
                    if state.is_register_form() {
                        ctx.set_invalid_instruction();
                    } else {
                        self.read_memory(ctx, &state, checked, n, tuple, instr);
                    }
                }
                Role::Vsib(index) => {
                    if state.is_register_form() {
                        ctx.set_invalid_instruction();
                    } else {
                        instr.set_memory_kind(n);
                        if state.b() && self.broadcast {
                            instr.set_broadcast();
                        }
                        ctx.read_op_mem_vsib(instr, index.base(wide), tuple);
                        if checked && self.checks.contains(Checks::DEST_NOT_INDEX) {
                            self.check_dest_index(ctx, &state, instr);
                        }
                    }
                }
                Role::Imm8 => {
                    let imm = ctx.read_byte();
                    instr.set_immediate8(n, imm);
                }
            }
            count = n + 1;
        }
        instr.set_op_count(count);

        self.apply_masking(ctx, &state, checked, instr);
    }

    fn read_memory<C: DecodeContext + ?Sized>(
        &self,
        ctx: &mut C,
        state: &DecodedState,
        checked: bool,
        n: usize,
        tuple: TupleType,
        instr: &mut Instruction,
    ) {
        instr.set_memory_kind(n);
        if state.b() && self.broadcast {
            instr.set_broadcast();
        }
        ctx.read_op_mem(instr, tuple);
        if checked && self.checks.contains(Checks::NO_MEMORY) {
            ctx.set_invalid_instruction();
        }
    }

    fn apply_rounding<C: DecodeContext + ?Sized>(
        &self,
        ctx: &mut C,
        state: &DecodedState,
        wide: bool,
        checked: bool,
        instr: &mut Instruction,
    ) {
        if !state.b() {
            return;
        }

        match self.rounding {
            Rounding::Ignore => {}
            Rounding::EmbeddedW1 if !wide => {}
            Rounding::Embedded | Rounding::EmbeddedW1 => {
                instr.set_rounding_control(RoundingControl::embedded(state.vector_length));
            }
            Rounding::Sae => instr.set_suppress_all_exceptions(),
            Rounding::Forbidden => if checked {
                ctx.set_invalid_instruction();
            },
        }
    }

    fn apply_masking<C: DecodeContext + ?Sized>(
        &self,
        ctx: &mut C,
        state: &DecodedState,
        checked: bool,
        instr: &mut Instruction,
    ) {
        match self.masking {
            Masking::None => {}
            Masking::Opmask => instr.set_op_mask(state.aaa),
            Masking::OpmaskZeroing => {
                instr.set_op_mask(state.aaa);
                if state.z() {
                    if state.aaa != 0 || !checked {
                        instr.set_zeroing_masking();
                    } else {
                        trace!("zeroing without an opmask");
                        ctx.set_invalid_instruction();
                    }
                }
            }
        }
    }

    /// Gathers may not write the register they index with.
    fn check_dest_index<C: DecodeContext + ?Sized>(
        &self,
        ctx: &mut C,
        state: &DecodedState,
        instr: &Instruction,
    ) {
        let dest = state.reg + state.extra_register_base + state.extra_register_base_evex;
        let index = instr.memory().map(|mem| mem.index).unwrap_or(Register::None);
        if index.is_vector() && index.number() == dest {
            trace!("gather destination {} is also the index", index);
            ctx.set_invalid_instruction();
        }
    }
}

fn rm_register(class: RegClass, wide: bool, state: &DecodedState) -> Register {
    class.base(wide).offset(state.rm + class.rm_extension(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evex::instr::OpKind;
    use evex::mock::MockContext;
    use evex::state::{StateFlags, VectorLength};
    use evex::shapes;

    fn masked_move() -> Shape {
        shapes::vk_w(RegClass::Xmm, RegClass::Xmm, Code::Vmovaps128,
                     TupleType::FullMem(VectorLength::L128))
    }

    #[test]
    fn masked_register_move() {
        let mut ctx = MockContext::new(&[]);
        ctx.state.set_modrm(0b11_010_101);
        ctx.state.aaa = 3;
        ctx.state.flags = StateFlags::Z;

        let instr = ctx.resolve(&masked_move());
        assert!(!instr.is_invalid());
        assert_eq!(instr.op_count(), 2);
        assert_eq!(instr.op_register(0), Register::Xmm2);
        assert_eq!(instr.op_register(1), Register::Xmm5);
        assert_eq!(instr.op_mask(), 3);
        assert!(instr.zeroing_masking());
        assert_eq!(ctx.pos, 0);
    }

    #[test]
    fn zeroing_needs_opmask() {
        let mut ctx = MockContext::new(&[]);
        ctx.state.set_modrm(0b11_010_101);
        ctx.state.aaa = 0;
        ctx.state.flags = StateFlags::Z;
        let instr = ctx.resolve(&masked_move());
        assert!(instr.is_invalid());
        assert!(!instr.zeroing_masking());

        let mut ctx = MockContext::new(&[]).unchecked();
        ctx.state.set_modrm(0b11_010_101);
        ctx.state.flags = StateFlags::Z;
        let instr = ctx.resolve(&masked_move());
        assert!(!instr.is_invalid());
        assert!(instr.zeroing_masking());
    }

    #[test]
    fn embedded_rounding_reuses_length() {
        let shape = shapes::vk_hw_er(RegClass::Zmm, Code::Vaddps512,
                                     TupleType::Full32(VectorLength::L512), Rounding::Embedded);
        for &(len, rc) in &[(VectorLength::L128, RoundingControl::RoundToNearest),
                            (VectorLength::L256, RoundingControl::RoundDown),
                            (VectorLength::L512, RoundingControl::RoundUp),
                            (VectorLength::Unknown, RoundingControl::RoundTowardZero)] {
            let mut ctx = MockContext::new(&[]);
            ctx.state.set_modrm(0xC2);
            ctx.state.flags = StateFlags::B;
            ctx.state.vector_length = len;
            let instr = ctx.resolve(&shape);
            assert_eq!(instr.rounding_control(), rc);
            assert!(!instr.suppress_all_exceptions());
            assert!(!instr.is_broadcast());
            assert!(!instr.is_invalid());
        }
    }

    #[test]
    fn b_on_memory_broadcasts() {
        let shape = shapes::vk_hw_er(RegClass::Zmm, Code::Vaddps512,
                                     TupleType::Full32(VectorLength::L512), Rounding::Embedded);
        let mut ctx = MockContext::new(&[]);
        ctx.state.set_modrm(0x00);
        ctx.state.flags = StateFlags::B;
        ctx.state.vector_length = VectorLength::L512;
        let instr = ctx.resolve(&shape);
        assert!(instr.is_broadcast());
        assert_eq!(instr.rounding_control(), RoundingControl::None);
        assert_eq!(instr.op_kind(2), OpKind::Memory);
        assert_eq!(ctx.mem_reads, vec![TupleType::Full32(VectorLength::L512)]);
    }

    #[test]
    fn register_arithmetic() {
        let shape = masked_move();
        for reg in 0..8 {
            for &r in &[0, 8] {
                for &r2 in &[0, 16] {
                    let mut ctx = MockContext::new(&[]);
                    ctx.state.set_modrm(0b11_000_000 | (reg << 3) as u8);
                    ctx.state.extra_register_base = r;
                    ctx.state.extra_register_base_evex = r2;
                    let instr = ctx.resolve(&shape);
                    let dest = instr.op_register(0);
                    assert_eq!(dest, Register::Xmm0.offset(reg + r + r2));
                    assert_eq!(dest.class(), Some(RegClass::Xmm));
                }
            }
        }
    }

    #[test]
    fn opmask_operands_ignore_extensions() {
        let shape = shapes::kr(RegClass::Zmm, Code::Vpmovb2m512);
        let mut ctx = MockContext::new(&[]).unchecked();
        ctx.state.set_modrm(0b11_101_011);
        ctx.state.extra_register_base = 8;
        ctx.state.extra_register_base_evex = 16;
        ctx.state.extra_base_register_base_evex = 16;
        let instr = ctx.resolve(&shape);
        assert_eq!(instr.op_register(0), Register::K5);
        assert_eq!(instr.op_register(1), Register::Zmm19);
    }

    #[test]
    fn check_toggling_keeps_cursor() {
        let shape = shapes::vk_w_ib(RegClass::Xmm, RegClass::Xmm, Code::Vpshufd128,
                                    TupleType::Full32(VectorLength::L128));
        let run = |ctx: MockContext| {
            let mut ctx = ctx;
            ctx.state.set_modrm(0x08);
            ctx.state.vvvv = 5;
            let instr = ctx.resolve(&shape);
            (instr, ctx.pos)
        };

        let (checked, checked_pos) = run(MockContext::new(&[0x11, 0x22]));
        let (unchecked, unchecked_pos) = run(MockContext::new(&[0x11, 0x22]).unchecked());
        assert!(checked.is_invalid());
        assert!(!unchecked.is_invalid());
        assert_eq!(checked_pos, unchecked_pos);
        // one byte of displacement from the mock reader, one immediate
        assert_eq!(checked_pos, 2);
        assert_eq!(checked.immediate8(), 0x22);
    }

    #[test]
    fn memory_only_roles() {
        let shape = shapes::vk_m(RegClass::Zmm, Code::Vbroadcastf32x4Zmm, TupleType::Tuple4(4));
        let mut ctx = MockContext::new(&[]).unchecked();
        ctx.state.set_modrm(0xC0);
        let instr = ctx.resolve(&shape);
        // the wrong addressing form is never excused
        assert!(instr.is_invalid());
        assert!(ctx.mem_reads.is_empty());
    }

    #[test]
    fn w1_code_can_be_invalid() {
        let shape = shapes::vk_ev_rexw(RegClass::Zmm, Code::Vpbroadcastb512, Code::Invalid);
        let mut ctx = MockContext::new(&[]).unchecked();
        ctx.state.set_modrm(0xC0);
        ctx.state.flags = StateFlags::W;
        let instr = ctx.resolve(&shape);
        assert!(instr.is_invalid());

        let mut ctx = MockContext::new(&[]).bits32();
        ctx.state.set_modrm(0xC0);
        ctx.state.flags = StateFlags::W;
        let instr = ctx.resolve(&shape);
        assert!(!instr.is_invalid());
        assert_eq!(instr.code(), Code::Vpbroadcastb512);
        assert_eq!(instr.op_register(1), Register::Eax);
    }
}
