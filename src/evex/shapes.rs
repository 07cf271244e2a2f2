//! Catalog of EVEX operand shapes.
//!
//! Function names follow the operand letters of the Intel opcode maps, the
//! same ones used in `Vol. 2, Appendix A`:
//!
//! * `V` - vector register in `ModRM.reg`
//! * `H` - vector register in `EVEX.vvvv`
//! * `W` - vector register or memory in `ModRM.rm`
//! * `E` - general purpose register or memory in `ModRM.rm`
//! * `G` - general purpose register in `ModRM.reg`
//! * `M` - memory only
//! * `K` - opmask register destination, `k` - opmask (and zeroing) on the
//!   destination
//! * `Ib` - immediate byte
//! * `_er` - `EVEX.b` selects embedded rounding or SAE on register forms
//!
//! All constructors are `const fn` so handler tables can be plain statics.

use evex::checks::Checks;
use evex::code::Code;
use evex::instr::TupleType;
use evex::register::RegClass;
use evex::shape::{CodeSel, Masking, Role, Rounding, Shape};

use self::Role::*;

const fn plain(roles: [Role; 4], code: CodeSel, tuple: TupleType) -> Shape {
    Shape {
        roles,
        code,
        tuple_w0: tuple,
        tuple_w1: tuple,
        broadcast: false,
        rounding: Rounding::Ignore,
        masking: Masking::None,
        checks: Checks::empty(),
    }
}

/// Masked shape where `b` on memory broadcasts.
const fn masked(roles: [Role; 4], code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        masking: Masking::OpmaskZeroing,
        ..plain(roles, CodeSel::Single(code), tuple)
    }
}

// GPR/vector conversions and inserts

/// `vcvtsi2ss xmm1, xmm2, r/m32{er}`
///
/// `rounding` is `Embedded`, `Sae` or `EmbeddedW1` (only the 64-bit source
/// form can round).
pub const fn v_h_ev_er(
    base: RegClass,
    w0: Code,
    w1: Code,
    tuple_w0: TupleType,
    tuple_w1: TupleType,
    rounding: Rounding,
) -> Shape {
    Shape {
        tuple_w1,
        rounding,
        checks: Checks::of(&[Checks::AAA, Checks::RM_X]),
        ..plain([Reg(base), Vvvv(base), RegMem(RegClass::Gpr), Absent], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

/// `vpinsrd xmm1, xmm2, r/m32, imm8`
pub const fn v_h_ev_ib(base: RegClass, w0: Code, w1: Code, tuple_w0: TupleType, tuple_w1: TupleType) -> Shape {
    Shape {
        tuple_w1,
        checks: Checks::of(&[Checks::B, Checks::AAA, Checks::RM_X]),
        ..plain([Reg(base), Vvvv(base), RegMem(RegClass::Gpr), Imm8], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

/// `vpextrd r/m32, xmm1, imm8`
pub const fn ed_v_ib(base: RegClass, w0: Code, w1: Code, tuple_w0: TupleType, tuple_w1: TupleType) -> Shape {
    Shape {
        tuple_w1,
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::RM_X]),
        ..plain([RegMem(RegClass::Gpr), Reg(base), Imm8, Absent], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

// Masked vector arithmetic

/// `vaddps zmm1{k1}{z}, zmm2, zmm3/m512/m32bcst{er}`
///
/// `rounding` is `Embedded` or `Sae`.
pub const fn vk_hw_er(base: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        ..masked([Reg(base), Vvvv(base), RegMem(base), Absent], code, tuple)
    }
}

/// `vsqrtps zmm1{k1}{z}, zmm2/m512/m32bcst{er}`
pub const fn vk_w_er(dst: RegClass, src: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        checks: Checks::VVVV,
        ..masked([Reg(dst), RegMem(src), Absent, Absent], code, tuple)
    }
}

/// `vrndscaleps zmm1{k1}{z}, zmm2/m512/m32bcst{sae}, imm8`
pub const fn vk_w_ib_er(base: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        checks: Checks::VVVV,
        ..masked([Reg(base), RegMem(base), Imm8, Absent], code, tuple)
    }
}

/// `vmovaps zmm1{k1}{z}, zmm2/m512`
///
/// `b` on the register form is ignored.
pub const fn vk_w(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::VVVV,
        ..masked([Reg(dst), RegMem(src), Absent, Absent], code, tuple)
    }
}

/// `vmovaps zmm2/m512{k1}{z}, zmm1`
pub const fn wk_v(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: false,
        checks: Checks::of(&[Checks::B, Checks::VVVV]),
        ..masked([RegMem(dst), Reg(src), Absent, Absent], code, tuple)
    }
}

/// `vbroadcastf32x4 zmm1{k1}{z}, m128`
pub const fn vk_m(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::VVVV,
        ..masked([Reg(base), Mem, Absent, Absent], code, tuple)
    }
}

/// `vpshufd zmm1{k1}{z}, zmm2/m512/m32bcst, imm8`
pub const fn vk_w_ib(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::VVVV,
        ..masked([Reg(dst), RegMem(src), Imm8, Absent], code, tuple)
    }
}

/// `vextractf32x4 xmm1/m128{k1}{z}, zmm2, imm8`
pub const fn wk_v_ib(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::VVVV,
        ..masked([RegMem(dst), Reg(src), Imm8, Absent], code, tuple)
    }
}

/// `vpslld zmm1{k1}{z}, zmm2/m512/m32bcst, imm8`, destination in `vvvv`.
pub const fn hk_w_ib(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    masked([Vvvv(base), RegMem(base), Imm8, Absent], code, tuple)
}

/// `vcvtps2ph ymm1/m256{k1}{z}, zmm2{sae}, imm8`
pub const fn wk_v_ib_er(dst: RegClass, src: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        checks: Checks::VVVV,
        ..masked([RegMem(dst), Reg(src), Imm8, Absent], code, tuple)
    }
}

// Unmasked scalar and move forms

/// `vucomiss xmm1, xmm2/m32{sae}`
pub const fn v_w_er(base: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        broadcast: true,
        rounding,
        checks: Checks::of(&[Checks::VVVV, Checks::AAA, Checks::Z]),
        ..plain([Reg(base), RegMem(base), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vmovq xmm1, xmm2/m64`
pub const fn v_w(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        checks: Checks::of(&[Checks::VVVV, Checks::AAA]),
        ..plain([Reg(dst), RegMem(src), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vmovq xmm1/m64, xmm2`
pub const fn w_v(dst: RegClass, src: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        checks: Checks::of(&[Checks::VVVV, Checks::AAA]),
        ..plain([RegMem(dst), Reg(src), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vmovntdqa zmm1, m512`
pub const fn v_m(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        checks: Checks::of(&[Checks::VVVV, Checks::AAA]),
        ..plain([Reg(base), Mem, Absent, Absent], CodeSel::Single(code), tuple)
    }
}

// Opmask moves

/// `vpmovm2b zmm1, k1`
pub const fn v_k(base: RegClass, code: Code) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::RM_B, Checks::RM_X]),
        ..plain([Reg(base), RegOnly(RegClass::K), Absent, Absent], CodeSel::Single(code), TupleType::None)
    }
}

/// `vpmovb2m k1, zmm1`
pub const fn kr(base: RegClass, code: Code) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::R, Checks::R2]),
        ..plain([Reg(RegClass::K), RegOnly(base), Absent, Absent], CodeSel::Single(code), TupleType::None)
    }
}

// Compares into opmask registers

/// `vcmpps k1{k2}, zmm2, zmm3/m512/m32bcst{sae}, imm8`
pub const fn kk_hw_ib(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        rounding: Rounding::Sae,
        masking: Masking::Opmask,
        checks: Checks::of(&[Checks::R, Checks::R2, Checks::OPMASK_ALIAS]),
        ..plain([Reg(RegClass::K), Vvvv(base), RegMem(base), Imm8], CodeSel::Single(code), tuple)
    }
}

/// `vpcmpeqb k1{k2}, zmm2, zmm3/m512`
pub const fn kk_hw(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        rounding: Rounding::Forbidden,
        masking: Masking::Opmask,
        checks: Checks::of(&[Checks::Z, Checks::R, Checks::R2, Checks::OPMASK_ALIAS]),
        ..plain([Reg(RegClass::K), Vvvv(base), RegMem(base), Absent], CodeSel::Single(code), tuple)
    }
}

/// `vp2intersectd k1+1, zmm2, zmm3/m512/m32bcst`, destination is a mask pair.
pub const fn kp1_hw(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        rounding: Rounding::Forbidden,
        checks: Checks::of(&[Checks::Z, Checks::AAA, Checks::R, Checks::R2]),
        ..plain([Reg(RegClass::K), Vvvv(base), RegMem(base), Absent], CodeSel::Single(code), tuple)
    }
}

/// `vpcmpud k1{k2}, zmm2, zmm3/m512/m32bcst, imm8`
pub const fn kk_hw_ib_nosae(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        roles: [Reg(RegClass::K), Vvvv(base), RegMem(base), Imm8],
        ..kk_hw(base, code, tuple)
    }
}

/// `vfpclassps k1{k2}, zmm2/m512/m32bcst, imm8`
///
/// Zeroing is recorded but the alias rule still applies.
pub const fn kk_w_ib(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::VVVV, Checks::R, Checks::R2, Checks::OPMASK_ALIAS]),
        ..masked([Reg(RegClass::K), RegMem(base), Imm8, Absent], code, tuple)
    }
}

// Three-operand vector forms

/// `vpandd zmm1{k1}{z}, zmm2, zmm3/m512/m32bcst`
pub const fn vk_hw(dst: RegClass, src1: RegClass, src2: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        rounding: Rounding::Forbidden,
        ..masked([Reg(dst), Vvvv(src1), RegMem(src2), Absent], code, tuple)
    }
}

/// `vp4dpwssd zmm1{k1}{z}, zmm2+3, m128`
pub const fn vk_hm(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    masked([Reg(base), Vvvv(base), Mem, Absent], code, tuple)
}

/// `vinsertf32x4 zmm1{k1}{z}, zmm2, xmm3/m128, imm8`
pub const fn vk_hw_ib(dst: RegClass, src1: RegClass, src2: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        rounding: Rounding::Forbidden,
        ..masked([Reg(dst), Vvvv(src1), RegMem(src2), Imm8], code, tuple)
    }
}

/// `vfixupimmps zmm1{k1}{z}, zmm2, zmm3/m512/m32bcst{sae}, imm8`
pub const fn vk_hw_ib_er(base: RegClass, code: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        ..masked([Reg(base), Vvvv(base), RegMem(base), Imm8], code, tuple)
    }
}

/// `vmovss xmm1{k1}{z}, xmm2, xmm3` (store direction)
pub const fn wk_hv(base: RegClass, code: Code) -> Shape {
    Shape {
        rounding: Rounding::Forbidden,
        ..masked([RegMem(base), Vvvv(base), Reg(base), Absent], code, TupleType::None)
    }
}

/// `vpclmulqdq zmm1, zmm2, zmm3/m512, imm8`
pub const fn v_hw_ib(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::AAA]),
        ..plain([Reg(base), Vvvv(base), RegMem(base), Imm8], CodeSel::Single(code), tuple)
    }
}

/// `vaesenc zmm1, zmm2, zmm3/m512`
///
/// `vmovhlps`/`vmovlps` share an opcode and differ by addressing form; pass
/// the same code twice for other instructions.
pub const fn v_hw(base: RegClass, reg: Code, mem: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::AAA]),
        ..plain([Reg(base), Vvvv(base), RegMem(base), Absent], CodeSel::ByMod { reg, mem }, tuple)
    }
}

/// `vmovhpd xmm1, xmm2, m64`
pub const fn v_hm(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::AAA]),
        ..plain([Reg(base), Vvvv(base), Mem, Absent], CodeSel::Single(code), tuple)
    }
}

// Vector to GPR

/// `vcvtss2si r32, xmm1/m32{er}`
pub const fn gv_w_er(base: RegClass, w0: Code, w1: Code, tuple: TupleType, rounding: Rounding) -> Shape {
    Shape {
        rounding,
        checks: Checks::of(&[Checks::VVVV, Checks::AAA, Checks::R2]),
        ..plain([Reg(RegClass::Gpr), RegMem(base), Absent, Absent], CodeSel::ByW(w0, w1), tuple)
    }
}

/// `vmovd xmm1, r/m32`
pub const fn vx_ev(w0: Code, w1: Code, tuple_w0: TupleType, tuple_w1: TupleType) -> Shape {
    Shape {
        tuple_w1,
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::RM_X]),
        ..plain([Reg(RegClass::Xmm), RegMem(RegClass::Gpr), Absent, Absent], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

/// `vmovd r/m32, xmm1`
pub const fn ev_vx(w0: Code, w1: Code, tuple_w0: TupleType, tuple_w1: TupleType) -> Shape {
    Shape {
        tuple_w1,
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::RM_X]),
        ..plain([RegMem(RegClass::Gpr), Reg(RegClass::Xmm), Absent, Absent], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

/// `vpextrw r32, xmm1, imm8`
///
/// The memory form is consumed and then rejected.
pub const fn ev_vx_ib(base: RegClass, w0: Code, w1: Code) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::R2, Checks::NO_MEMORY]),
        ..plain([Reg(RegClass::Gpr), RegMem(base), Imm8, Absent], CodeSel::ByW(w0, w1), TupleType::None)
    }
}

/// `vmovntdq m512, zmm1`
pub const fn m_v(base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA]),
        ..plain([Mem, Reg(base), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vpbroadcastd zmm1{k1}{z}, r32`
///
/// `w1` may be `Code::Invalid` when there is no 64-bit source form.
pub const fn vk_ev_rexw(base: RegClass, w0: Code, w1: Code) -> Shape {
    Shape {
        broadcast: false,
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::RM_X]),
        code: CodeSel::ByW(w0, w1),
        ..masked([Reg(base), RegOnly(RegClass::Gpr), Absent, Absent], w0, TupleType::None)
    }
}

/// `vpextrb r32/m8, xmm1, imm8`
pub const fn gvm_vx_ib(base: RegClass, w0: Code, w1: Code, tuple_w0: TupleType, tuple_w1: TupleType) -> Shape {
    Shape {
        tuple_w1,
        checks: Checks::of(&[Checks::B, Checks::VVVV, Checks::AAA, Checks::RM_X]),
        ..plain([RegMem(RegClass::Gpr), Reg(base), Imm8, Absent], CodeSel::ByW(w0, w1), tuple_w0)
    }
}

// Gather and scatter

/// `vgatherdps zmm1{k1}, vm32z`
pub const fn vk_vsib(base: RegClass, index: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        broadcast: true,
        masking: Masking::Opmask,
        checks: Checks::of(&[Checks::VVVV_LOW, Checks::Z, Checks::NEED_OPMASK, Checks::DEST_NOT_INDEX]),
        ..plain([Reg(base), Vsib(index), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vscatterdps vm32z{k1}, zmm1`
pub const fn vsib_k1_vx(index: RegClass, base: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        masking: Masking::Opmask,
        checks: Checks::of(&[Checks::B, Checks::Z, Checks::VVVV_LOW, Checks::NEED_OPMASK]),
        ..plain([Vsib(index), Reg(base), Absent, Absent], CodeSel::Single(code), tuple)
    }
}

/// `vgatherpf0dps vm32z{k1}`
pub const fn vsib_k1(index: RegClass, code: Code, tuple: TupleType) -> Shape {
    Shape {
        masking: Masking::Opmask,
        checks: Checks::of(&[Checks::B, Checks::VVVV_LOW, Checks::R, Checks::R2, Checks::OPMASK_ALIAS]),
        ..plain([Vsib(index), Absent, Absent, Absent], CodeSel::Single(code), tuple)
    }
}
