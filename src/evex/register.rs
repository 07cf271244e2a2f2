//! Register file and register classes.

use evex::state::DecodedState;

use num_traits::FromPrimitive;
use std::fmt;

/// Every register an EVEX operand can name.
///
/// Registers of one class are contiguous and ordered by their encoding, so a
/// register number is always `class base + field + extension bits`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum Register {
    None = 0,

    Eax, Ecx, Edx, Ebx, Esp, Ebp, Esi, Edi,
    R8d, R9d, R10d, R11d, R12d, R13d, R14d, R15d,

    Rax, Rcx, Rdx, Rbx, Rsp, Rbp, Rsi, Rdi,
    R8, R9, R10, R11, R12, R13, R14, R15,

    Eip,
    Rip,

    Xmm0, Xmm1, Xmm2, Xmm3, Xmm4, Xmm5, Xmm6, Xmm7,
    Xmm8, Xmm9, Xmm10, Xmm11, Xmm12, Xmm13, Xmm14, Xmm15,
    Xmm16, Xmm17, Xmm18, Xmm19, Xmm20, Xmm21, Xmm22, Xmm23,
    Xmm24, Xmm25, Xmm26, Xmm27, Xmm28, Xmm29, Xmm30, Xmm31,

    Ymm0, Ymm1, Ymm2, Ymm3, Ymm4, Ymm5, Ymm6, Ymm7,
    Ymm8, Ymm9, Ymm10, Ymm11, Ymm12, Ymm13, Ymm14, Ymm15,
    Ymm16, Ymm17, Ymm18, Ymm19, Ymm20, Ymm21, Ymm22, Ymm23,
    Ymm24, Ymm25, Ymm26, Ymm27, Ymm28, Ymm29, Ymm30, Ymm31,

    Zmm0, Zmm1, Zmm2, Zmm3, Zmm4, Zmm5, Zmm6, Zmm7,
    Zmm8, Zmm9, Zmm10, Zmm11, Zmm12, Zmm13, Zmm14, Zmm15,
    Zmm16, Zmm17, Zmm18, Zmm19, Zmm20, Zmm21, Zmm22, Zmm23,
    Zmm24, Zmm25, Zmm26, Zmm27, Zmm28, Zmm29, Zmm30, Zmm31,

    K0, K1, K2, K3, K4, K5, K6, K7,
}

static GPR32_NAMES: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi",
    "r8d", "r9d", "r10d", "r11d", "r12d", "r13d", "r14d", "r15d",
];

static GPR64_NAMES: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi",
    "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
];

static XMM_NAMES: [&str; 32] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7",
    "xmm8", "xmm9", "xmm10", "xmm11", "xmm12", "xmm13", "xmm14", "xmm15",
    "xmm16", "xmm17", "xmm18", "xmm19", "xmm20", "xmm21", "xmm22", "xmm23",
    "xmm24", "xmm25", "xmm26", "xmm27", "xmm28", "xmm29", "xmm30", "xmm31",
];

static YMM_NAMES: [&str; 32] = [
    "ymm0", "ymm1", "ymm2", "ymm3", "ymm4", "ymm5", "ymm6", "ymm7",
    "ymm8", "ymm9", "ymm10", "ymm11", "ymm12", "ymm13", "ymm14", "ymm15",
    "ymm16", "ymm17", "ymm18", "ymm19", "ymm20", "ymm21", "ymm22", "ymm23",
    "ymm24", "ymm25", "ymm26", "ymm27", "ymm28", "ymm29", "ymm30", "ymm31",
];

static ZMM_NAMES: [&str; 32] = [
    "zmm0", "zmm1", "zmm2", "zmm3", "zmm4", "zmm5", "zmm6", "zmm7",
    "zmm8", "zmm9", "zmm10", "zmm11", "zmm12", "zmm13", "zmm14", "zmm15",
    "zmm16", "zmm17", "zmm18", "zmm19", "zmm20", "zmm21", "zmm22", "zmm23",
    "zmm24", "zmm25", "zmm26", "zmm27", "zmm28", "zmm29", "zmm30", "zmm31",
];

static K_NAMES: [&str; 8] = ["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"];

impl Register {
    /// Returns the register `n` places after `self`.
    ///
    /// Stepping past the last register yields `Register::None`. Callers only
    /// ever get there on encodings that are already flagged invalid.
    pub fn offset(self, n: u32) -> Register {
        Register::from_u32(self as u32 + n).unwrap_or(Register::None)
    }

    /// The class this register belongs to, `None` for `Register::None` and
    /// the instruction pointers.
    pub fn class(self) -> Option<RegClass> {
        let r = self as u32;
        Some(match self {
            _ if r >= Register::K0 as u32 => RegClass::K,
            _ if r >= Register::Zmm0 as u32 => RegClass::Zmm,
            _ if r >= Register::Ymm0 as u32 => RegClass::Ymm,
            _ if r >= Register::Xmm0 as u32 => RegClass::Xmm,
            Register::None | Register::Eip | Register::Rip => return None,
            _ if r >= Register::Rax as u32 => RegClass::Gpr64,
            _ => RegClass::Gpr32,
        })
    }

    /// The register's index inside its class (`zmm17` is 17).
    pub fn number(self) -> u32 {
        match self.class() {
            Some(class) => self as u32 - class.first() as u32,
            None => 0,
        }
    }

    pub fn is_vector(self) -> bool {
        match self.class() {
            Some(RegClass::Xmm) | Some(RegClass::Ymm) | Some(RegClass::Zmm) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        let n = self.number() as usize;
        match self.class() {
            Some(RegClass::Gpr32) => GPR32_NAMES[n],
            Some(RegClass::Gpr64) | Some(RegClass::Gpr) => GPR64_NAMES[n],
            Some(RegClass::Xmm) => XMM_NAMES[n],
            Some(RegClass::Ymm) => YMM_NAMES[n],
            Some(RegClass::Zmm) => ZMM_NAMES[n],
            Some(RegClass::K) => K_NAMES[n],
            None => match *self {
                Register::Eip => "eip",
                Register::Rip => "rip",
                _ => "(none)",
            },
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A register base an operand role adds its field value to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegClass {
    Gpr32,
    Gpr64,
    /// General purpose register sized by `EVEX.W`: 64-bit when W is set in
    /// 64-bit mode, 32-bit otherwise.
    Gpr,
    Xmm,
    Ymm,
    Zmm,
    /// Opmask registers `k0`-`k7`.
    K,
}

impl RegClass {
    fn first(self) -> Register {
        match self {
            RegClass::Gpr32 => Register::Eax,
            RegClass::Gpr64 | RegClass::Gpr => Register::Rax,
            RegClass::Xmm => Register::Xmm0,
            RegClass::Ymm => Register::Ymm0,
            RegClass::Zmm => Register::Zmm0,
            RegClass::K => Register::K0,
        }
    }

    /// The first register of the class once `W` has been taken into account.
    pub fn base(self, wide: bool) -> Register {
        match self {
            RegClass::Gpr if !wide => Register::Eax,
            _ => self.first(),
        }
    }

    /// Number of registers in the class.
    pub fn len(self) -> u32 {
        match self {
            RegClass::Gpr32 | RegClass::Gpr64 | RegClass::Gpr => 16,
            RegClass::Xmm | RegClass::Ymm | RegClass::Zmm => 32,
            RegClass::K => 8,
        }
    }

    pub fn is_vector(self) -> bool {
        match self {
            RegClass::Xmm | RegClass::Ymm | RegClass::Zmm => true,
            _ => false,
        }
    }

    /// Extension added to `ModRM.reg` for this class: `R` for anything but
    /// opmasks, `R'` only for vector registers.
    pub fn reg_extension(self, state: &DecodedState) -> u32 {
        match self {
            RegClass::K => 0,
            _ if self.is_vector() => state.extra_register_base + state.extra_register_base_evex,
            _ => state.extra_register_base,
        }
    }

    /// Extension added to `ModRM.rm` in the register form: `B` for anything but
    /// opmasks, plus `X` for vector registers.
    pub fn rm_extension(self, state: &DecodedState) -> u32 {
        match self {
            RegClass::K => 0,
            _ if self.is_vector() => {
                state.extra_base_register_base + state.extra_base_register_base_evex
            }
            _ => state.extra_base_register_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ranges() {
        assert_eq!(Register::Eax.class(), Some(RegClass::Gpr32));
        assert_eq!(Register::R15d.class(), Some(RegClass::Gpr32));
        assert_eq!(Register::Rax.class(), Some(RegClass::Gpr64));
        assert_eq!(Register::Rip.class(), None);
        assert_eq!(Register::Xmm31.class(), Some(RegClass::Xmm));
        assert_eq!(Register::Ymm0.class(), Some(RegClass::Ymm));
        assert_eq!(Register::Zmm31.class(), Some(RegClass::Zmm));
        assert_eq!(Register::K7.class(), Some(RegClass::K));
        assert_eq!(Register::None.class(), None);
    }

    #[test]
    fn offsets_stay_in_class() {
        for &class in &[RegClass::Gpr32, RegClass::Gpr64, RegClass::Xmm, RegClass::Ymm,
                        RegClass::Zmm, RegClass::K] {
            for n in 0..class.len() {
                let reg = class.base(true).offset(n);
                assert_eq!(reg.class(), Some(class), "{:?} + {}", class, n);
                assert_eq!(reg.number(), n);
            }
        }
        assert_eq!(Register::K7.offset(1), Register::None);
        assert_eq!(Register::K0.offset(200), Register::None);
    }

    #[test]
    fn gpr_follows_w() {
        assert_eq!(RegClass::Gpr.base(false), Register::Eax);
        assert_eq!(RegClass::Gpr.base(true), Register::Rax);
        assert_eq!(RegClass::Gpr32.base(true), Register::Eax);
    }

    #[test]
    fn names() {
        assert_eq!(Register::Zmm17.to_string(), "zmm17");
        assert_eq!(Register::R9d.to_string(), "r9d");
        assert_eq!(Register::R9.to_string(), "r9");
        assert_eq!(Register::K3.to_string(), "k3");
        assert_eq!(Register::Rip.to_string(), "rip");
        assert_eq!(Register::None.to_string(), "(none)");
    }

    #[test]
    fn extensions_per_class() {
        let mut state = DecodedState::default();
        state.extra_register_base = 8;
        state.extra_register_base_evex = 16;
        state.extra_base_register_base = 8;
        state.extra_base_register_base_evex = 16;

        assert_eq!(RegClass::Zmm.reg_extension(&state), 24);
        assert_eq!(RegClass::Gpr.reg_extension(&state), 8);
        assert_eq!(RegClass::K.reg_extension(&state), 0);
        assert_eq!(RegClass::Xmm.rm_extension(&state), 24);
        assert_eq!(RegClass::Gpr64.rm_extension(&state), 8);
        assert_eq!(RegClass::K.rm_extension(&state), 0);
    }
}
