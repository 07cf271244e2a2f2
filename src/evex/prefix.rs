//! EVEX prefix payload decoding.
//!
//! After the `0x62` escape come three payload bytes:
//!
//! ```notrust
//! P0: R  X  B  R' 0  0  m  m
//! P1: W  v3 v2 v1 v0 1  p  p
//! P2: z  L' L  b  V' a  a  a
//! ```
//!
//! `R`, `X`, `B`, `R'`, `vvvv` and `V'` are stored inverted.

use evex::opcodes::{MandatoryPrefix, OpcodeMap};
use evex::state::{DecodedState, StateFlags, VectorLength};

use num_traits::FromPrimitive;

/// The three payload bytes of an EVEX prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvexPrefix {
    pub p0: u8,
    pub p1: u8,
    pub p2: u8,
}

impl EvexPrefix {
    pub fn new(p0: u8, p1: u8, p2: u8) -> Self {
        Self { p0, p1, p2 }
    }

    /// MVEX (Knights Corner) shares the escape byte and clears bit 2 of P1.
    pub fn is_mvex(&self) -> bool {
        !bitpat!(_ _ _ _ _ 1 _ _)(self.p1)
    }

    /// Bits 3 and 2 of P0 must be zero.
    pub fn reserved_bits_clear(&self) -> bool {
        bitpat!(_ _ _ _ 0 0 _ _)(self.p0)
    }

    /// The opcode map selected by `mm`, `None` for the reserved map 0.
    pub fn map(&self) -> Option<OpcodeMap> {
        OpcodeMap::from_u8(self.p0 & 0b11)
    }

    /// The implied legacy prefix selected by `pp`.
    pub fn pp(&self) -> MandatoryPrefix {
        MandatoryPrefix::from_pp(self.p1)
    }

    /// Stores the payload's fields in `state`.
    ///
    /// Outside 64-bit mode only 8 registers are addressable: the extension
    /// bits are ignored and `vvvv` is cut to 3 bits.
    pub fn apply(&self, state: &mut DecodedState, is_64bit: bool) {
        let (p0, p1, p2) = (self.p0 as u32, self.p1 as u32, self.p2 as u32);

        let mut flags = StateFlags::empty();
        if p1 & 0x80 != 0 {
            flags |= StateFlags::W;
        }
        if p2 & 0x10 != 0 {
            flags |= StateFlags::B;
        }
        if p2 & 0x80 != 0 {
            flags |= StateFlags::Z;
        }
        state.flags = flags;
        state.aaa = p2 & 7;
        state.vector_length = VectorLength::from_bits(p2 >> 5);
        state.vvvv = (!p1 >> 3) & 0xF;

        if is_64bit {
            state.vvvv |= (!p2 & 8) << 1;
            state.extra_register_base = (!p0 & 0x80) >> 4;
            state.extra_index_register_base = (!p0 & 0x40) >> 3;
            state.extra_base_register_base = (!p0 & 0x20) >> 2;
            state.extra_register_base_evex = !p0 & 0x10;
            state.extra_base_register_base_evex = (!p0 & 0x40) >> 2;
            state.extra_index_register_base_vsib = (!p2 & 8) << 1;
        } else {
            state.vvvv &= 7;
            state.extra_register_base = 0;
            state.extra_index_register_base = 0;
            state.extra_base_register_base = 0;
            state.extra_register_base_evex = 0;
            state.extra_base_register_base_evex = 0;
            state.extra_index_register_base_vsib = 0;
        }
    }
}
