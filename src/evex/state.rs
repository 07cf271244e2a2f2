//! Decoded-prefix state shared between the prefix parser and the resolvers.

bitflags! {
    /// Single-bit EVEX fields.
    pub struct StateFlags: u32 {
        /// `EVEX.W` - operand size or operation select.
        const W = 0x0001;
        /// `EVEX.b` - broadcast on memory forms, rounding control or SAE on
        /// register forms.
        const B = 0x0002;
        /// `EVEX.z` - zeroing instead of merging under an opmask.
        const Z = 0x0004;
    }
}

bitflags! {
    /// Decoder-wide options.
    pub struct DecoderOptions: u32 {
        /// Don't flag architecturally illegal bit combinations as invalid.
        ///
        /// Useful for forensic disassembly of junk. Encodings that cannot be
        /// decoded at all (wrong addressing form, missing bytes) are still
        /// flagged.
        const NO_INVALID_CHECK = 0x0000_0001;
    }
}

/// Vector length encoded in `EVEX.L'L`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VectorLength {
    L128 = 0,
    L256 = 1,
    L512 = 2,
    /// `L'L = 11`, reserved.
    Unknown = 3,
}

impl VectorLength {
    /// Decodes the two `L'L` bits. Higher bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => VectorLength::L128,
            1 => VectorLength::L256,
            2 => VectorLength::L512,
            _ => VectorLength::Unknown,
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            VectorLength::L128 => 128,
            VectorLength::L256 => 256,
            VectorLength::L512 => 512,
            VectorLength::Unknown => 0,
        }
    }
}

/// Fields extracted from an EVEX prefix and the ModRM byte following the
/// opcode.
///
/// The `extra_*` fields hold the register number offset contributed by the
/// corresponding REX-style extension bit (already inverted and shifted into
/// place), so resolvers only ever add them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodedState {
    pub modrm: u32,
    /// `ModRM.mod`
    pub mod_: u32,
    pub reg: u32,
    pub rm: u32,
    /// Second source register, including `EVEX.V'` in 64-bit mode.
    pub vvvv: u32,
    /// Opmask register selector.
    pub aaa: u32,
    pub flags: StateFlags,
    pub vector_length: VectorLength,
    /// `EVEX.R`: 0 or 8.
    pub extra_register_base: u32,
    /// `EVEX.R'`: 0 or 16.
    pub extra_register_base_evex: u32,
    /// `EVEX.B`: 0 or 8.
    pub extra_base_register_base: u32,
    /// `EVEX.X` applied to `rm` in register forms: 0 or 16.
    pub extra_base_register_base_evex: u32,
    /// `EVEX.X` applied to the SIB index: 0 or 8.
    pub extra_index_register_base: u32,
    /// `EVEX.V'` applied to a VSIB index: 0 or 16.
    pub extra_index_register_base_vsib: u32,
}

impl Default for DecodedState {
    fn default() -> Self {
        Self {
            modrm: 0,
            mod_: 0,
            reg: 0,
            rm: 0,
            vvvv: 0,
            aaa: 0,
            flags: StateFlags::empty(),
            vector_length: VectorLength::L128,
            extra_register_base: 0,
            extra_register_base_evex: 0,
            extra_base_register_base: 0,
            extra_base_register_base_evex: 0,
            extra_index_register_base: 0,
            extra_index_register_base_vsib: 0,
        }
    }
}

impl DecodedState {
    /// Splits a ModRM byte into `mod`, `reg` and `rm`.
    pub fn set_modrm(&mut self, modrm: u8) {
        let modrm = modrm as u32;
        self.modrm = modrm;
        self.mod_ = modrm >> 6;
        self.reg = (modrm >> 3) & 7;
        self.rm = modrm & 7;
    }

    /// Whether `ModRM.rm` names a register (`mod == 3`) rather than memory.
    pub fn is_register_form(&self) -> bool {
        self.mod_ == 3
    }

    pub fn w(&self) -> bool {
        self.flags.contains(StateFlags::W)
    }

    pub fn b(&self) -> bool {
        self.flags.contains(StateFlags::B)
    }

    pub fn z(&self) -> bool {
        self.flags.contains(StateFlags::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn modrm_split() {
        let mut state = DecodedState::default();
        state.set_modrm(0b11_010_101);
        assert_eq!((state.mod_, state.reg, state.rm), (3, 2, 5));
        assert!(state.is_register_form());

        state.set_modrm(0b01_111_100);
        assert_eq!((state.mod_, state.reg, state.rm), (1, 7, 4));
        assert!(!state.is_register_form());
    }

    #[test]
    fn vector_length_encoding() {
        for bits in 0..4 {
            let len = VectorLength::from_bits(bits);
            assert_eq!(len as u32, bits);
            assert_eq!(VectorLength::from_u32(bits), Some(len));
        }
        assert_eq!(VectorLength::from_bits(6), VectorLength::L512);
        assert_eq!(VectorLength::L256.bits(), 256);
    }
}
