//! Validity rules: prefix bit patterns that make an encoding illegal for a
//! given operand shape.
//!
//! Most rules only look at the decoded prefix state and are evaluated up
//! front. `NO_MEMORY` and `DEST_NOT_INDEX` depend on the addressing form and
//! the decoded memory operand and are applied by the resolver when it gets
//! there.

use evex::state::DecodedState;

bitflags! {
    /// Set of validity rules a shape is subject to.
    ///
    /// Each flag names a field that must be clear (or a relation that must not
    /// hold) for the encoding to be legal.
    pub struct Checks: u32 {
        /// `EVEX.b` must be clear.
        const B = 0x0001;
        /// `vvvv` (including `V'`) must be 0.
        const VVVV = 0x0002;
        /// The low four bits of `vvvv` must be 0. `V'` is used by VSIB.
        const VVVV_LOW = 0x0004;
        /// No opmask may be given.
        const AAA = 0x0008;
        /// No zeroing.
        const Z = 0x0010;
        /// `EVEX.R` must be clear.
        const R = 0x0020;
        /// `EVEX.R'` must be clear.
        const R2 = 0x0040;
        /// `EVEX.B` must be clear.
        const RM_B = 0x0080;
        /// `EVEX.X` must be clear (it would extend `rm` past 15).
        const RM_X = 0x0100;
        /// An opmask is required (`aaa != 0`).
        const NEED_OPMASK = 0x0200;
        /// The opmask destination in `reg` must not equal a nonzero `aaa`.
        const OPMASK_ALIAS = 0x0400;
        /// The memory form is illegal.
        const NO_MEMORY = 0x0800;
        /// The destination register must differ from the VSIB index.
        const DEST_NOT_INDEX = 0x1000;
    }
}

impl Checks {
    /// Builds a rule set in constant context.
    pub const fn of(rules: &[Checks]) -> Checks {
        let mut bits = 0;
        let mut i = 0;
        while i < rules.len() {
            bits |= rules[i].bits();
            i += 1;
        }
        Checks::from_bits_truncate(bits)
    }

    /// Returns the subset of prefix-state rules that `state` violates.
    ///
    /// An empty result means the prefix bits are fine for this shape.
    pub fn violations(self, state: &DecodedState) -> Checks {
        let mut violated = Checks::empty();
        let mut rule = |check: Checks, broken: bool| {
            if self.contains(check) && broken {
                violated.insert(check);
            }
        };

        rule(Checks::B, state.b());
        rule(Checks::VVVV, state.vvvv != 0);
        rule(Checks::VVVV_LOW, state.vvvv & 0xF != 0);
        rule(Checks::AAA, state.aaa != 0);
        rule(Checks::Z, state.z());
        rule(Checks::R, state.extra_register_base != 0);
        rule(Checks::R2, state.extra_register_base_evex != 0);
        rule(Checks::RM_B, state.extra_base_register_base != 0);
        rule(Checks::RM_X, state.extra_base_register_base_evex != 0);
        rule(Checks::NEED_OPMASK, state.aaa == 0);
        rule(Checks::OPMASK_ALIAS, state.aaa != 0 && state.reg == state.aaa);

        violated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evex::state::StateFlags;

    const SHAPE: Checks = Checks::of(&[Checks::VVVV, Checks::AAA, Checks::RM_X]);

    #[test]
    fn const_builder() {
        assert_eq!(SHAPE, Checks::VVVV | Checks::AAA | Checks::RM_X);
        assert_eq!(Checks::of(&[]), Checks::empty());
    }

    #[test]
    fn clean_state_passes() {
        let state = DecodedState::default();
        assert!(SHAPE.violations(&state).is_empty());
        assert!(Checks::all().violations(&state) == Checks::NEED_OPMASK);
    }

    #[test]
    fn reports_what_fired() {
        let mut state = DecodedState::default();
        state.vvvv = 0x10;
        state.aaa = 2;
        state.flags = StateFlags::B;
        assert_eq!(SHAPE.violations(&state), Checks::VVVV | Checks::AAA);
        // `V'` alone is fine when only the low bits are checked
        assert!(Checks::VVVV_LOW.violations(&state).is_empty());
        assert_eq!(Checks::B.violations(&state), Checks::B);
    }

    #[test]
    fn opmask_alias() {
        let mut state = DecodedState::default();
        state.reg = 0;
        state.aaa = 0;
        assert!(Checks::OPMASK_ALIAS.violations(&state).is_empty());
        state.reg = 3;
        state.aaa = 3;
        assert_eq!(Checks::OPMASK_ALIAS.violations(&state), Checks::OPMASK_ALIAS);
        state.reg = 2;
        assert!(Checks::OPMASK_ALIAS.violations(&state).is_empty());
    }
}
