//! The `0x62` escape.
//!
//! Outside 64-bit mode, `0x62` is also the legacy `BOUND Gd, Ma` opcode. A
//! real `BOUND` always has a memory operand, so the byte that follows only
//! starts an EVEX payload if it has the `mod == 3` bit pattern (or we're in
//! 64-bit mode, where `BOUND` doesn't exist).

use evex::code::Code;
use evex::handler::Handler;
use evex::instr::TupleType;
use evex::register::RegClass;
use evex::shape::{CodeSel, Masking, Role, Rounding, Shape};
use evex::checks::Checks;
use evex::state::DecodedState;

/// Where the `0x62` escape continues.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    /// Parse the rest of the EVEX (or MVEX) prefix.
    EvexMvex,
    /// Legacy memory-only instruction.
    Memory,
}

/// Decides how to continue after `0x62`, given the byte following it has
/// been decoded as a ModRM byte into `state`.
pub fn route(is_64bit: bool, state: &DecodedState) -> Route {
    if is_64bit || state.is_register_form() {
        Route::EvexMvex
    } else {
        Route::Memory
    }
}

static BOUND: Handler = Handler::Shape(Shape {
    roles: [Role::Reg(RegClass::Gpr32), Role::Mem, Role::Absent, Role::Absent],
    code: CodeSel::Single(Code::Bound),
    tuple_w0: TupleType::None,
    tuple_w1: TupleType::None,
    broadcast: false,
    rounding: Rounding::Ignore,
    masking: Masking::None,
    checks: Checks::empty(),
});

/// Root handler for the `0x62` byte.
pub static EVEX_GATEWAY: Handler = Handler::Evex(&BOUND);

#[cfg(test)]
mod tests {
    use super::*;
    use evex::instr::{Instruction, OpKind};
    use evex::mock::MockContext;
    use evex::register::Register;

    #[test]
    fn routing() {
        let mut state = DecodedState::default();
        for modrm in 0..=255u8 {
            state.set_modrm(modrm);
            assert_eq!(route(true, &state), Route::EvexMvex);
            let expected = if modrm >= 0xC0 { Route::EvexMvex } else { Route::Memory };
            assert_eq!(route(false, &state), expected);
        }
    }

    #[test]
    fn bound_fallback() {
        let mut ctx = MockContext::new(&[0x08]).bits32();
        ctx.state.set_modrm(0b01_011_000);
        let mut instr = Instruction::new();
        EVEX_GATEWAY.decode(&mut ctx, &mut instr);
        let instr = ctx.finish(instr);

        assert!(!instr.is_invalid());
        assert_eq!(instr.code(), Code::Bound);
        assert_eq!(instr.op_register(0), Register::Ebx);
        assert_eq!(instr.op_kind(1), OpKind::Memory);
        assert_eq!(ctx.mem_reads, vec![TupleType::None]);
        assert_eq!(ctx.evex_mvex_calls, 0);
    }
}
