//! Handler tree: static data that picks the shape for an opcode.

use evex::DecodeContext;
use evex::gateway::{self, Route};
use evex::instr::Instruction;
use evex::shape::Shape;
use evex::state::{DecodedState, VectorLength};

const INVALID: &Handler = &Handler::Invalid;

/// A node of the opcode handler tree.
///
/// Tables are built from `static` items referring to each other, so a whole
/// tree is resolved at compile time and can be shared between any number of
/// decoders.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Flags the instruction invalid without consuming anything.
    Invalid,
    /// Leaf: resolve operands with this shape.
    Shape(Shape),
    /// Picks a handler by `EVEX.L'L`.
    VectorLength(LengthDispatch),
    /// Picks a handler by `ModRM.reg`.
    Group([&'static Handler; 8]),
    /// Picks a handler by addressing form.
    RegOrMem {
        reg: &'static Handler,
        mem: &'static Handler,
    },
    /// The `0x62` escape. Leads to the EVEX decoder or, for memory forms
    /// outside 64-bit mode, to the wrapped legacy handler.
    Evex(&'static Handler),
}

impl Handler {
    pub fn decode<C: DecodeContext + ?Sized>(&self, ctx: &mut C, instr: &mut Instruction) {
        match *self {
            Handler::Invalid => ctx.set_invalid_instruction(),
            Handler::Shape(ref shape) => {
                trace!("resolving {:?}", shape.code);
                shape.resolve(ctx, instr);
            }
            Handler::VectorLength(ref dispatch) => {
                let handler = dispatch.select(ctx.state());
                handler.decode(ctx, instr);
            }
            Handler::Group(ref handlers) => {
                let handler = handlers[(ctx.state().reg & 7) as usize];
                handler.decode(ctx, instr);
            }
            Handler::RegOrMem { reg, mem } => {
                let handler = if ctx.state().is_register_form() { reg } else { mem };
                handler.decode(ctx, instr);
            }
            Handler::Evex(fallback) => {
                match gateway::route(ctx.is_64bit_mode(), ctx.state()) {
                    Route::EvexMvex => ctx.evex_mvex(instr),
                    Route::Memory => fallback.decode(ctx, instr),
                }
            }
        }
    }

    pub fn is_invalid(&self) -> bool {
        *self == Handler::Invalid
    }
}

/// One handler per vector length, the reserved length always being invalid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LengthDispatch {
    handlers: [&'static Handler; 4],
    embedded_rounding: bool,
}

impl LengthDispatch {
    pub const fn new(l128: &'static Handler, l256: &'static Handler, l512: &'static Handler) -> Self {
        Self {
            handlers: [l128, l256, l512, INVALID],
            embedded_rounding: false,
        }
    }

    /// Dispatcher for opcodes with an embedded rounding form.
    ///
    /// With `mod == 3` and `b` set, `L'L` is the rounding mode and the 512-bit
    /// handler is used no matter what it says.
    pub const fn with_rounding(l128: &'static Handler, l256: &'static Handler, l512: &'static Handler) -> Self {
        Self {
            embedded_rounding: true,
            ..Self::new(l128, l256, l512)
        }
    }

    pub fn select(&self, state: &DecodedState) -> &'static Handler {
        let len = if self.embedded_rounding && state.is_register_form() && state.b() {
            VectorLength::L512
        } else {
            state.vector_length
        };
        self.handlers[len as usize]
    }
}
