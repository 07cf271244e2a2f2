//! Decoder for EVEX-encoded (AVX-512) x86 instructions.
//!
//! The heart of this crate is the operand resolver in `evex::shape`: each
//! instruction form is a static `Shape`, and resolving a shape against the
//! decoded prefix bits yields the instruction's operands, opmask, broadcast
//! and rounding state. `evex::Decoder` wraps this up into a byte-level
//! decoder:
//!
//! ```
//! use evex_operands::evex::{Bitness, Decoder};
//! use evex_operands::memory::ArrayMemory;
//!
//! let mem = ArrayMemory::from_hex("62 F1 74 58 58 C2").unwrap();
//! let mut decoder = Decoder::new(&mem, 0, Bitness::Bits64);
//! let instr = decoder.decode_next();
//! assert_eq!(instr.to_string(), "vaddps zmm0,zmm1,zmm2,{ru-sae}");
//! ```

#![doc(html_root_url = "https://docs.rs/evex-operands/0.1.0")]
#![warn(missing_debug_implementations)]

#[macro_use] extern crate bitflags;
#[macro_use] extern crate bitpat;
#[macro_use] extern crate log;
#[macro_use] extern crate num_derive;
extern crate num_traits;

pub mod evex;
pub mod memory;
