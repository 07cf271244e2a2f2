extern crate evex_operands;
extern crate termcolor;

use evex_operands::evex::opcodes::{self, MandatoryPrefix, OpcodeMap};

use termcolor::{ColorChoice, Color, ColorSpec, StandardStream, WriteColor};
use std::error::Error;
use std::io::Write;

fn main() -> Result<(), Box<dyn Error>> {
    let mut out = StandardStream::stdout(ColorChoice::Auto);

    let mut impl_count = 0;
    let mut total = 0;
    for &map in OpcodeMap::ALL.iter() {
        for &pp in MandatoryPrefix::ALL.iter() {
            let mut line = Vec::new();
            for opcode in 0x00..=0xffu8 {
                let w0 = !opcodes::lookup(map, pp, opcode, false).is_invalid();
                let w1 = !opcodes::lookup(map, pp, opcode, true).is_invalid();
                if w0 || w1 {
                    line.push((opcode, w0, w1));
                }
            }
            if line.is_empty() {
                continue;
            }

            write!(out, "{:>2}.{:<4}", pp.name(), map.name())?;
            for (opcode, w0, w1) in line {
                total += 2;
                impl_count += w0 as u32 + w1 as u32;
                let color = if w0 && w1 { Color::Green } else { Color::Yellow };
                out.set_color(ColorSpec::new().set_fg(Some(color)))?;
                let suffix = match (w0, w1) {
                    (true, false) => ".W0",
                    (false, true) => ".W1",
                    _ => "",
                };
                write!(out, " {:02X}{}", opcode, suffix)?;
                out.set_color(ColorSpec::new().set_fg(None))?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{} opcodes with at least one handled W form, {}/{} W forms handled",
             total / 2, impl_count, total)?;

    writeln!(out)?;
    writeln!(out, "(W1 forms of W0-only opcodes are counted as unhandled, even though they are architecturally invalid)")?;
    Ok(())
}
