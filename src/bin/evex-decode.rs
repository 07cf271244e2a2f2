extern crate evex_operands;
extern crate env_logger;
extern crate termcolor;
#[macro_use] extern crate structopt;

use evex_operands::evex::{Bitness, Decoder, DecoderOptions, Instruction};
use evex_operands::memory::{ArrayMemory, VirtualMemory};

use structopt::StructOpt;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::u32;
use std::error::Error;
use std::io::Write;
use std::str::FromStr;
use std::num::ParseIntError;

/// Parse a number that might be hexadecimal.
fn parse_hex(src: &str) -> Result<u32, ParseIntError> {
    if src.starts_with("0x") {
        u32::from_str_radix(&src[2..], 16)
    } else {
        u32::from_str(src)
    }
}

fn parse_bits(src: &str) -> Result<Bitness, String> {
    match src {
        "32" => Ok(Bitness::Bits32),
        "64" => Ok(Bitness::Bits64),
        _ => Err(format!("unsupported bitness: {} (expected 32 or 64)", src)),
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "evex-decode", about = "Decode EVEX instructions from hex bytes")]
struct Opt {
    /// Operating mode to decode for (32 or 64).
    #[structopt(long = "bits", default_value = "64", parse(try_from_str = "parse_bits"))]
    bits: Bitness,

    /// Don't flag architecturally illegal bit patterns (useful when looking
    /// at junk or obfuscated code).
    #[structopt(long = "no-invalid-check")]
    no_invalid_check: bool,

    /// Address printed for the first byte (can also be a hexadecimal value
    /// starting with `0x`).
    #[structopt(long = "address", default_value = "0", parse(try_from_str = "parse_hex"))]
    address: u32,

    /// Machine code as hex bytes, like `62 F1 74 48 58 C2`. Multiple
    /// instructions may follow each other.
    #[structopt(name = "BYTES")]
    bytes: Vec<String>,
}

fn print_instr<W: WriteColor>(out: &mut W, addr: u32, raw: &[u8], instr: &Instruction) -> Result<(), Box<dyn Error>> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
    write!(out, "{:08X}  ", addr)?;
    out.reset()?;

    let hex: Vec<_> = raw.iter().map(|b| format!("{:02X}", b)).collect();
    write!(out, "{:<36}", hex.join(" "))?;

    if instr.is_invalid() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", instr)?;
        out.reset()?;
    } else {
        let text = instr.to_string();
        let (mnemonic, operands) = match text.find(' ') {
            Some(idx) => text.split_at(idx),
            None => (text.as_str(), ""),
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "{}", mnemonic)?;
        out.reset()?;
        write!(out, "{}", operands)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opt = Opt::from_args();

    let mem = ArrayMemory::from_hex(&opt.bytes.join(" "))?;
    let end = mem.len_hint().unwrap_or(0);

    let mut options = DecoderOptions::empty();
    if opt.no_invalid_check {
        options |= DecoderOptions::NO_INVALID_CHECK;
    }

    let mut out = StandardStream::stdout(ColorChoice::Auto);
    let mut decoder = Decoder::new(&mem, 0, opt.bits).with_options(options);
    while decoder.current_address() < end {
        let start = decoder.current_address();
        let instr = decoder.decode_next();
        if instr.len() == 0 {
            break;
        }

        let raw = (start..start + instr.len())
            .map(|addr| mem.load(addr))
            .collect::<Result<Vec<_>, _>>()?;
        print_instr(&mut out, opt.address.wrapping_add(start), &raw, &instr)?;
    }

    Ok(())
}
