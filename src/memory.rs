//! Byte sources the decoder reads machine code from.
//!
//! The decoder never owns the code it decodes. It is handed something that
//! implements `VirtualMemory` and a start address, and pulls bytes one at a
//! time. Running past the end of the source is reported as a `MemoryError`,
//! which the decoder turns into an invalid instruction instead of an abort.

use std::fmt;
use std::error::Error;

pub trait VirtualMemory {
    /// Loads the byte at `virt_addr`.
    fn load(&self, virt_addr: u32) -> Result<u8, MemoryError>;

    fn load_i32(&self, virt_addr: u32) -> Result<i32, MemoryError> {
        let (b0, b1, b2, b3) = (
            self.load(virt_addr)? as u32,
            self.load(virt_addr.wrapping_add(1))? as u32,
            self.load(virt_addr.wrapping_add(2))? as u32,
            self.load(virt_addr.wrapping_add(3))? as u32,
        );

        Ok((
            b3 << 24 |
            b2 << 16 |
            b1 << 8 |
            b0
        ) as i32)
    }

    /// Number of bytes available, if the source knows it.
    fn len_hint(&self) -> Option<u32> {
        None
    }
}

impl<'a, M: VirtualMemory + ?Sized> VirtualMemory for &'a M {
    fn load(&self, virt_addr: u32) -> Result<u8, MemoryError> {
        (**self).load(virt_addr)
    }

    fn len_hint(&self) -> Option<u32> {
        (**self).len_hint()
    }
}

/// A static, contiguous memory implementation that stores everything in a
/// `Vec`, starting at address 0.
///
/// This is mostly useful for tests, benchmarks and the command line tools.
#[derive(Debug, Clone)]
pub struct ArrayMemory {
    mem: Vec<u8>,
}

impl ArrayMemory {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            mem: data
        }
    }

    /// Parses whitespace-separated hex bytes like `"62 F1 74 48 58 C2"`.
    pub fn from_hex(hex: &str) -> Result<Self, MemoryError> {
        let mut data = Vec::new();
        for word in hex.split_whitespace() {
            let byte = u8::from_str_radix(word, 16)
                .map_err(|_| MemoryError::BadHex(word.to_string()))?;
            data.push(byte);
        }
        Ok(Self::new(data))
    }

    pub fn as_vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.mem
    }
}

impl VirtualMemory for ArrayMemory {
    fn load(&self, virt_addr: u32) -> Result<u8, MemoryError> {
        self.mem.get(virt_addr as usize).cloned().ok_or(MemoryError::Fault(virt_addr))
    }

    fn len_hint(&self) -> Option<u32> {
        Some(self.mem.len() as u32)
    }
}

/// An error that can occur when reading machine code bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Accessed address is not backed by any data.
    Fault(u32),
    /// A hex string handed to `ArrayMemory::from_hex` contained a word that is
    /// not a byte.
    BadHex(String),
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryError::Fault(addr) => write!(f, "memory access error at {:#010X}", addr),
            MemoryError::BadHex(word) => write!(f, "invalid hex byte '{}'", word),
        }
    }
}

impl Error for MemoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_memory_bounds() {
        let mem = ArrayMemory::new(vec![0x78, 0x56, 0x34, 0x12]);
        assert_eq!(mem.load(0), Ok(0x78));
        assert_eq!(mem.load_i32(0), Ok(0x12345678));
        assert_eq!(mem.load(4), Err(MemoryError::Fault(4)));
        assert_eq!(mem.load_i32(1), Err(MemoryError::Fault(4)));
    }

    #[test]
    fn hex_parsing() {
        let mem = ArrayMemory::from_hex("62 f1 7C\n48").unwrap();
        assert_eq!(mem.len_hint(), Some(4));
        assert_eq!(mem.load(1), Ok(0xF1));
        assert_eq!(
            ArrayMemory::from_hex("62 xyz").unwrap_err(),
            MemoryError::BadHex("xyz".to_string())
        );
    }
}
