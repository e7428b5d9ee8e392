//! Base-85 binary-to-text codec (RFC 1924 alphabet).
//!
//! This is the alphabet and padding discipline used by the peers that
//! produce and consume gantry payloads: 4-byte big-endian groups map to
//! 5 digits, a trailing partial group of `n` bytes is zero-padded and
//! emits `n + 1` digits, and decoding pads short groups with the
//! maximal digit before truncating the surplus bytes.

use std::fmt;

const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

const fn decode_table() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
}

static DECODE: [i8; 256] = decode_table();

/// Errors produced when decoding base-85 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base85Error {
    /// A byte outside the 85-character alphabet.
    InvalidByte { byte: u8, index: usize },
    /// A 5-digit group exceeding the 32-bit range.
    GroupOverflow { index: usize },
}

impl fmt::Display for Base85Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base85Error::InvalidByte { byte, index } => {
                write!(f, "invalid base-85 byte 0x{:02x} at offset {}", byte, index)
            }
            Base85Error::GroupOverflow { index } => {
                write!(f, "base-85 group starting at offset {} overflows 32 bits", index)
            }
        }
    }
}

impl std::error::Error for Base85Error {}

/// Encode bytes as base-85 text.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(4) * 5);
    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut acc = u32::from_be_bytes(group);
        let mut digits = [0u8; 5];
        for slot in digits.iter_mut().rev() {
            *slot = (acc % 85) as u8;
            acc /= 85;
        }
        for &digit in digits.iter().take(chunk.len() + 1) {
            out.push(ALPHABET[digit as usize] as char);
        }
    }
    out
}

/// Decode base-85 text back to bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, Base85Error> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let pad = (5 - bytes.len() % 5) % 5;
    let mut out = Vec::with_capacity(bytes.len() / 5 * 4 + 4);
    let mut index = 0;
    while index < bytes.len() {
        let mut acc: u64 = 0;
        for offset in 0..5 {
            let byte = bytes.get(index + offset).copied().unwrap_or(b'~');
            let digit = DECODE[byte as usize];
            if digit < 0 {
                return Err(Base85Error::InvalidByte {
                    byte,
                    index: index + offset,
                });
            }
            acc = acc * 85 + digit as u64;
        }
        if acc > u32::MAX as u64 {
            return Err(Base85Error::GroupOverflow { index });
        }
        out.extend_from_slice(&(acc as u32).to_be_bytes());
        index += 5;
    }
    out.truncate(out.len() - pad);
    Ok(out)
}
