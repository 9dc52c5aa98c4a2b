/*!
Interpreter for the compact binary asmap format.

A binary asmap is a bytecode program that is walked once per lookup, consuming the bits of
the 128-bit lookup key from the most significant end. Bits of the program are read least
significant bit first within each byte.

| opcode | encoding | argument |
|--------|----------|----------|
| RETURN | `0`      | ASN      |
| JUMP   | `10`     | offset   |
| MATCH  | `110`    | pattern  |
| DEFAULT| `111`    | ASN      |
*/
use crate::models::{Asn, Prefix, ASMAP_KEY_BITS};
use crate::parser::asmap::AsLookup;
use num_enum::TryFromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
enum Instruction {
    Return = 0,
    Jump = 1,
    Match = 2,
    Default = 3,
}

const TYPE_BIT_SIZES: &[u8] = &[0, 0, 1];
const ASN_BIT_SIZES: &[u8] = &[15, 16, 17, 18, 19, 20, 21, 22, 23, 24];
const MATCH_BIT_SIZES: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8];
const JUMP_BIT_SIZES: &[u8] = &[
    5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28,
    29, 30,
];

/// Read position inside the program, counted in bits.
struct BitCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        BitCursor { data, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    #[inline]
    fn next_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.pos / 8)?;
        let bit = (byte >> (self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    /// Decodes a variable-length integer.
    ///
    /// Each class but the last is introduced by a continuation bit. A `1` skips the class,
    /// adding its full range to the value; a `0` is followed by `size` bits, MSB first.
    fn decode(&mut self, minval: u32, bit_sizes: &[u8]) -> Option<u32> {
        let mut val = minval;
        for (idx, &size) in bit_sizes.iter().enumerate() {
            let skip = if idx + 1 < bit_sizes.len() {
                self.next_bit()?
            } else {
                false
            };
            if skip {
                val += 1 << size;
                continue;
            }
            for b in 0..size {
                if self.next_bit()? {
                    val += 1 << (size - 1 - b);
                }
            }
            return Some(val);
        }
        None
    }

    fn decode_type(&mut self) -> Option<Instruction> {
        Instruction::try_from(self.decode(0, TYPE_BIT_SIZES)?).ok()
    }

    fn decode_asn(&mut self) -> Option<u32> {
        self.decode(1, ASN_BIT_SIZES)
    }

    fn decode_match(&mut self) -> Option<u32> {
        self.decode(2, MATCH_BIT_SIZES)
    }

    fn decode_jump(&mut self) -> Option<u32> {
        self.decode(17, JUMP_BIT_SIZES)
    }
}

/// Number of key bits a MATCH pattern compares: its bit width minus the leading marker bit.
#[inline]
fn match_len(pattern: u32) -> u32 {
    31 - pattern.leading_zeros()
}

/// A structurally valid binary asmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAsMap {
    data: Vec<u8>,
}

impl BinaryAsMap {
    /// Wraps `data` if it passes [sanity_check] over the full key width.
    pub fn from_bytes(data: &[u8]) -> Option<BinaryAsMap> {
        match sanity_check(data, ASMAP_KEY_BITS as u32) {
            true => Some(BinaryAsMap {
                data: data.to_vec(),
            }),
            false => None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Runs the program against the first `len` bits of `key`.
    ///
    /// Returns the raw ASN, `0` meaning unmapped. A program that runs out of key bits or out
    /// of instructions also yields `0`.
    pub fn interpret(&self, key: u128, len: u8) -> u32 {
        let mut cursor = BitCursor::new(&self.data);
        let len = len as u32;
        let mut bits = len;
        let mut default_asn = 0;
        let key_bit = |consumed: u32| (key >> (127 - consumed)) & 1 == 1;

        while cursor.remaining() > 0 {
            let Some(opcode) = cursor.decode_type() else {
                break;
            };
            match opcode {
                Instruction::Return => {
                    return cursor.decode_asn().unwrap_or(0);
                }
                Instruction::Jump => {
                    let Some(jump) = cursor.decode_jump() else {
                        break;
                    };
                    if bits == 0 || jump as usize >= cursor.remaining() {
                        break;
                    }
                    if key_bit(len - bits) {
                        cursor.pos += jump as usize;
                    }
                    bits -= 1;
                }
                Instruction::Match => {
                    let Some(pattern) = cursor.decode_match() else {
                        break;
                    };
                    let matchlen = match_len(pattern);
                    if bits < matchlen {
                        break;
                    }
                    for bit in 0..matchlen {
                        let expected = (pattern >> (matchlen - 1 - bit)) & 1 == 1;
                        if key_bit(len - bits) != expected {
                            return default_asn;
                        }
                        bits -= 1;
                    }
                }
                Instruction::Default => {
                    let Some(asn) = cursor.decode_asn() else {
                        break;
                    };
                    default_asn = asn;
                }
            }
        }
        0
    }
}

impl AsLookup for BinaryAsMap {
    fn lookup(&self, prefix: &Prefix) -> Option<Asn> {
        let (key, len) = prefix.key();
        Asn::from_mapped(self.interpret(key, len))
    }
}

/// Validates the structure of a binary asmap for keys of `bits` bits.
///
/// Rejects programs that jump into the middle of an instruction, have intersecting or
/// out-of-range jumps, contain unreachable code, consume more key bits than available, carry
/// redundant DEFAULT/RETURN sequences, or end with more than 7 (or non-zero) padding bits.
pub fn sanity_check(data: &[u8], bits: u32) -> bool {
    let mut cursor = BitCursor::new(data);
    let mut bits = bits;
    // pending jump targets (bit offset, key bits left after the jump), innermost last
    let mut jumps: Vec<(usize, u32)> = Vec::with_capacity(bits as usize);
    let mut prev_opcode = Instruction::Jump;
    let mut had_incomplete_match = false;

    while cursor.remaining() > 0 {
        if let Some(&(target, _)) = jumps.last() {
            if cursor.pos >= target {
                return false;
            }
        }
        let Some(opcode) = cursor.decode_type() else {
            return false;
        };
        match opcode {
            Instruction::Return => {
                if prev_opcode == Instruction::Default {
                    return false;
                }
                if cursor.decode_asn().is_none() {
                    return false;
                }
                match jumps.pop() {
                    None => {
                        if cursor.remaining() > 7 {
                            return false;
                        }
                        while let Some(bit) = cursor.next_bit() {
                            if bit {
                                return false;
                            }
                        }
                        return true;
                    }
                    Some((target, bits_left)) => {
                        if cursor.pos != target {
                            return false;
                        }
                        bits = bits_left;
                        prev_opcode = Instruction::Jump;
                    }
                }
            }
            Instruction::Jump => {
                let Some(jump) = cursor.decode_jump() else {
                    return false;
                };
                if jump as usize > cursor.remaining() || bits == 0 {
                    return false;
                }
                bits -= 1;
                let target = cursor.pos + jump as usize;
                if let Some(&(innermost, _)) = jumps.last() {
                    if target >= innermost {
                        return false;
                    }
                }
                jumps.push((target, bits));
                prev_opcode = Instruction::Jump;
            }
            Instruction::Match => {
                let Some(pattern) = cursor.decode_match() else {
                    return false;
                };
                let matchlen = match_len(pattern);
                if prev_opcode != Instruction::Match {
                    had_incomplete_match = false;
                }
                if matchlen < 8 && had_incomplete_match {
                    return false;
                }
                had_incomplete_match = matchlen < 8;
                if bits < matchlen {
                    return false;
                }
                bits -= matchlen;
                prev_opcode = Instruction::Match;
            }
            Instruction::Default => {
                if prev_opcode == Instruction::Default {
                    return false;
                }
                if cursor.decode_asn().is_none() {
                    return false;
                }
                prev_opcode = Instruction::Default;
            }
        }
    }
    false
}
