//! Unsigned LEB128 varints.
//!
//! Each byte carries seven value bits, least significant group first, and
//! sets the high bit when another byte follows. Counts and type
//! discriminants on the wire all use this encoding.

use crate::error::CodecError;

/// Maximum number of bytes a varint-encoded `u64` can occupy.
pub const MAX_VARINT_LEN64: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const VALUE_MASK: u8 = 0x7f;

/// Decodes a varint from the start of `data`.
///
/// Returns the value and the number of bytes consumed. Fails with
/// [`CodecError::BufferTooShort`] if `data` ends before a terminating byte
/// and with [`CodecError::IntegerOverflow`] if the encoding runs past
/// [`MAX_VARINT_LEN64`] bytes or does not fit into 64 bits.
pub fn uvarint(data: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i == MAX_VARINT_LEN64 {
            return Err(CodecError::IntegerOverflow {
                context: "decoding varint",
            });
        }
        if byte < CONTINUATION_BIT {
            // The tenth byte may only contribute the single top bit.
            if i == MAX_VARINT_LEN64 - 1 && byte > 1 {
                return Err(CodecError::IntegerOverflow {
                    context: "decoding varint",
                });
            }
            return Ok((value | (u64::from(byte) << shift), i + 1));
        }
        value |= u64::from(byte & VALUE_MASK) << shift;
        shift += 7;
    }

    Err(CodecError::BufferTooShort {
        needed: data.len() + 1,
        available: data.len(),
    })
}

/// Appends the minimal varint encoding of `value` to `buf` and returns the
/// number of bytes written.
pub fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) -> usize {
    let mut written = 0;
    while value >= u64::from(CONTINUATION_BIT) {
        buf.push((value as u8) | CONTINUATION_BIT);
        value >>= 7;
        written += 1;
    }
    buf.push(value as u8);
    written + 1
}

/// Number of bytes [`put_uvarint`] writes for `value`.
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Fails unless `len` is the minimal encoded length of `value`.
///
/// Under validation every varint read from the wire goes through this, so
/// one value has exactly one byte form.
pub fn check_canonical_uvarint(
    value: u64,
    len: usize,
    context: &'static str,
) -> Result<(), CodecError> {
    if len != uvarint_len(value) {
        return Err(CodecError::NonCanonicalVarint {
            context,
            value,
            len,
        });
    }
    Ok(())
}
