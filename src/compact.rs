// Copyright (C) 2024 Parity Technologies (UK) Ltd. (admin@parity.io)
// This file is a part of the scale-codec-legacy crate.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//         http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This module provides functions to encode and decode compact integers.
//!
//! The two lowest bits of the first byte select one of four modes:
//!
//! - `0b00`: the upper six bits hold the value (0 to 63).
//! - `0b01`: two little endian bytes, upper 14 bits hold the value (64 to 16383).
//! - `0b10`: four little endian bytes, upper 30 bits hold the value (16384 to 2^30 - 1).
//! - `0b11`: the upper six bits hold the number of following bytes minus 4, and the
//!   value is those bytes interpreted as a little endian unsigned integer.
//!
//! Encoding always picks the smallest mode able to hold the value. Decoding accepts
//! anything with a valid layout.

use crate::cursor::Cursor;
use crate::error::Error;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// The largest number of value bytes that can follow a big integer mode prefix.
pub const MAX_BIG_BYTES: usize = 4 + 63;

const SINGLE_BYTE_MAX: u32 = 0b0011_1111;
const TWO_BYTE_MAX: u32 = 0b0011_1111_1111_1111;
const FOUR_BYTE_MAX: u32 = 0b0011_1111_1111_1111_1111_1111_1111_1111;

/// Decode a compact integer from the cursor.
pub fn decode(cursor: &mut Cursor<'_>) -> Result<BigUint, Error> {
    let first = cursor.next_u8()?;
    let value = match first & 0b11 {
        0b00 => BigUint::from(first >> 2),
        0b01 => {
            let second = cursor.next_u8()?;
            BigUint::from(u16::from_le_bytes([first, second]) >> 2)
        }
        0b10 => {
            let rest = cursor.next_array::<3>()?;
            BigUint::from(u32::from_le_bytes([first, rest[0], rest[1], rest[2]]) >> 2)
        }
        _ => {
            let len = (first >> 2) as usize + 4;
            BigUint::from_bytes_le(cursor.next(len)?)
        }
    };
    Ok(value)
}

/// Decode a compact integer which is used as the length of something that follows.
/// Lengths are `Compact<u32>`, so anything bigger is rejected.
pub fn decode_len(cursor: &mut Cursor<'_>) -> Result<usize, Error> {
    let len = decode(cursor)?;
    len.to_u32().map(|n| n as usize).ok_or(Error::InvalidCompactEncoding(len))
}

/// Compact encode the given value, appending the bytes to `out`. Fails with
/// [`Error::ValueTooLarge`] if the value needs more than [`MAX_BIG_BYTES`] bytes.
pub fn encode(value: &BigUint, out: &mut Vec<u8>) -> Result<(), Error> {
    if let Some(n) = value.to_u32() {
        if n <= FOUR_BYTE_MAX {
            encode_small(n, out);
            return Ok(());
        }
    }

    let mut bytes = value.to_bytes_le();
    if bytes.len() > MAX_BIG_BYTES {
        return Err(Error::ValueTooLarge(bytes.len()));
    }
    if bytes.len() < 4 {
        bytes.resize(4, 0);
    }

    out.push((((bytes.len() - 4) as u8) << 2) | 0b11);
    out.extend_from_slice(&bytes);
    Ok(())
}

/// Compact encode a length. This never fails, since any `u64` fits in the big integer mode.
pub fn encode_len(len: usize, out: &mut Vec<u8>) {
    let len = len as u64;
    match u32::try_from(len) {
        Ok(n) if n <= FOUR_BYTE_MAX => encode_small(n, out),
        _ => {
            let bytes = len.to_le_bytes();
            let used = 8 - (len.leading_zeros() / 8) as usize;
            let used = used.max(4);
            out.push((((used - 4) as u8) << 2) | 0b11);
            out.extend_from_slice(&bytes[..used]);
        }
    }
}

// Encode values which fit in one of the first three modes.
fn encode_small(n: u32, out: &mut Vec<u8>) {
    if n <= SINGLE_BYTE_MAX {
        out.push((n << 2) as u8);
    } else if n <= TWO_BYTE_MAX {
        out.extend_from_slice(&(((n << 2) | 0b01) as u16).to_le_bytes());
    } else {
        out.extend_from_slice(&((n << 2) | 0b10).to_le_bytes());
    }
}
