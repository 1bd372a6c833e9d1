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

//! This module provides a [`Cursor`], which hands out bytes from a buffer while keeping
//! track of how far through it we are.

use crate::error::Error;

/// A read position into some borrowed bytes. Each decode works through its own cursor;
/// reads either hand back exactly the bytes asked for or fail without moving.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Start reading from the beginning of the given bytes.
    pub fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, offset: 0 }
    }

    /// Hand back the next `n` bytes, advancing past them. Fails with
    /// [`Error::BufferUnderrun`] if fewer than `n` bytes remain.
    pub fn next(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::BufferUnderrun { needed: n, remaining });
        }
        let bytes = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Hand back the next byte.
    pub fn next_u8(&mut self) -> Result<u8, Error> {
        Ok(self.next(1)?[0])
    }

    /// Hand back the next `N` bytes as an array.
    pub fn next_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.next(N)?);
        Ok(arr)
    }

    /// The number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// How many bytes have been read so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Have all of the bytes been read?
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
