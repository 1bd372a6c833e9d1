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

//! This module provides the [`Error`] type which is handed back from decoding, encoding
//! and registering types.

use crate::codec::MAX_ZERO_SIZED_LEN;
use crate::compact::MAX_BIG_BYTES;
use crate::type_name::{ParseError, TypeName};
use crate::type_source::RegistrationError;
use num_bigint::BigUint;

/// An error decoding, encoding or registering types. Any failure aborts the whole
/// operation and is handed back unchanged to the top-level caller.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum Error {
    #[display(fmt = "Could not parse type descriptor '{descriptor}': {err}")]
    MalformedDescriptor { descriptor: String, err: ParseError },
    #[display(fmt = "Type '{_0}' not found")]
    UnknownType(String),
    #[display(
        fmt = "Wrong number of generic params provided for {type_name}: \
               expected {expected} but got {provided}"
    )]
    GenericParamsMismatch { type_name: String, expected: usize, provided: usize },
    #[display(fmt = "Not enough bytes: needed {needed} but only {remaining} remain")]
    BufferUnderrun { needed: usize, remaining: usize },
    #[display(fmt = "Compact encoded length {_0} does not fit in a u32")]
    InvalidCompactEncoding(BigUint),
    #[display(fmt = "Invalid discriminant {discriminant} found when decoding {type_name}")]
    InvalidDiscriminant { type_name: String, discriminant: u8 },
    #[display(fmt = "Invalid text found when decoding {type_name}")]
    InvalidText { type_name: String },
    #[display(fmt = "Cannot encode value as {type_name}: {reason}")]
    ValueShapeMismatch { type_name: String, reason: String },
    #[display(fmt = "Value needs {_0} bytes but compact encoding allows at most {}", MAX_BIG_BYTES)]
    ValueTooLarge(usize),
    #[display(fmt = "{_0}")]
    Registration(RegistrationError),
    #[display(
        fmt = "Cannot decode {len} zero sized {type_name} values; at most {} are allowed",
        MAX_ZERO_SIZED_LEN
    )]
    TooManyZeroSizedValues { type_name: String, len: usize },
    #[display(fmt = "Type nesting exceeded the maximum depth of {_0}")]
    DepthLimitExceeded(usize),
    #[display(fmt = "{remaining} bytes were left over after decoding {type_name}")]
    TrailingBytes { type_name: String, remaining: usize },
    #[display(fmt = "Invalid hex string: {_0}")]
    InvalidHex(hex::FromHexError),
}

impl std::error::Error for Error {}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        Error::Registration(err)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidHex(err)
    }
}

impl Error {
    /// The value handed to the encoder doesn't line up with the type we are encoding into.
    pub(crate) fn shape_mismatch(type_name: &TypeName, reason: impl Into<String>) -> Self {
        Error::ValueShapeMismatch { type_name: type_name.to_string(), reason: reason.into() }
    }
}
