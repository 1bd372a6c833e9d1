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

//! This module provides a [`Codec`], which decodes bytes into [`Value`]s and encodes
//! them back again, given the names of types in some [`TypeRegistry`].

use crate::cursor::Cursor;
use crate::error::Error;
use crate::type_name::TypeName;
use crate::type_registry::TypeRegistry;
use crate::value::Value;
use crate::LOG_TARGET;

/// How deeply types may be nested inside each other (counting each alias that
/// is followed) before decoding or encoding gives up, unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The most values that a single sequence or array of zero sized types (like `Vec<()>`)
/// can decode into. Such values take up no bytes, so nothing else limits how many of
/// them a short length prefix can ask for.
pub const MAX_ZERO_SIZED_LEN: usize = 1 << 16;

/// Decode and encode values using the types in a [`TypeRegistry`].
///
/// # Example
///
/// ```rust
/// use scale_codec_legacy::{Codec, Cursor, TypeRegistry, Value};
///
/// let registry = TypeRegistry::basic();
/// let codec = Codec::new(&registry);
///
/// let value = Value::Sequence(vec![1u8.into(), 64u64.into()]);
/// let bytes = codec.encode("(u8, Compact<u64>)", &value).unwrap();
/// assert_eq!(bytes, vec![1, 0x01, 0x01]);
///
/// let value = codec.decode("(u8, Compact<u64>)", &mut Cursor::new(&bytes)).unwrap();
/// assert_eq!(value, Value::Sequence(vec![Value::UInt(1), Value::UInt(64)]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    pub(crate) types: &'r TypeRegistry,
    pub(crate) max_depth: usize,
}

impl<'r> Codec<'r> {
    /// Create a new [`Codec`] which resolves types using the registry given.
    pub fn new(types: &'r TypeRegistry) -> Self {
        Codec { types, max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Configure how deeply types can be nested before we give up.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The registry that types are resolved from.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.types
    }

    /// Decode a value of the type described from the cursor. Only as many bytes as the
    /// type needs are consumed; check [`Cursor::remaining()`] afterwards if needed.
    pub fn decode(&self, descriptor: &str, cursor: &mut Cursor<'_>) -> Result<Value, Error> {
        let ty = parse_descriptor(descriptor)?;
        log::trace!(target: LOG_TARGET, "Decoding {ty} from {} bytes", cursor.remaining());
        self.decode_type(&ty, cursor)
    }

    /// Decode a value of the given type from the cursor.
    pub fn decode_type(&self, ty: &TypeName, cursor: &mut Cursor<'_>) -> Result<Value, Error> {
        self.decode_at(ty, cursor, 0)
    }

    /// Decode a value of the type described, failing if any bytes are left over.
    pub fn decode_all(&self, descriptor: &str, bytes: &[u8]) -> Result<Value, Error> {
        let ty = parse_descriptor(descriptor)?;
        let mut cursor = Cursor::new(bytes);
        log::trace!(target: LOG_TARGET, "Decoding {ty} from exactly {} bytes", bytes.len());

        let value = self.decode_type(&ty, &mut cursor)?;
        if !cursor.is_empty() {
            return Err(Error::TrailingBytes {
                type_name: ty.to_string(),
                remaining: cursor.remaining(),
            });
        }
        Ok(value)
    }

    /// Encode a value as the type described.
    pub fn encode(&self, descriptor: &str, value: &Value) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.encode_to(descriptor, value, &mut out)?;
        Ok(out)
    }

    /// Encode a value as the type described, appending the bytes to `out`. On error, `out`
    /// may contain some partially encoded bytes.
    pub fn encode_to(
        &self,
        descriptor: &str,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> Result<(), Error> {
        let ty = parse_descriptor(descriptor)?;
        log::trace!(target: LOG_TARGET, "Encoding {} as {ty}", value.kind());
        self.encode_type(&ty, value, out)
    }

    /// Encode a value as the given type, appending the bytes to `out`.
    pub fn encode_type(
        &self,
        ty: &TypeName,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> Result<(), Error> {
        self.encode_at(ty, value, out, 0)
    }

    /// Fail if we've gone deeper than we're allowed to.
    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }
        Ok(())
    }
}

/// Parse a type descriptor, reporting any failure as a malformed descriptor.
pub(crate) fn parse_descriptor(descriptor: &str) -> Result<TypeName, Error> {
    TypeName::parse(descriptor)
        .map_err(|err| Error::MalformedDescriptor { descriptor: descriptor.to_owned(), err })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::type_def::TypeDef;
    use crate::type_source::TypeSource;

    #[test]
    fn decode_leaves_unused_bytes() {
        let registry = TypeRegistry::basic();
        let codec = Codec::new(&registry);
        let mut cursor = Cursor::new(&[1, 2, 3]);

        assert_eq!(codec.decode("u16", &mut cursor).unwrap(), Value::UInt(0x0201));
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn decode_all_rejects_trailing_bytes() {
        let registry = TypeRegistry::basic();
        let codec = Codec::new(&registry);

        assert_eq!(codec.decode_all("u16", &[1, 2]).unwrap(), Value::UInt(0x0201));
        assert_eq!(
            codec.decode_all("u16", &[1, 2, 3]),
            Err(Error::TrailingBytes { type_name: "u16".to_owned(), remaining: 1 })
        );
    }

    #[test]
    fn malformed_descriptors_are_reported() {
        let registry = TypeRegistry::basic();
        let codec = Codec::new(&registry);

        assert!(matches!(
            codec.decode("Vec<u8", &mut Cursor::new(&[0])),
            Err(Error::MalformedDescriptor { .. })
        ));
        assert!(matches!(
            codec.encode("[u8; x]", &Value::unit()),
            Err(Error::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn depth_is_limited() {
        let registry = TypeRegistry::basic();
        let codec = Codec::new(&registry).with_max_depth(3);
        let bytes = [1, 1, 1, 7];

        assert_eq!(
            codec.decode("Option<Option<u8>>", &mut Cursor::new(&bytes)).unwrap(),
            Value::some(Value::some(Value::UInt(1)))
        );
        assert_eq!(
            codec.decode("Option<Option<Option<u8>>>", &mut Cursor::new(&bytes)),
            Err(Error::DepthLimitExceeded(3))
        );
        let nested = Value::some(Value::some(Value::some(7u8.into())));
        assert_eq!(
            codec.encode("Option<Option<Option<u8>>>", &nested),
            Err(Error::DepthLimitExceeded(3))
        );
    }

    #[test]
    fn alias_loops_hit_the_depth_limit() {
        let registry = TypeRegistry::basic();
        registry
            .register_custom_types([
                ("Ping", TypeSource::alias("Pong")),
                ("Pong", TypeSource::alias("Ping")),
            ])
            .unwrap();
        let codec = Codec::new(&registry);

        assert_eq!(
            registry.resolve_str("Ping").unwrap(),
            TypeDef::AliasOf(TypeName::named("Pong"))
        );
        assert_eq!(
            codec.decode("Ping", &mut Cursor::new(&[0])),
            Err(Error::DepthLimitExceeded(DEFAULT_MAX_DEPTH))
        );
    }
}
