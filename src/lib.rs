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

//! This crate decodes SCALE encoded bytes into dynamic [`Value`]s, and encodes them back again,
//! using type information that is looked up by name (ie the sort of type information that is
//! handed back in pre-V14 Substrate metadata, like `Vec<(AccountId, Balance)>`).
//!
//! Types are resolved from a [`TypeRegistry`], which starts out knowing about primitive types
//! and the common generic ones like `Vec<T>`, `Option<T>` and `Compact<T>`, and to which custom
//! types can be added at any time via [`TypeRegistry::register_custom_types()`]. Use a [`Codec`]
//! to decode or encode values given some registry.
//!
//! A process-wide registry is also provided, along with the free functions [`decode()`],
//! [`encode()`] and [`register_custom_types()`] which make use of it.
//!
//! # Example
//!
//! ```rust
//! use scale_codec_legacy::{TypeSource, Value};
//!
//! scale_codec_legacy::register_custom_types([
//!     ("ExampleFlags", TypeSource::set_of(["Value1", "Value2", "Value3"], 32)),
//! ])
//! .unwrap();
//!
//! let value = scale_codec_legacy::decode_hex("ExampleFlags", "0x03000000").unwrap();
//! assert_eq!(value, Value::Set(vec!["Value1".to_owned(), "Value2".to_owned()]));
//! ```

#![deny(missing_docs)]

mod decode;
mod encode;

pub mod codec;
pub mod compact;
pub mod cursor;
pub mod error;
pub mod insert_name;
pub mod type_def;
pub mod type_name;
pub mod type_registry;
pub mod type_source;
pub mod utils;
pub mod value;

// Export the main types here for ease of use:
pub use {
    codec::Codec,
    cursor::Cursor,
    error::Error,
    insert_name::InsertName,
    type_def::{Field, Primitive, SetStore, TypeDef, Variant, VariantDesc},
    type_name::TypeName,
    type_registry::TypeRegistry,
    type_source::{RegistrationError, TypeSource, TypeSourceKind, VariantSource},
    value::Value,
};

use once_cell::sync::Lazy;

/// The target used for all log messages emitted by this crate.
pub(crate) const LOG_TARGET: &str = "scale-codec-legacy";

static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::basic);

/// The process-wide [`TypeRegistry`] used by the free functions in this crate. The built-in
/// types are installed the first time that it's accessed.
pub fn global_registry() -> &'static TypeRegistry {
    &GLOBAL_REGISTRY
}

/// Make sure that the built-in types are present in the process-wide registry. Types which
/// have already been registered under the same names are left alone.
pub fn install_builtins() {
    global_registry().install_builtins();
}

/// Check and add custom types to the process-wide registry. This can be called at any
/// time and from any number of threads.
pub fn register_custom_types<N: AsRef<str>>(
    types: impl IntoIterator<Item = (N, TypeSource)>,
) -> Result<(), RegistrationError> {
    global_registry().register_custom_types(types)
}

/// Decode a value of the type described from the start of the bytes provided, using the
/// process-wide registry. Any bytes left over are ignored; use [`Codec::decode_all()`] to
/// reject them instead.
pub fn decode(descriptor: &str, bytes: &[u8]) -> Result<Value, Error> {
    Codec::new(global_registry()).decode(descriptor, &mut Cursor::new(bytes))
}

/// Like [`decode()`], but the bytes are given as a hex string, optionally prefixed with `0x`.
pub fn decode_hex(descriptor: &str, hex: &str) -> Result<Value, Error> {
    decode(descriptor, &utils::from_hex(hex)?)
}

/// Encode a value as the type described, using the process-wide registry.
pub fn encode(descriptor: &str, value: &Value) -> Result<Vec<u8>, Error> {
    Codec::new(global_registry()).encode(descriptor, value)
}
