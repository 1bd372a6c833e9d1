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

//! This module provides a [`TypeDef`] enum, which describes the shape of a type, or in other
//! words, how it should be SCALE encoded/decoded.

use crate::type_name::TypeName;

pub use scale_type_resolver::Primitive;

/// This describes the shape of a type, with the aim of providing enough information
/// that we know how to SCALE encode or decode some named type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// A primitive type.
    Primitive(Primitive),
    /// A compact encoded integer of the given type.
    Compact(TypeName),
    /// An optional value; a `0` byte for `None` or a `1` byte followed by the value.
    OptionOf(TypeName),
    /// A compact length prefix followed by that many values.
    SequenceOf(TypeName),
    /// A fixed number of values with no length prefix.
    ArrayOf(TypeName, usize),
    /// Values of each of the given types one after the other.
    TupleOf(Vec<TypeName>),
    /// Named fields, encoded in the order they are declared.
    StructOf(Vec<Field>),
    /// An enum containing a list of variants.
    EnumOf(Vec<Variant>),
    /// A bitmask where each bit stands for one of the named values.
    SetOf {
        /// How wide the bitmask is.
        store: SetStore,
        /// The name of each bit, starting from the least significant.
        values: Vec<String>,
    },
    /// An alias to some other type in the registry. The
    /// alias can be something like `Vec<T>` or `[u8; 16]` or `Bar`.
    AliasOf(TypeName),
    /// Exactly this many raw bytes. Decodes to text if every byte is printable
    /// ASCII and to `0x` prefixed hex otherwise, so binary data that happens to
    /// be printable will come back as text.
    FixedBytes(usize),
    /// A compact length prefix followed by that many raw bytes.
    Bytes,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The struct field name.
    pub name: String,
    /// The shape of the field value.
    pub value: TypeName,
}

impl Field {
    /// Construct a new field.
    pub fn new(name: impl Into<String>, value: TypeName) -> Self {
        Field { name: name.into(), value }
    }
}

/// An enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// The variant index.
    pub index: u8,
    /// The variant name.
    pub name: String,
    /// Shape of the variant's arguments.
    pub fields: VariantDesc,
}

/// The shape of the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantDesc {
    /// named variant fields are basically a struct.
    StructOf(Vec<Field>),
    /// Unnamed variant fields are basically a tuple of type descriptions.
    TupleOf(Vec<TypeName>),
}

/// The width of the bitmask backing a [`TypeDef::SetOf`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetStore {
    U8,
    U16,
    U32,
    U64,
}

impl SetStore {
    /// Pick the store with the given number of bits, if there is one.
    pub fn from_bits(bits: u32) -> Option<SetStore> {
        match bits {
            8 => Some(SetStore::U8),
            16 => Some(SetStore::U16),
            32 => Some(SetStore::U32),
            64 => Some(SetStore::U64),
            _ => None,
        }
    }

    /// The number of bytes in the bitmask.
    pub fn byte_len(&self) -> usize {
        match self {
            SetStore::U8 => 1,
            SetStore::U16 => 2,
            SetStore::U32 => 4,
            SetStore::U64 => 8,
        }
    }

    /// The number of values that the bitmask can hold.
    pub fn bits(&self) -> usize {
        self.byte_len() * 8
    }
}

impl TypeDef {
    /// Apply a mapping from generic param identifiers to concrete type names to every
    /// type name found in this definition.
    pub(crate) fn with_params(self, mapping: &[(&str, &TypeName)]) -> TypeDef {
        if mapping.is_empty() {
            return self;
        }
        let map = |ty: TypeName| ty.with_substitutions(mapping);
        let map_fields = |fields: Vec<Field>| -> Vec<Field> {
            fields.into_iter().map(|f| Field { name: f.name, value: map(f.value) }).collect()
        };

        match self {
            TypeDef::Compact(ty) => TypeDef::Compact(map(ty)),
            TypeDef::OptionOf(ty) => TypeDef::OptionOf(map(ty)),
            TypeDef::SequenceOf(ty) => TypeDef::SequenceOf(map(ty)),
            TypeDef::ArrayOf(ty, len) => TypeDef::ArrayOf(map(ty), len),
            TypeDef::TupleOf(tys) => TypeDef::TupleOf(tys.into_iter().map(map).collect()),
            TypeDef::StructOf(fields) => TypeDef::StructOf(map_fields(fields)),
            TypeDef::EnumOf(variants) => TypeDef::EnumOf(
                variants
                    .into_iter()
                    .map(|v| Variant {
                        index: v.index,
                        name: v.name,
                        fields: match v.fields {
                            VariantDesc::StructOf(fields) => {
                                VariantDesc::StructOf(map_fields(fields))
                            }
                            VariantDesc::TupleOf(tys) => {
                                VariantDesc::TupleOf(tys.into_iter().map(map).collect())
                            }
                        },
                    })
                    .collect(),
            ),
            TypeDef::AliasOf(ty) => TypeDef::AliasOf(map(ty)),
            def @ (TypeDef::Primitive(_)
            | TypeDef::SetOf { .. }
            | TypeDef::FixedBytes(_)
            | TypeDef::Bytes) => def,
        }
    }
}
