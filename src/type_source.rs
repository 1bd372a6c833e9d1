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

//! This module provides [`TypeSource`], a loose description of a custom type as it
//! tends to be written down in chain type definition files, which is checked and
//! turned into a [`TypeDef`] when registered.

use crate::insert_name;
use crate::type_def::{Field, SetStore, TypeDef, Variant, VariantDesc};
use crate::type_name::{self, TypeName};
use hashbrown::HashSet;

/// An error registering a custom type.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum RegistrationError {
    #[display(fmt = "Cannot register type '{name}': {err}")]
    InvalidName { name: String, err: insert_name::ParseError },
    #[display(fmt = "Cannot register type '{name}': the '{field}' field is required")]
    MissingField { name: String, field: &'static str },
    #[display(fmt = "Cannot register type '{name}': could not parse '{type_string}': {err}")]
    InvalidTypeString { name: String, type_string: String, err: type_name::ParseError },
    #[display(
        fmt = "Cannot register type '{name}': bit length {bit_length} is not one of 8, 16, 32 or 64"
    )]
    InvalidBitLength { name: String, bit_length: u32 },
    #[display(
        fmt = "Cannot register type '{name}': {values} set values do not fit in {bits} bits"
    )]
    TooManySetValues { name: String, values: usize, bits: usize },
    #[display(
        fmt = "Cannot register type '{name}': {variants} variants do not fit in a u8 index"
    )]
    TooManyVariants { name: String, variants: usize },
    #[display(fmt = "Cannot register type '{name}': more than one variant has index {index}")]
    DuplicateVariantIndex { name: String, index: u8 },
    #[display(
        fmt = "Cannot register type '{name}': variant '{variant}' has both a type_string \
               and a type_mapping"
    )]
    ConflictingVariantPayload { name: String, variant: String },
}

impl std::error::Error for RegistrationError {}

/// Enum variant payloads written as one of these have no payload at all.
const EMPTY_PAYLOADS: [&str; 3] = ["", "()", "Null"];

/// The description of a custom type to register. This deserializes from
/// something like:
///
/// ```json
/// { "type": "struct", "type_mapping": [["index", "u32"], ["name", "Vec<u8>"]] }
/// ```
///
/// Only the fields relevant to the given [`TypeSourceKind`] are looked at.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TypeSource {
    /// What sort of type this is.
    #[serde(rename = "type")]
    pub kind: TypeSourceKind,
    /// The target of an alias, or the inner type of a compact.
    #[serde(default)]
    pub type_string: Option<String>,
    /// Struct fields, or enum variants and their payloads, in order.
    #[serde(default)]
    pub type_mapping: Option<Vec<(String, String)>>,
    /// Set flags, or enum variants without payloads, in order.
    #[serde(default)]
    pub value_list: Option<Vec<String>>,
    /// Enum variants with explicit indexes or named fields. Preferred over
    /// `type_mapping` and `value_list` when given.
    #[serde(default)]
    pub variant_list: Option<Vec<VariantSource>>,
    /// The number of bits backing a set. Defaults to 32.
    #[serde(default)]
    pub bit_length: Option<u32>,
    /// The number of bytes in a fixed length byte string.
    #[serde(default)]
    pub fixed_length: Option<usize>,
}

/// The sort of type that a [`TypeSource`] describes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSourceKind {
    #[serde(alias = "string")]
    Alias,
    Compact,
    Struct,
    Enum,
    Set,
    FixedBytes,
}

/// One variant of an enum [`TypeSource`], for when variants need explicit indexes or
/// named fields. This deserializes from something like:
///
/// ```json
/// { "name": "Transfer", "index": 5, "type_mapping": [["to", "AccountId"], ["value", "u128"]] }
/// ```
///
/// A variant with neither a `type_string` nor a `type_mapping` has no payload.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct VariantSource {
    /// The name of the variant.
    pub name: String,
    /// The index written before the payload. Defaults to the variant's position.
    #[serde(default)]
    pub index: Option<u8>,
    /// A single unnamed payload.
    #[serde(default)]
    pub type_string: Option<String>,
    /// Named payload fields, in order.
    #[serde(default)]
    pub type_mapping: Option<Vec<(String, String)>>,
}

impl VariantSource {
    /// A variant with the given name and no payload.
    pub fn new(name: impl Into<String>) -> Self {
        VariantSource { name: name.into(), index: None, type_string: None, type_mapping: None }
    }

    /// Give the variant an explicit index.
    pub fn with_index(mut self, index: u8) -> Self {
        self.index = Some(index);
        self
    }

    /// Give the variant a single unnamed payload.
    pub fn with_type(mut self, type_string: impl Into<String>) -> Self {
        self.type_string = Some(type_string.into());
        self
    }

    /// Give the variant named payload fields.
    pub fn with_fields<N: Into<String>, T: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = (N, T)>,
    ) -> Self {
        self.type_mapping = Some(fields.into_iter().map(|(n, t)| (n.into(), t.into())).collect());
        self
    }
}

impl TypeSource {
    fn new(kind: TypeSourceKind) -> Self {
        TypeSource {
            kind,
            type_string: None,
            type_mapping: None,
            value_list: None,
            variant_list: None,
            bit_length: None,
            fixed_length: None,
        }
    }

    /// An alias to the given type string.
    pub fn alias(type_string: impl Into<String>) -> Self {
        TypeSource { type_string: Some(type_string.into()), ..Self::new(TypeSourceKind::Alias) }
    }

    /// A compact encoding of the given type string.
    pub fn compact(type_string: impl Into<String>) -> Self {
        TypeSource { type_string: Some(type_string.into()), ..Self::new(TypeSourceKind::Compact) }
    }

    /// A struct with the given field names and type strings.
    pub fn struct_of<N: Into<String>, T: Into<String>>(
        fields: impl IntoIterator<Item = (N, T)>,
    ) -> Self {
        TypeSource {
            type_mapping: Some(fields.into_iter().map(|(n, t)| (n.into(), t.into())).collect()),
            ..Self::new(TypeSourceKind::Struct)
        }
    }

    /// An enum with the given variant names and payload type strings. A payload of
    /// `""`, `"()"` or `"Null"` means that the variant has no payload.
    pub fn enum_of<N: Into<String>, T: Into<String>>(
        variants: impl IntoIterator<Item = (N, T)>,
    ) -> Self {
        TypeSource {
            type_mapping: Some(variants.into_iter().map(|(n, t)| (n.into(), t.into())).collect()),
            ..Self::new(TypeSourceKind::Enum)
        }
    }

    /// An enum whose variants have no payloads.
    pub fn enum_of_values<N: Into<String>>(names: impl IntoIterator<Item = N>) -> Self {
        TypeSource {
            value_list: Some(names.into_iter().map(Into::into).collect()),
            ..Self::new(TypeSourceKind::Enum)
        }
    }

    /// An enum built from full variant descriptions.
    pub fn enum_of_variants(variants: impl IntoIterator<Item = VariantSource>) -> Self {
        TypeSource {
            variant_list: Some(variants.into_iter().collect()),
            ..Self::new(TypeSourceKind::Enum)
        }
    }

    /// A set of flags, stored in a bitmask of the given width.
    pub fn set_of<N: Into<String>>(names: impl IntoIterator<Item = N>, bit_length: u32) -> Self {
        TypeSource {
            value_list: Some(names.into_iter().map(Into::into).collect()),
            bit_length: Some(bit_length),
            ..Self::new(TypeSourceKind::Set)
        }
    }

    /// Exactly this many bytes.
    pub fn fixed_bytes(length: usize) -> Self {
        TypeSource { fixed_length: Some(length), ..Self::new(TypeSourceKind::FixedBytes) }
    }

    /// Check this source and turn it into a [`TypeDef`]. `name` is only used for
    /// error messages.
    pub fn into_type_def(self, name: &str) -> Result<TypeDef, RegistrationError> {
        let missing = |field| RegistrationError::MissingField { name: name.to_owned(), field };
        let parse = |type_string: String| {
            TypeName::parse(&type_string).map_err(|err| RegistrationError::InvalidTypeString {
                name: name.to_owned(),
                type_string,
                err,
            })
        };
        let parse_fields =
            |mapping: Vec<(String, String)>| -> Result<Vec<Field>, RegistrationError> {
                mapping.into_iter().map(|(field, ty)| Ok(Field::new(field, parse(ty)?))).collect()
            };

        let def = match self.kind {
            TypeSourceKind::Alias => {
                let ty = self.type_string.ok_or_else(|| missing("type_string"))?;
                TypeDef::AliasOf(parse(ty)?)
            }
            TypeSourceKind::Compact => {
                let ty = self.type_string.ok_or_else(|| missing("type_string"))?;
                TypeDef::Compact(parse(ty)?)
            }
            TypeSourceKind::Struct => {
                let mapping = self.type_mapping.ok_or_else(|| missing("type_mapping"))?;
                TypeDef::StructOf(parse_fields(mapping)?)
            }
            TypeSourceKind::Enum => {
                let sources = match (self.variant_list, self.type_mapping, self.value_list) {
                    (Some(variants), _, _) => variants,
                    (None, Some(mapping), _) => mapping
                        .into_iter()
                        .map(|(n, t)| VariantSource::new(n).with_type(t))
                        .collect(),
                    (None, None, Some(values)) => {
                        values.into_iter().map(VariantSource::new).collect()
                    }
                    (None, None, None) => return Err(missing("type_mapping")),
                };
                let too_many = || RegistrationError::TooManyVariants {
                    name: name.to_owned(),
                    variants: sources.len(),
                };
                if sources.len() > 256 {
                    return Err(too_many());
                }

                let mut variants = Vec::with_capacity(sources.len());
                let mut seen = HashSet::new();
                for (position, source) in sources.iter().enumerate() {
                    let index = match source.index {
                        Some(index) => index,
                        None => u8::try_from(position).map_err(|_| too_many())?,
                    };
                    if !seen.insert(index) {
                        return Err(RegistrationError::DuplicateVariantIndex {
                            name: name.to_owned(),
                            index,
                        });
                    }

                    let fields = match (&source.type_string, &source.type_mapping) {
                        (Some(_), Some(_)) => {
                            return Err(RegistrationError::ConflictingVariantPayload {
                                name: name.to_owned(),
                                variant: source.name.clone(),
                            })
                        }
                        (None, Some(mapping)) => {
                            VariantDesc::StructOf(parse_fields(mapping.clone())?)
                        }
                        (Some(ty), None) if !EMPTY_PAYLOADS.contains(&ty.trim()) => {
                            VariantDesc::TupleOf(vec![parse(ty.clone())?])
                        }
                        _ => VariantDesc::TupleOf(vec![]),
                    };
                    variants.push(Variant { index, name: source.name.clone(), fields });
                }
                TypeDef::EnumOf(variants)
            }
            TypeSourceKind::Set => {
                let values = self.value_list.ok_or_else(|| missing("value_list"))?;
                let bit_length = self.bit_length.unwrap_or(32);
                let store = SetStore::from_bits(bit_length).ok_or_else(|| {
                    RegistrationError::InvalidBitLength { name: name.to_owned(), bit_length }
                })?;
                if values.len() > store.bits() {
                    return Err(RegistrationError::TooManySetValues {
                        name: name.to_owned(),
                        values: values.len(),
                        bits: store.bits(),
                    });
                }
                TypeDef::SetOf { store, values }
            }
            TypeSourceKind::FixedBytes => {
                TypeDef::FixedBytes(self.fixed_length.ok_or_else(|| missing("fixed_length"))?)
            }
        };

        Ok(def)
    }
}
