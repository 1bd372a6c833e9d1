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

//! This module provides a [`TypeRegistry`], which can be used to store and resolve
//! type information for types based on their names.

use crate::codec::parse_descriptor;
use crate::error::Error;
use crate::insert_name::{self, InsertName};
use crate::type_def::{Primitive, TypeDef, Variant, VariantDesc};
use crate::type_name::TypeName;
use crate::type_source::{RegistrationError, TypeSource};
use crate::LOG_TARGET;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;

/// A type registry, which can be shared between threads. Types can be
/// registered at any time, including while other threads are resolving types.
///
/// # Example
///
/// ```rust
/// use scale_codec_legacy::{TypeDef, TypeName, TypeRegistry, TypeSource};
///
/// let registry = TypeRegistry::basic();
/// registry.register_custom_types([("Balance", TypeSource::alias("u128"))]).unwrap();
///
/// let def = registry.resolve(&TypeName::parse("Balance").unwrap()).unwrap();
/// assert_eq!(def, TypeDef::AliasOf(TypeName::parse("u128").unwrap()));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    // A map from the normalized name of a type (like `vec` or `balance`) to a
    // description of the shape of the type, which may involve generic params.
    // Entries are never modified in place; they are only ever replaced.
    types: RwLock<HashMap<String, Arc<TypeInfo>>>,
}

#[derive(Debug)]
struct TypeInfo {
    // The generic param names that may be used in the type definition below.
    params: SmallVec<[String; 4]>,
    // A description of the shape of the type.
    def: TypeDef,
}

impl TypeRegistry {
    /// Create a new, empty [`TypeRegistry`]. Only tuples, arrays, `Vec`, `Option`
    /// and `Compact` will resolve until more types are added.
    pub fn empty() -> Self {
        TypeRegistry { types: RwLock::new(HashMap::new()) }
    }

    /// Create a new [`TypeRegistry`] containing the built-in types.
    pub fn basic() -> Self {
        let registry = Self::empty();
        registry.install_builtins();
        registry
    }

    /// Add the built-in types to the registry. Types that are already present,
    /// built-in or otherwise, are left alone, so calling this more than once is harmless.
    pub fn install_builtins(&self) {
        let mut types = self.types.write();
        let mut installed = 0;
        for (name, def) in builtins() {
            if let Entry::Vacant(entry) = types.entry(name.key()) {
                entry.insert(Arc::new(TypeInfo { params: name.params, def }));
                installed += 1;
            }
        }
        log::debug!(target: LOG_TARGET, "Installed {installed} built-in types");
    }

    /// Insert a type into the registry, replacing any existing type with the same name.
    pub fn insert(&self, name: InsertName, def: TypeDef) {
        self.insert_many([(name, def)]);
    }

    /// Insert a type into the registry, parsing the name first.
    pub fn insert_str(&self, name: &str, def: TypeDef) -> Result<(), insert_name::ParseError> {
        self.insert(InsertName::parse(name)?, def);
        Ok(())
    }

    /// Insert a batch of types into the registry. Readers either see none or all of the
    /// batch, and later entries replace earlier ones with the same name.
    pub fn insert_many(&self, types: impl IntoIterator<Item = (InsertName, TypeDef)>) {
        // Build everything before taking the lock, so that writes stay quick.
        let entries: Vec<_> = types
            .into_iter()
            .map(|(name, def)| (name.key(), Arc::new(TypeInfo { params: name.params, def })))
            .collect();

        let mut map = self.types.write();
        map.extend(entries);
    }

    /// Check and register a batch of custom types. Nothing is registered if any of the
    /// names or sources are invalid.
    pub fn register_custom_types<N: AsRef<str>>(
        &self,
        types: impl IntoIterator<Item = (N, TypeSource)>,
    ) -> Result<(), RegistrationError> {
        let entries = types
            .into_iter()
            .map(|(name, source)| {
                let name = name.as_ref();
                let insert_name = InsertName::parse(name)
                    .map_err(|err| RegistrationError::InvalidName { name: name.to_owned(), err })?;
                let def = source.into_type_def(name)?;
                Ok((insert_name, def))
            })
            .collect::<Result<Vec<_>, RegistrationError>>()?;

        log::debug!(target: LOG_TARGET, "Registering {} custom types", entries.len());
        self.insert_many(entries);
        Ok(())
    }

    /// Is there a type registered with the given name? Names are compared ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(&insert_name::normalize(name))
    }

    /// The number of types in the registry.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Resolve a type name into the definition of its shape, with any generic
    /// params substituted for the ones provided.
    pub fn resolve(&self, type_name: &TypeName) -> Result<TypeDef, Error> {
        let (name, params) = match type_name {
            TypeName::Unnamed { params } => return Ok(TypeDef::TupleOf(params.clone())),
            TypeName::Array { param, length } => {
                return Ok(TypeDef::ArrayOf((**param).clone(), *length))
            }
            TypeName::Named { name, params } => (name.as_str(), params),
        };

        // Release the lock before doing any more work with the definition.
        let info = self.types.read().get(&insert_name::normalize(name)).cloned();
        let Some(info) = info else {
            return structural(name, params).ok_or_else(|| Error::UnknownType(name.to_owned()));
        };

        // Complain if you try asking for a type and don't provide the expected number
        // of parameters in place of that type's generics.
        if params.len() != info.params.len() {
            return Err(Error::GenericParamsMismatch {
                type_name: name.to_owned(),
                expected: info.params.len(),
                provided: params.len(),
            });
        }

        // Build a mapping from generic ident to the concrete type name we've been given.
        // We use this to turn generic type names like Vec<T> into concrete ones, like Vec<u32>.
        let param_mapping: SmallVec<[(&str, &TypeName); 4]> =
            info.params.iter().map(|ident| ident.as_str()).zip(params.iter()).collect();

        Ok(info.def.clone().with_params(&param_mapping))
    }

    /// Parse and resolve a type name.
    pub fn resolve_str(&self, type_name: &str) -> Result<TypeDef, Error> {
        self.resolve(&parse_descriptor(type_name)?)
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRegistry").field("len", &self.len()).finish()
    }
}

impl FromIterator<(InsertName, TypeDef)> for TypeRegistry {
    fn from_iter<T: IntoIterator<Item = (InsertName, TypeDef)>>(iter: T) -> Self {
        let registry = TypeRegistry::empty();
        registry.insert_many(iter);
        registry
    }
}

/// The generic forms that are understood even when they haven't been registered.
fn structural(name: &str, params: &[TypeName]) -> Option<TypeDef> {
    let [param] = params else {
        return None;
    };
    let param = param.clone();
    match insert_name::normalize(name).as_str() {
        "vec" => Some(TypeDef::SequenceOf(param)),
        "option" => Some(TypeDef::OptionOf(param)),
        "compact" => Some(TypeDef::Compact(param)),
        _ => None,
    }
}

/// The types that every basic registry starts out with.
fn builtins() -> Vec<(InsertName, TypeDef)> {
    fn name(name: &str, params: &[&str]) -> InsertName {
        InsertName {
            name: name.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
    let t = || TypeName::named("T");

    let mut types = vec![
        (name("bool", &[]), TypeDef::Primitive(Primitive::Bool)),
        (name("char", &[]), TypeDef::Primitive(Primitive::Char)),
        (name("str", &[]), TypeDef::Primitive(Primitive::Str)),
        (name("String", &[]), TypeDef::Primitive(Primitive::Str)),
        (name("Text", &[]), TypeDef::Primitive(Primitive::Str)),
        (name("u8", &[]), TypeDef::Primitive(Primitive::U8)),
        (name("u16", &[]), TypeDef::Primitive(Primitive::U16)),
        (name("u32", &[]), TypeDef::Primitive(Primitive::U32)),
        (name("u64", &[]), TypeDef::Primitive(Primitive::U64)),
        (name("u128", &[]), TypeDef::Primitive(Primitive::U128)),
        (name("u256", &[]), TypeDef::Primitive(Primitive::U256)),
        (name("i8", &[]), TypeDef::Primitive(Primitive::I8)),
        (name("i16", &[]), TypeDef::Primitive(Primitive::I16)),
        (name("i32", &[]), TypeDef::Primitive(Primitive::I32)),
        (name("i64", &[]), TypeDef::Primitive(Primitive::I64)),
        (name("i128", &[]), TypeDef::Primitive(Primitive::I128)),
        (name("i256", &[]), TypeDef::Primitive(Primitive::I256)),
        (name("Bytes", &[]), TypeDef::Bytes),
        (name("Null", &[]), TypeDef::TupleOf(vec![])),
        (name("PhantomData", &["T"]), TypeDef::TupleOf(vec![])),
        (name("Box", &["T"]), TypeDef::AliasOf(t())),
        (name("Cow", &["T"]), TypeDef::AliasOf(t())),
        (name("Option", &["T"]), TypeDef::OptionOf(t())),
        (name("Compact", &["T"]), TypeDef::Compact(t())),
        (
            name("BTreeMap", &["K", "V"]),
            TypeDef::SequenceOf(TypeName::unnamed(vec![
                TypeName::named("K"),
                TypeName::named("V"),
            ])),
        ),
        (
            name("Result", &["T", "E"]),
            TypeDef::EnumOf(vec![
                Variant {
                    index: 0,
                    name: "Ok".to_owned(),
                    fields: VariantDesc::TupleOf(vec![t()]),
                },
                Variant {
                    index: 1,
                    name: "Err".to_owned(),
                    fields: VariantDesc::TupleOf(vec![TypeName::named("E")]),
                },
            ]),
        ),
    ];

    for seq in ["Vec", "VecDeque", "BTreeSet"] {
        types.push((name(seq, &["T"]), TypeDef::SequenceOf(t())));
    }

    types
}
