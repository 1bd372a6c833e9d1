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

//! This module provides the name used to insert types in a registry.

use crate::type_name::TypeName;
use core::fmt::Write;
use smallvec::SmallVec;

/// An error constructing an [`InsertName`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ParseError {
    #[display(fmt = "Failed to parse the string. Expected something like 'Foo' or 'Bar<A, B>'.")]
    Invalid,
    #[display(
        fmt = "Expected the generic params to be names like 'A' or 'B', not arrays or tuples."
    )]
    ExpectingNamedParam,
    #[display(fmt = "Expected the generic params to be capitalized.")]
    ExpectingUppercaseParams,
}

impl std::error::Error for ParseError {}

/// A name used as a key when inserting a type into a [`crate::TypeRegistry`].
///
/// # Example
///
/// ```rust
/// use scale_codec_legacy::InsertName;
///
/// // Names can be plain identifiers:
/// InsertName::parse("Foo").unwrap();
/// // Or they can have generic parameters which
/// // will be resolved during lookup:
/// InsertName::parse("Bar<A,B>").unwrap();
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InsertName {
    pub(crate) name: String,
    pub(crate) params: SmallVec<[String; 4]>,
}

impl InsertName {
    /// Parse a string into an [`InsertName`].
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let ty_name = TypeName::parse(s).map_err(|_| ParseError::Invalid)?;

        // We only accept named types like Foo<A, B> or path::to::Bar.
        let TypeName::Named { name, params } = ty_name else {
            return Err(ParseError::Invalid);
        };

        let params = params
            .into_iter()
            .map(|param| {
                // Params must be simple names and not array/tuples.
                let TypeName::Named { name, params } = param else {
                    return Err(ParseError::ExpectingNamedParam);
                };
                if !params.is_empty() {
                    return Err(ParseError::ExpectingNamedParam);
                }
                // Param names must be capitalized because they represent generics.
                if name.starts_with(|c: char| c.is_lowercase()) {
                    return Err(ParseError::ExpectingUppercaseParams);
                }
                Ok(name.to_string())
            })
            .collect::<Result<_, _>>()?;

        Ok(InsertName { name: name.to_string(), params })
    }

    /// The key under which this name is stored. Lookups ignore case, so
    /// chain metadata that is inconsistent about capitalization still resolves.
    pub(crate) fn key(&self) -> String {
        normalize(&self.name)
    }
}

/// Normalize a type name into a registry key.
pub(crate) fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl core::str::FromStr for InsertName {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::convert::TryFrom<&str> for InsertName {
    type Error = ParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl core::convert::TryFrom<String> for InsertName {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl core::fmt::Debug for InsertName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self)
    }
}

impl core::fmt::Display for InsertName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            f.write_char('<')?;
            for (idx, param) in self.params.iter().enumerate() {
                if idx != 0 {
                    f.write_str(", ")?;
                }
                f.write_str(param)?;
            }
            f.write_char('>')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_names_and_generic_params() {
        let name = InsertName::parse("Registration<Balance>").unwrap();
        assert_eq!(name.name, "Registration");
        assert_eq!(name.params.as_slice(), ["Balance".to_owned()]);
        assert_eq!(name.to_string(), "Registration<Balance>");

        let name = InsertName::parse("sp_core::Foo<A,B>").unwrap();
        assert_eq!(name.to_string(), "sp_core::Foo<A, B>");
        assert_eq!(name.key(), "sp_core::foo");
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(InsertName::parse("(A, B)"), Err(ParseError::Invalid));
        assert_eq!(InsertName::parse("[u8; 32]"), Err(ParseError::Invalid));
        assert_eq!(InsertName::parse("Foo<"), Err(ParseError::Invalid));
        assert_eq!(InsertName::parse("Foo<(A, B)>"), Err(ParseError::ExpectingNamedParam));
        assert_eq!(InsertName::parse("Foo<Vec<A>>"), Err(ParseError::ExpectingNamedParam));
        assert_eq!(InsertName::parse("Foo<a>"), Err(ParseError::ExpectingUppercaseParams));
    }
}
