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

//! This module provides a [`TypeName`], which can be parsed from a string via [`TypeName::parse`]
//! and represents the name of a type that we'd like to decode or encode.

use smallstr::SmallString;
use yap::{types::StrTokens, IntoTokens, TokenLocation, Tokens};

// Re-export errors in our public interface:
pub use parser::{ParseError, ParseErrorKind, MAX_NESTING};

type NameStr = SmallString<[u8; 16]>;

/// The name of a type, like `Compact<u64>`, `Vec<(AccountId, Balance)>` or `[u8; 32]`.
/// Parsing is purely syntactic; nothing here checks that the names exist anywhere.
///
/// # Example
///
/// ```rust
/// use scale_codec_legacy::TypeName;
///
/// let sequence = TypeName::parse("Vec<(bool, u32)>").unwrap();
/// let array = TypeName::parse("[u8; 32]").unwrap();
/// let tuple = TypeName::parse("(bool, u32, Vec<String>)").unwrap();
///
/// assert_eq!(sequence.to_string(), "Vec<(bool, u32)>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeName {
    /// Types like `Vec<T>`, `Foo` and `path::to::Bar<A,B>`, `i32`, `bool`
    /// etc are _named_ types.
    Named {
        /// The name of the type (eg Vec, i32, bool).
        name: NameStr,
        /// Each of the generic parameters, if any, associated with the type.
        params: Vec<TypeName>,
    },
    /// Tuples like `()` and `(Foo, Bar<A>)` are _unnamed_ types.
    Unnamed {
        /// Each of the types in the tuple.
        params: Vec<TypeName>,
    },
    /// Fixed length arrays like `[Bar; 32]` are _array_ types.
    Array {
        /// The type in the array.
        param: Box<TypeName>,
        /// The fixed length of the array.
        length: usize,
    },
}

impl TypeName {
    /// Parse an input string into a [`TypeName`].
    pub fn parse(input: &str) -> Result<TypeName, ParseError> {
        let mut tokens = input.into_tokens();
        parser::parse_complete_type_name(&mut tokens)
    }

    /// Create a named [`TypeName`] with no parameters.
    pub fn named(name: &str) -> TypeName {
        TypeName::Named { name: NameStr::from_str(name), params: Vec::new() }
    }

    /// Create a named [`TypeName`] with some parameters.
    pub fn named_with_params(name: &str, params: Vec<TypeName>) -> TypeName {
        TypeName::Named { name: NameStr::from_str(name), params }
    }

    /// Create an unnamed/tuple [`TypeName`].
    pub fn unnamed(params: Vec<TypeName>) -> TypeName {
        TypeName::Unnamed { params }
    }

    /// Create an array [`TypeName`].
    pub fn array(param: TypeName, length: usize) -> TypeName {
        TypeName::Array { param: Box::new(param), length }
    }

    /// Is this the unit type `()`?
    pub fn is_unit(&self) -> bool {
        matches!(self, TypeName::Unnamed { params } if params.is_empty())
    }

    /// Substitute named types for others. This is useful if we have a type name
    /// like `Vec<T>` and want to turn it into a concrete type like `Vec<u32>`. Only
    /// names without parameters of their own are replaced, and all replacements
    /// happen at once, so a replacement is never itself substituted.
    pub(crate) fn with_substitutions(self, mapping: &[(&str, &TypeName)]) -> TypeName {
        let map_params = |params: Vec<TypeName>| -> Vec<TypeName> {
            params.into_iter().map(|p| p.with_substitutions(mapping)).collect()
        };

        match self {
            TypeName::Named { name, params } if params.is_empty() => {
                match mapping.iter().find(|(ident, _)| name.as_str() == *ident) {
                    Some((_, replacement)) => (*replacement).clone(),
                    None => TypeName::Named { name, params },
                }
            }
            TypeName::Named { name, params } => {
                TypeName::Named { name, params: map_params(params) }
            }
            TypeName::Unnamed { params } => TypeName::Unnamed { params: map_params(params) },
            TypeName::Array { param, length } => {
                TypeName::Array { param: Box::new(param.with_substitutions(mapping)), length }
            }
        }
    }
}

impl core::fmt::Display for TypeName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fn write_params(
            f: &mut core::fmt::Formatter<'_>,
            params: &[TypeName],
        ) -> core::fmt::Result {
            for (idx, param) in params.iter().enumerate() {
                if idx != 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            Ok(())
        }

        match self {
            TypeName::Named { name, params } => {
                f.write_str(name)?;
                if !params.is_empty() {
                    f.write_str("<")?;
                    write_params(f, params)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeName::Unnamed { params } => {
                f.write_str("(")?;
                write_params(f, params)?;
                f.write_str(")")
            }
            TypeName::Array { param, length } => write!(f, "[{param}; {length}]"),
        }
    }
}

impl core::str::FromStr for TypeName {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::convert::TryFrom<&str> for TypeName {
    type Error = ParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

// Logic for parsing strings into type names.
mod parser {
    use super::*;

    /// How deeply type names can be nested inside each other before we give up parsing.
    pub const MAX_NESTING: usize = 128;

    /// An error that can be emitted as the result of trying to parse a string into a [`TypeName`].
    #[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
    #[display(fmt = "Error parsing string into type name at character {loc}: {err}")]
    pub struct ParseError {
        /// Index into the string denoting the position of the error.
        pub loc: usize,
        /// More information about the error.
        pub err: ParseErrorKind,
    }

    impl std::error::Error for ParseError {}

    impl ParseError {
        /// Construct a new `ParseError` for tokens at the given location.
        pub fn new_at<E: Into<ParseErrorKind>>(err: E, loc: usize) -> Self {
            Self { loc, err: err.into() }
        }
    }

    /// The kind of error that happened attempting to parse a string into a [`TypeName`].
    #[allow(missing_docs)]
    #[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
    pub enum ParseErrorKind {
        #[display(fmt = "The string did not look like a type name at all.")]
        InvalidName,
        #[display(fmt = "A closing `)` was missing when attempting to parse a tuple type name.")]
        ClosingParenMissing,
        #[display(
            fmt = "A closing `>` was missing when attempting to parse the generics of a named type."
        )]
        ClosingAngleBracketMissing,
        #[display(fmt = "A closing `]` was missing when attempting to parse an array type.")]
        ClosingSquareBracketMissing,
        #[display(fmt = "Expected a `;` between the type and length of an array.")]
        SemicolonMissing,
        #[display(fmt = "The length of the array is invalid; expecting an unsigned integer.")]
        InvalidUnsignedInt,
        #[display(fmt = "Expected at least one generic parameter between `<` and `>`.")]
        EmptyGenericParams,
        #[display(fmt = "Unexpected characters were found after the type name.")]
        UnexpectedTrailingInput,
        #[display(fmt = "Type names cannot be nested more than {} deep.", MAX_NESTING)]
        TooDeeplyNested,
    }

    pub fn parse_complete_type_name(input: &mut StrTokens<'_>) -> Result<TypeName, ParseError> {
        skip_whitespace(input);
        let type_name = parse_type_name(input, 0)?;
        skip_whitespace(input);

        if input.peek().is_some() {
            let loc = input.location().offset();
            return Err(ParseError::new_at(ParseErrorKind::UnexpectedTrailingInput, loc));
        }
        Ok(type_name)
    }

    fn parse_type_name(input: &mut StrTokens<'_>, depth: usize) -> Result<TypeName, ParseError> {
        let loc = input.location();
        try_parse_type_name(input, depth)
            .unwrap_or_else(|| Err(ParseError::new_at(ParseErrorKind::InvalidName, loc.offset())))
    }

    fn try_parse_type_name(
        input: &mut StrTokens<'_>,
        depth: usize,
    ) -> Option<Result<TypeName, ParseError>> {
        if depth >= MAX_NESTING {
            let loc = input.location().offset();
            return Some(Err(ParseError::new_at(ParseErrorKind::TooDeeplyNested, loc)));
        }
        yap::one_of!(input;
            parse_unnamed_into_type_name(input, depth),
            parse_array_into_type_name(input, depth),
            parse_named_into_type_name(input, depth),
        )
    }

    // Parse a named type like Vec<bool>, i32, bool, Foo.
    fn parse_named_into_type_name(
        input: &mut StrTokens<'_>,
        depth: usize,
    ) -> Option<Result<TypeName, ParseError>> {
        let name = parse_path(input);
        if name.is_empty() {
            return None;
        }

        skip_whitespace(input);
        if !input.token('<') {
            // No generics; return just the name:
            return Some(Ok(TypeName::named(name)));
        }

        let params_loc = input.location().offset();
        let params = match parse_comma_separated_type_names(input, depth) {
            Ok(params) => params,
            Err(err) => return Some(Err(err)),
        };

        if !input.token('>') {
            let loc = input.location().offset();
            Some(Err(ParseError::new_at(ParseErrorKind::ClosingAngleBracketMissing, loc)))
        } else if params.is_empty() {
            Some(Err(ParseError::new_at(ParseErrorKind::EmptyGenericParams, params_loc)))
        } else {
            Some(Ok(TypeName::named_with_params(name, params)))
        }
    }

    // Parse an unnamed (tuple) type like () or (bool, Foo, Bar<T>).
    fn parse_unnamed_into_type_name(
        input: &mut StrTokens<'_>,
        depth: usize,
    ) -> Option<Result<TypeName, ParseError>> {
        if !input.token('(') {
            return None;
        }

        let params = match parse_comma_separated_type_names(input, depth) {
            Ok(params) => params,
            Err(err) => return Some(Err(err)),
        };

        if !input.token(')') {
            let loc = input.location().offset();
            Some(Err(ParseError::new_at(ParseErrorKind::ClosingParenMissing, loc)))
        } else {
            Some(Ok(TypeName::Unnamed { params }))
        }
    }

    // Parse a fixed length array like [Foo; 32].
    fn parse_array_into_type_name(
        input: &mut StrTokens<'_>,
        depth: usize,
    ) -> Option<Result<TypeName, ParseError>> {
        if !input.token('[') {
            return None;
        }

        skip_whitespace(input);
        let param = match parse_type_name(input, depth + 1) {
            Ok(param) => param,
            Err(e) => return Some(Err(e)),
        };

        skip_whitespace(input);
        if !input.token(';') {
            let loc = input.location().offset();
            return Some(Err(ParseError::new_at(ParseErrorKind::SemicolonMissing, loc)));
        }
        skip_whitespace(input);

        let loc = input.location().offset();
        let length: usize =
            match input.take_while(|toks| toks.is_ascii_digit()).parse::<usize, String>() {
                Ok(n) => n,
                Err(_) => {
                    return Some(Err(ParseError::new_at(ParseErrorKind::InvalidUnsignedInt, loc)))
                }
            };

        skip_whitespace(input);
        if !input.token(']') {
            let loc = input.location().offset();
            Some(Err(ParseError::new_at(ParseErrorKind::ClosingSquareBracketMissing, loc)))
        } else {
            Some(Ok(TypeName::Array { param: Box::new(param), length }))
        }
    }

    // Parse a list of type names like Foo,Bar,usize. An empty list is allowed.
    fn parse_comma_separated_type_names(
        input: &mut StrTokens<'_>,
        depth: usize,
    ) -> Result<Vec<TypeName>, ParseError> {
        skip_whitespace(input);

        let mut params_iter = input.sep_by(
            |toks| try_parse_type_name(toks, depth + 1),
            |toks| toks.surrounded_by(|toks| toks.token(','), |toks| skip_whitespace(toks)),
        );

        let mut params = Vec::new();
        for res in params_iter.as_iter() {
            params.push(res?);
        }

        skip_whitespace(input);
        // Allow trailing comma but don't mandate it (ie we don't check the bool).
        input.token(',');
        skip_whitespace(input);

        Ok(params)
    }

    // Parse the name/path of a type like `Foo` or `a::b::Foo`.
    fn parse_path<'a>(input: &mut StrTokens<'a>) -> &'a str {
        str_slice_from(input, |toks| {
            toks.sep_by(
                |t| {
                    // First char should exist and be a letter or underscore.
                    let first = t.peek()?;
                    if !first.is_alphabetic() && first != '_' {
                        return None;
                    }
                    // Rest can be letters, numbers or underscores.
                    t.skip_while(|c| c.is_alphanumeric() || *c == '_');
                    Some(())
                },
                |t| {
                    // Our separator is `::`.
                    t.tokens("::".chars())
                },
            )
            .consume();
        })
    }

    // Skip over any whitespace, ignoring it.
    fn skip_whitespace(input: &mut StrTokens<'_>) {
        input.skip_while(|t| t.is_whitespace());
    }

    // Return the string slice that encompasses the provided parsing function given.
    fn str_slice_from<'a, F>(input: &mut StrTokens<'a>, f: F) -> &'a str
    where
        F: FnOnce(&mut StrTokens<'a>),
    {
        let before = input.remaining();
        f(input);
        let leftover = input.remaining().len();

        &before[..before.len() - leftover]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_parse(input: &str, type_name: TypeName) {
        let tn = match TypeName::parse(input) {
            Ok(tn) => tn,
            Err(e) => panic!("parsing '{input}' into {type_name:?} failed: {e}"),
        };

        assert_eq!(tn, type_name, "parsing '{input}' into {type_name:?} failed: mismatch");
    }

    fn expect_parse_fail(input: &str) -> ParseErrorKind {
        match TypeName::parse(input) {
            Ok(tn) => panic!("parsing '{input}' is expected to have failed, but got {tn:?}"),
            Err(e) => e.err,
        }
    }

    #[test]
    fn parsing_named_types_works() {
        assert_parse("Foo", TypeName::named("Foo"));
        assert_parse("  Foo ", TypeName::named("Foo"));
        assert_parse("path::to::Foo", TypeName::named("path::to::Foo"));
        assert_parse("Foo_bar2", TypeName::named("Foo_bar2"));
        assert_parse("Bar<u32>", TypeName::named_with_params("Bar", vec![TypeName::named("u32")]));
        assert_parse(
            "Bar<u32, Foo<bool>>",
            TypeName::named_with_params(
                "Bar",
                vec![
                    TypeName::named("u32"),
                    TypeName::named_with_params("Foo", vec![TypeName::named("bool")]),
                ],
            ),
        );
        assert_parse(
            "Bar<u32,bool,   i64,>",
            TypeName::named_with_params(
                "Bar",
                vec![TypeName::named("u32"), TypeName::named("bool"), TypeName::named("i64")],
            ),
        );
    }

    #[test]
    fn parsing_unnamed_tuple_types_works() {
        assert_parse("()", TypeName::unnamed(vec![]));
        assert_parse("(  )", TypeName::unnamed(vec![]));
        assert_parse("(Foo,)", TypeName::unnamed(vec![TypeName::named("Foo")]));
        assert_parse(
            "(bool,    i32,Bar<Wibble>, ())",
            TypeName::unnamed(vec![
                TypeName::named("bool"),
                TypeName::named("i32"),
                TypeName::named_with_params("Bar", vec![TypeName::named("Wibble")]),
                TypeName::unnamed(vec![]),
            ]),
        );
    }

    #[test]
    fn parsing_array_types_works() {
        assert_parse("[Bar ;   10]", TypeName::array(TypeName::named("Bar"), 10));
        assert_parse("[Bar;1]", TypeName::array(TypeName::named("Bar"), 1));
        assert_parse(
            "[Bar<Wibble>;1]",
            TypeName::array(TypeName::named_with_params("Bar", vec![TypeName::named("Wibble")]), 1),
        );
        assert_parse("[u8; 32 ]", TypeName::array(TypeName::named("u8"), 32));
    }

    #[test]
    fn parsing_complex_nested_type_works() {
        assert_parse(
            "Foo<(Option<Wibble<[(u8, Bar);12],Compact<()>>>,bool)>",
            TypeName::named_with_params(
                "Foo",
                vec![TypeName::unnamed(vec![
                    TypeName::named_with_params(
                        "Option",
                        vec![TypeName::named_with_params(
                            "Wibble",
                            vec![
                                TypeName::array(
                                    TypeName::unnamed(vec![
                                        TypeName::named("u8"),
                                        TypeName::named("Bar"),
                                    ]),
                                    12,
                                ),
                                TypeName::named_with_params(
                                    "Compact",
                                    vec![TypeName::unnamed(vec![])],
                                ),
                            ],
                        )],
                    ),
                    TypeName::named("bool"),
                ])],
            ),
        )
    }

    #[test]
    fn parse_fails() {
        // Numbers can't come first in identifiers.
        assert_eq!(expect_parse_fail("3thing"), ParseErrorKind::InvalidName);
        assert_eq!(expect_parse_fail("(bool,3)"), ParseErrorKind::ClosingParenMissing);
        assert_eq!(expect_parse_fail(""), ParseErrorKind::InvalidName);

        // Arrays need a `;` and then a number.
        assert_eq!(expect_parse_fail("[usize; Foo]"), ParseErrorKind::InvalidUnsignedInt);
        assert_eq!(expect_parse_fail("[usize 32]"), ParseErrorKind::SemicolonMissing);

        // Brackets must be closed, and not closed more than once.
        assert_eq!(expect_parse_fail("(Foo, Bar"), ParseErrorKind::ClosingParenMissing);
        assert_eq!(expect_parse_fail("[Foo; 32"), ParseErrorKind::ClosingSquareBracketMissing);
        assert_eq!(expect_parse_fail("Foo<A, B"), ParseErrorKind::ClosingAngleBracketMissing);
        assert_eq!(expect_parse_fail("Foo<A>>"), ParseErrorKind::UnexpectedTrailingInput);
        assert_eq!(expect_parse_fail("Foo)"), ParseErrorKind::UnexpectedTrailingInput);

        // Generic brackets need something inside them.
        assert_eq!(expect_parse_fail("Foo<>"), ParseErrorKind::EmptyGenericParams);
    }

    #[test]
    fn deeply_nested_names_fail_to_parse() {
        let depth = MAX_NESTING + 10;
        let input = format!("{}u8{}", "Vec<".repeat(depth), ">".repeat(depth));
        assert_eq!(expect_parse_fail(&input), ParseErrorKind::TooDeeplyNested);

        let input = format!("{}{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(expect_parse_fail(&input), ParseErrorKind::TooDeeplyNested);

        let depth = MAX_NESTING / 2;
        let input = format!("{}u8{}", "Vec<".repeat(depth), ">".repeat(depth));
        assert!(TypeName::parse(&input).is_ok());
    }

    #[test]
    fn with_substitution_works() {
        // Tuple with 4 entries:
        // - The original type name.
        // - The ident we want to replace with something else.
        // - The thing to replace the ident with.
        // - The expected type name after replacement.
        let cases = [
            ("Foo<T>", "T", "(A,B,C)", "Foo<(A, B, C)>"),
            ("T", "T", "Vec<u64>", "Vec<u64>"),
            ("(T, T, u32, T, T)", "T", "[u64; 3]", "([u64; 3], [u64; 3], u32, [u64; 3], [u64; 3])"),
            ("Vec<T>", "T", "U", "Vec<U>"),
            ("Foo<T, (A, [T; 32])>", "T", "U", "Foo<U, (A, [U; 32])>"),
            // Don't match types with params; they are not generics so should be left alone:
            ("(T<A>, T)", "T", "U", "(T<A>, U)"),
        ];

        for (original, find, replace_with, expected) in cases {
            let original_ty = TypeName::parse(original).unwrap();
            let replacement = TypeName::parse(replace_with).unwrap();
            let new_ty = original_ty.with_substitutions(&[(find, &replacement)]);
            assert_eq!(expected, new_ty.to_string());
        }
    }

    #[test]
    fn displaying_types_works() {
        let ty_name_strs = [
            "u32",
            "Foo",
            "Foo<T>",
            "Foo<A, B, C>",
            "[u8; 32]",
            "[Foo<A>; 32]",
            "()",
            "(A, B, C)",
            "Foo<(A, B, C<D>), [u8; 32], Bar<T>>",
        ];

        for ty_name_str in ty_name_strs {
            let ty_name = TypeName::parse(ty_name_str).unwrap();
            assert_eq!(ty_name.to_string(), ty_name_str);
        }
    }
}
