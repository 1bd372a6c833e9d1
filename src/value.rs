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

//! This module provides [`Value`], the dynamically typed result of decoding some bytes
//! and the input to encoding them again.

use crate::utils::to_hex;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use serde::ser::SerializeMap;

/// A value which has been decoded from, or can be encoded into, SCALE bytes.
///
/// Integers that fit into a `u128` or `i128` are kept as such, and anything
/// larger lives in a [`BigUint`] or [`BigInt`]. Decoding always produces the
/// smallest of these that can hold the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A unicode scalar value.
    Char(char),
    /// An unsigned integer that fits into 128 bits.
    UInt(u128),
    /// A signed integer that fits into 128 bits.
    Int(i128),
    /// An unsigned integer of any size.
    BigUInt(BigUint),
    /// A signed integer of any size.
    BigInt(BigInt),
    /// UTF-8 text.
    String(String),
    /// Raw bytes. These are rendered as `0x` prefixed hex.
    Bytes(Vec<u8>),
    /// The values of a sequence, array or tuple, in order.
    Sequence(Vec<Value>),
    /// Struct fields in declaration order.
    Struct(Vec<(String, Value)>),
    /// An enum variant name and its payload, if it has one.
    Variant(String, Option<Box<Value>>),
    /// An optional value.
    Option(Option<Box<Value>>),
    /// The names of the flags set in a bitmask, in declaration order.
    Set(Vec<String>),
}

impl Value {
    /// The unit value `()`, which is an empty sequence.
    pub fn unit() -> Value {
        Value::Sequence(Vec::new())
    }

    /// A struct made up of the given fields.
    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// An enum variant carrying some payload.
    pub fn variant(name: impl Into<String>, payload: Value) -> Value {
        Value::Variant(name.into(), Some(Box::new(payload)))
    }

    /// An enum variant without any payload.
    pub fn unit_variant(name: impl Into<String>) -> Value {
        Value::Variant(name.into(), None)
    }

    /// A present optional value.
    pub fn some(value: Value) -> Value {
        Value::Option(Some(Box::new(value)))
    }

    /// An absent optional value.
    pub fn none() -> Value {
        Value::Option(None)
    }

    /// Build an unsigned integer value, narrowing to [`Value::UInt`] if it fits.
    pub fn from_biguint(n: BigUint) -> Value {
        match n.to_u128() {
            Some(n) => Value::UInt(n),
            None => Value::BigUInt(n),
        }
    }

    /// Build a signed integer value, narrowing to [`Value::Int`] if it fits.
    pub fn from_bigint(n: BigInt) -> Value {
        match n.to_i128() {
            Some(n) => Value::Int(n),
            None => Value::BigInt(n),
        }
    }

    /// If this is a non-negative integer, hand it back as a [`BigUint`].
    pub fn as_biguint(&self) -> Option<BigUint> {
        match self {
            Value::UInt(n) => Some(BigUint::from(*n)),
            Value::BigUInt(n) => Some(n.clone()),
            Value::Int(n) => u128::try_from(*n).ok().map(BigUint::from),
            Value::BigInt(n) => n.to_biguint(),
            _ => None,
        }
    }

    /// If this is an integer, hand it back as a [`BigInt`].
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Value::UInt(n) => Some(BigInt::from(*n)),
            Value::BigUInt(n) => Some(BigInt::from_biguint(Sign::Plus, n.clone())),
            Value::Int(n) => Some(BigInt::from(*n)),
            Value::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// A short description of the kind of value this is, for error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "a bool",
            Value::Char(_) => "a char",
            Value::UInt(_) | Value::BigUInt(_) => "an unsigned integer",
            Value::Int(_) | Value::BigInt(_) => "a signed integer",
            Value::String(_) => "a string",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "a sequence",
            Value::Struct(_) => "a struct",
            Value::Variant(..) => "a variant",
            Value::Option(_) => "an option",
            Value::Set(_) => "a set",
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from!(Bool: bool);
impl_from!(Char: char);
impl_from!(UInt: u8, u16, u32, u64, u128);
impl_from!(Int: i8, i16, i32, i64, i128);
impl_from!(String: &str, String);

impl From<BigUint> for Value {
    fn from(n: BigUint) -> Self {
        Value::from_biguint(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::from_bigint(n)
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Char(c) => serializer.serialize_char(*c),
            // Big numbers are strings, since many consumers can't cope with them as numbers.
            Value::UInt(n) => match u64::try_from(*n) {
                Ok(n) => serializer.serialize_u64(n),
                Err(_) => serializer.collect_str(n),
            },
            Value::Int(n) => match i64::try_from(*n) {
                Ok(n) => serializer.serialize_i64(n),
                Err(_) => serializer.collect_str(n),
            },
            Value::BigUInt(n) => serializer.collect_str(n),
            Value::BigInt(n) => serializer.collect_str(n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&to_hex(b)),
            Value::Sequence(vals) => serializer.collect_seq(vals),
            Value::Struct(fields) => serializer.collect_map(fields.iter().map(|(k, v)| (k, v))),
            // Unit variants are just their name.
            Value::Variant(name, None) => serializer.serialize_str(name),
            Value::Variant(name, Some(payload)) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, payload)?;
                map.end()
            }
            Value::Option(Some(v)) => serializer.serialize_some(v),
            Value::Option(None) => serializer.serialize_none(),
            Value::Set(names) => serializer.collect_seq(names),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integers_narrow_when_they_fit() {
        assert_eq!(Value::from_biguint(BigUint::from(5u8)), Value::UInt(5));
        assert_eq!(
            Value::from_biguint(BigUint::from(u128::MAX) + 1u8),
            Value::BigUInt(BigUint::from(u128::MAX) + 1u8)
        );
        assert_eq!(Value::from_bigint(BigInt::from(-5)), Value::Int(-5));
        assert!(matches!(Value::from_bigint(BigInt::from(i128::MIN) - 1), Value::BigInt(_)));
    }

    #[test]
    fn integers_convert_between_representations() {
        assert_eq!(Value::Int(3).as_biguint(), Some(BigUint::from(3u8)));
        assert_eq!(Value::Int(-3).as_biguint(), None);
        assert_eq!(Value::UInt(3).as_bigint(), Some(BigInt::from(3)));
        assert_eq!(Value::Bool(true).as_bigint(), None);
    }

    #[test]
    fn serializes_to_json_preserving_field_order() {
        let value = Value::variant(
            "Ongoing",
            Value::structure([
                ("end", Value::UInt(806400)),
                ("proposalHash", Value::Bytes(vec![0x29, 0x5c])),
                ("delay", Value::UInt(u128::MAX)),
                ("threshold", Value::unit_variant("SuperMajorityApprove")),
                ("flags", Value::Set(vec!["A".to_owned()])),
                ("maybe", Value::none()),
                ("pair", Value::Sequence(vec![Value::Bool(true), Value::Int(-1)])),
            ]),
        );

        let json = serde_json::to_string(&value).unwrap();
        let expected = concat!(
            r#"{"Ongoing":{"end":806400,"proposalHash":"0x295c","#,
            r#""delay":"340282366920938463463374607431768211455","#,
            r#""threshold":"SuperMajorityApprove","flags":["A"],"maybe":null,"#,
            r#""pair":[true,-1]}}"#
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn unit_variants_serialize_as_their_name() {
        let value = Value::Sequence(vec![
            Value::unit_variant("Finished"),
            Value::variant("Approved", Value::unit()),
            Value::variant("Killed", Value::UInt(7)),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!(["Finished", { "Approved": [] }, { "Killed": 7 }])
        );
    }
}
