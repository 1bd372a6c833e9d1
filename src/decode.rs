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

//! Decoding SCALE bytes into [`Value`]s, driven by the shape of each type.

use crate::codec::{Codec, MAX_ZERO_SIZED_LEN};
use crate::compact;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::type_def::{Field, Primitive, SetStore, TypeDef, Variant, VariantDesc};
use crate::type_name::TypeName;
use crate::utils::is_printable_ascii;
use crate::value::Value;
use num_bigint::{BigInt, BigUint};

impl Codec<'_> {
    pub(crate) fn decode_at(
        &self,
        ty: &TypeName,
        cursor: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Value, Error> {
        self.check_depth(depth)?;
        let depth = depth + 1;

        match self.types.resolve(ty)? {
            TypeDef::Primitive(primitive) => decode_primitive(ty, primitive, cursor),
            TypeDef::Compact(inner) => {
                // The inner type has to exist, but doesn't change how the bytes are read.
                self.types.resolve(&inner)?;
                Ok(Value::from_biguint(compact::decode(cursor)?))
            }
            TypeDef::OptionOf(inner) => match cursor.next_u8()? {
                0 => Ok(Value::none()),
                1 => Ok(Value::some(self.decode_at(&inner, cursor, depth)?)),
                discriminant => {
                    Err(Error::InvalidDiscriminant { type_name: ty.to_string(), discriminant })
                }
            },
            TypeDef::SequenceOf(inner) => {
                let len = compact::decode_len(cursor)?;
                self.decode_values(&inner, len, cursor, depth)
            }
            TypeDef::ArrayOf(inner, len) => self.decode_values(&inner, len, cursor, depth),
            TypeDef::TupleOf(tys) => self.decode_tuple(&tys, cursor, depth),
            TypeDef::StructOf(fields) => self.decode_struct(&fields, cursor, depth),
            TypeDef::EnumOf(variants) => self.decode_enum(ty, &variants, cursor, depth),
            TypeDef::SetOf { store, values } => decode_set(store, &values, cursor),
            TypeDef::AliasOf(target) => self.decode_at(&target, cursor, depth),
            TypeDef::FixedBytes(len) => {
                let bytes = cursor.next(len)?;
                // Printable bytes become text and anything else becomes hex, so binary
                // data which happens to be printable will come back as text.
                if is_printable_ascii(bytes) {
                    Ok(Value::String(bytes.iter().map(|&b| char::from(b)).collect()))
                } else {
                    Ok(Value::Bytes(bytes.to_vec()))
                }
            }
            TypeDef::Bytes => {
                let len = compact::decode_len(cursor)?;
                Ok(Value::Bytes(cursor.next(len)?.to_vec()))
            }
        }
    }

    fn decode_values(
        &self,
        ty: &TypeName,
        len: usize,
        cursor: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Value, Error> {
        // Every value takes up at least a byte, except for the odd zero sized type, so
        // don't trust the length to preallocate more than the input could possibly hold.
        let mut values = Vec::with_capacity(len.min(cursor.remaining()));
        for _ in 0..len {
            let before = cursor.remaining();
            values.push(self.decode_at(ty, cursor, depth)?);

            // If one value took up no bytes then none of them will, so the input
            // puts no bound on how many we'd build.
            if cursor.remaining() == before && len > MAX_ZERO_SIZED_LEN {
                return Err(Error::TooManyZeroSizedValues { type_name: ty.to_string(), len });
            }
        }
        Ok(Value::Sequence(values))
    }

    fn decode_tuple(
        &self,
        tys: &[TypeName],
        cursor: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Value, Error> {
        let values = tys
            .iter()
            .map(|ty| self.decode_at(ty, cursor, depth))
            .collect::<Result<_, _>>()?;
        Ok(Value::Sequence(values))
    }

    fn decode_struct(
        &self,
        fields: &[Field],
        cursor: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Value, Error> {
        let fields = fields
            .iter()
            .map(|field| Ok((field.name.clone(), self.decode_at(&field.value, cursor, depth)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Value::Struct(fields))
    }

    fn decode_enum(
        &self,
        ty: &TypeName,
        variants: &[Variant],
        cursor: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Value, Error> {
        let discriminant = cursor.next_u8()?;
        let Some(variant) = variants.iter().find(|v| v.index == discriminant) else {
            return Err(Error::InvalidDiscriminant { type_name: ty.to_string(), discriminant });
        };

        let payload = match &variant.fields {
            VariantDesc::TupleOf(tys) if tys.is_empty() => None,
            VariantDesc::TupleOf(tys) if tys.len() == 1 => {
                Some(self.decode_at(&tys[0], cursor, depth)?)
            }
            VariantDesc::TupleOf(tys) => Some(self.decode_tuple(tys, cursor, depth)?),
            VariantDesc::StructOf(fields) => Some(self.decode_struct(fields, cursor, depth)?),
        };

        Ok(Value::Variant(variant.name.clone(), payload.map(Box::new)))
    }
}

fn decode_primitive(
    ty: &TypeName,
    primitive: Primitive,
    cursor: &mut Cursor<'_>,
) -> Result<Value, Error> {
    let invalid_text = || Error::InvalidText { type_name: ty.to_string() };

    let value = match primitive {
        Primitive::Bool => match cursor.next_u8()? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            discriminant => {
                return Err(Error::InvalidDiscriminant { type_name: ty.to_string(), discriminant })
            }
        },
        Primitive::Char => {
            let n = u32::from_le_bytes(cursor.next_array()?);
            Value::Char(char::from_u32(n).ok_or_else(invalid_text)?)
        }
        Primitive::Str => {
            let len = compact::decode_len(cursor)?;
            let bytes = cursor.next(len)?;
            Value::String(String::from_utf8(bytes.to_vec()).map_err(|_| invalid_text())?)
        }
        Primitive::U8 => Value::UInt(u8::from_le_bytes(cursor.next_array()?).into()),
        Primitive::U16 => Value::UInt(u16::from_le_bytes(cursor.next_array()?).into()),
        Primitive::U32 => Value::UInt(u32::from_le_bytes(cursor.next_array()?).into()),
        Primitive::U64 => Value::UInt(u64::from_le_bytes(cursor.next_array()?).into()),
        Primitive::U128 => Value::UInt(u128::from_le_bytes(cursor.next_array()?)),
        Primitive::U256 => Value::from_biguint(BigUint::from_bytes_le(cursor.next(32)?)),
        Primitive::I8 => Value::Int(i8::from_le_bytes(cursor.next_array()?).into()),
        Primitive::I16 => Value::Int(i16::from_le_bytes(cursor.next_array()?).into()),
        Primitive::I32 => Value::Int(i32::from_le_bytes(cursor.next_array()?).into()),
        Primitive::I64 => Value::Int(i64::from_le_bytes(cursor.next_array()?).into()),
        Primitive::I128 => Value::Int(i128::from_le_bytes(cursor.next_array()?)),
        Primitive::I256 => Value::from_bigint(BigInt::from_signed_bytes_le(cursor.next(32)?)),
    };

    Ok(value)
}

fn decode_set(store: SetStore, values: &[String], cursor: &mut Cursor<'_>) -> Result<Value, Error> {
    let bytes = cursor.next(store.byte_len())?;
    let mask = bytes.iter().rev().fold(0u64, |mask, &b| (mask << 8) | u64::from(b));

    // Values beyond the width of the store can never be set.
    let names = values
        .iter()
        .take(store.bits())
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, name)| name.clone())
        .collect();
    Ok(Value::Set(names))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::type_registry::TypeRegistry;
    use crate::type_source::TypeSource;
    use hex_literal::hex;

    fn decode(registry: &TypeRegistry, ty: &str, bytes: &[u8]) -> Result<Value, Error> {
        Codec::new(registry).decode(ty, &mut Cursor::new(bytes))
    }

    #[test]
    fn decodes_primitives() {
        let registry = TypeRegistry::basic();
        let cases: &[(&str, &[u8], Value)] = &[
            ("bool", &hex!("01"), Value::Bool(true)),
            ("u8", &hex!("ff"), Value::UInt(255)),
            ("u16", &hex!("3412"), Value::UInt(0x1234)),
            ("u32", &hex!("78563412"), Value::UInt(0x12345678)),
            ("u64", &hex!("ffffffffffffffff"), Value::UInt(u64::MAX.into())),
            ("u128", &[0xff; 16], Value::UInt(u128::MAX)),
            ("i8", &hex!("ff"), Value::Int(-1)),
            ("i16", &hex!("00 80"), Value::Int(i16::MIN.into())),
            ("i64", &hex!("feffffffffffffff"), Value::Int(-2)),
            ("char", &hex!("61000000"), Value::Char('a')),
            ("String", &hex!("14 68656c6c6f"), Value::String("hello".to_owned())),
            ("Bytes", &hex!("08 dead"), Value::Bytes(vec![0xde, 0xad])),
            ("()", &[], Value::unit()),
        ];

        for (ty, bytes, expected) in cases {
            assert_eq!(&decode(&registry, ty, bytes).unwrap(), expected, "decoding {ty}");
        }
    }

    #[test]
    fn decodes_256_bit_integers() {
        let registry = TypeRegistry::basic();

        let mut bytes = [0xff; 32];
        assert_eq!(
            decode(&registry, "u256", &bytes).unwrap(),
            Value::BigUInt((BigUint::from(1u8) << 256) - 1u8)
        );
        assert_eq!(decode(&registry, "i256", &bytes).unwrap(), Value::Int(-1));

        bytes[31] = 0x7f;
        assert_eq!(
            decode(&registry, "i256", &bytes).unwrap(),
            Value::BigInt((BigInt::from(1) << 255) - 1)
        );
    }

    #[test]
    fn decodes_compacts() {
        let registry = TypeRegistry::basic();

        assert_eq!(decode(&registry, "Compact<u32>", &hex!("fd03")).unwrap(), Value::UInt(255));
        assert_eq!(
            decode(&registry, "Compact<U64>", &hex!("0b86db86912e01")).unwrap(),
            Value::UInt(1299521657734)
        );
        assert_eq!(
            decode(&registry, "Compact<Foo>", &hex!("00")),
            Err(Error::UnknownType("Foo".to_owned()))
        );
    }

    #[test]
    fn decodes_options() {
        let registry = TypeRegistry::basic();

        assert_eq!(decode(&registry, "Option<u16>", &hex!("00")).unwrap(), Value::none());
        assert_eq!(
            decode(&registry, "Option<u16>", &hex!("01 0100")).unwrap(),
            Value::some(Value::UInt(1))
        );
        assert_eq!(
            decode(&registry, "Option<bool>", &hex!("01 00")).unwrap(),
            Value::some(Value::Bool(false))
        );
        assert_eq!(
            decode(&registry, "Option<u16>", &hex!("02")),
            Err(Error::InvalidDiscriminant { type_name: "Option<u16>".to_owned(), discriminant: 2 })
        );
    }

    #[test]
    fn decodes_sequences_arrays_and_tuples() {
        let registry = TypeRegistry::basic();

        assert_eq!(
            decode(&registry, "Vec<u16>", &hex!("08 0100 0200")).unwrap(),
            Value::Sequence(vec![Value::UInt(1), Value::UInt(2)])
        );
        assert_eq!(
            decode(&registry, "[bool; 4]", &hex!("00000100")).unwrap(),
            Value::Sequence(vec![
                Value::Bool(false),
                Value::Bool(false),
                Value::Bool(true),
                Value::Bool(false)
            ])
        );
        assert_eq!(
            decode(&registry, "(u8, Vec<bool>)", &hex!("07 04 01")).unwrap(),
            Value::Sequence(vec![Value::UInt(7), Value::Sequence(vec![Value::Bool(true)])])
        );
        assert_eq!(
            decode(&registry, "BTreeMap<u8, bool>", &hex!("04 09 01")).unwrap(),
            Value::Sequence(vec![Value::Sequence(vec![Value::UInt(9), Value::Bool(true)])])
        );
    }

    #[test]
    fn huge_sequence_lengths_do_not_preallocate() {
        let registry = TypeRegistry::basic();

        // A length of 2^30 - 1 with only one element present.
        assert_eq!(
            decode(&registry, "Vec<u8>", &hex!("feffffff 01")),
            Err(Error::BufferUnderrun { needed: 1, remaining: 0 })
        );
        // A length which doesn't fit in a u32.
        assert!(matches!(
            decode(&registry, "Vec<u8>", &hex!("07 0000000001")),
            Err(Error::InvalidCompactEncoding(_))
        ));
    }

    #[test]
    fn decodes_structs_and_enums() {
        let registry = TypeRegistry::basic();
        registry
            .register_custom_types([
                (
                    "ReferendumStatus",
                    TypeSource::struct_of([("end", "u32"), ("delay", "u32"), ("approved", "bool")]),
                ),
                (
                    "ReferendumInfo",
                    TypeSource::enum_of([("Ongoing", "ReferendumStatus"), ("Finished", "Null")]),
                ),
            ])
            .unwrap();

        assert_eq!(
            decode(&registry, "ReferendumInfo", &hex!("00 00500c00 00000000 01")).unwrap(),
            Value::variant(
                "Ongoing",
                Value::structure([
                    ("end", Value::UInt(806400)),
                    ("delay", Value::UInt(0)),
                    ("approved", Value::Bool(true)),
                ])
            )
        );
        assert_eq!(
            decode(&registry, "ReferendumInfo", &hex!("01")).unwrap(),
            Value::unit_variant("Finished")
        );
        assert_eq!(
            decode(&registry, "ReferendumInfo", &hex!("02")),
            Err(Error::InvalidDiscriminant {
                type_name: "ReferendumInfo".to_owned(),
                discriminant: 2
            })
        );
        assert_eq!(
            decode(&registry, "Result<u8, bool>", &hex!("01 01")).unwrap(),
            Value::variant("Err", Value::Bool(true))
        );
    }

    #[test]
    fn enums_with_sparse_indexes_and_multiple_fields() {
        let registry = TypeRegistry::basic();
        registry
            .insert_str(
                "Event",
                TypeDef::EnumOf(vec![
                    Variant {
                        index: 3,
                        name: "Transfer".to_owned(),
                        fields: VariantDesc::TupleOf(vec![
                            TypeName::named("u8"),
                            TypeName::named("u16"),
                        ]),
                    },
                    Variant {
                        index: 7,
                        name: "Burn".to_owned(),
                        fields: VariantDesc::StructOf(vec![Field::new(
                            "amount",
                            TypeName::named("u8"),
                        )]),
                    },
                ]),
            )
            .unwrap();

        assert_eq!(
            decode(&registry, "Event", &hex!("03 01 0200")).unwrap(),
            Value::variant("Transfer", Value::Sequence(vec![Value::UInt(1), Value::UInt(2)]))
        );
        assert_eq!(
            decode(&registry, "Event", &hex!("07 05")).unwrap(),
            Value::variant("Burn", Value::structure([("amount", Value::UInt(5))]))
        );
        assert!(matches!(
            decode(&registry, "Event", &hex!("00")),
            Err(Error::InvalidDiscriminant { discriminant: 0, .. })
        ));
    }

    #[test]
    fn decodes_sets_in_declaration_order() {
        let registry = TypeRegistry::basic();
        registry
            .register_custom_types([
                (
                    "CustomSet",
                    TypeSource::set_of(["Value1", "Value2", "Value3", "Value4", "Value5"], 32),
                ),
                ("SmallSet", TypeSource::set_of(["A", "B", "C"], 8)),
            ])
            .unwrap();

        assert_eq!(
            decode(&registry, "CustomSet", &hex!("03000000")).unwrap(),
            Value::Set(vec!["Value1".to_owned(), "Value2".to_owned()])
        );
        assert_eq!(
            decode(&registry, "SmallSet", &hex!("05")).unwrap(),
            Value::Set(vec!["A".to_owned(), "C".to_owned()])
        );
        assert_eq!(
            decode(&registry, "CustomSet", &hex!("0300")),
            Err(Error::BufferUnderrun { needed: 4, remaining: 2 })
        );
    }

    #[test]
    fn zero_sized_sequences_are_bounded() {
        let registry = TypeRegistry::basic();

        assert_eq!(
            decode(&registry, "Vec<()>", &hex!("0c")).unwrap(),
            Value::Sequence(vec![Value::unit(); 3])
        );
        assert_eq!(
            decode(&registry, "Vec<()>", &hex!("03ffffffff")),
            Err(Error::TooManyZeroSizedValues {
                type_name: "()".to_owned(),
                len: u32::MAX as usize
            })
        );
        assert_eq!(
            decode(&registry, "Vec<Null>", &hex!("feffffff")),
            Err(Error::TooManyZeroSizedValues {
                type_name: "Null".to_owned(),
                len: (1 << 30) - 1
            })
        );
        assert!(matches!(
            decode(&registry, "[PhantomData<u8>; 100000]", &[]),
            Err(Error::TooManyZeroSizedValues { len: 100000, .. })
        ));

        // Exactly at the limit is fine.
        let len = MAX_ZERO_SIZED_LEN;
        let mut bytes = Vec::new();
        compact::encode_len(len, &mut bytes);
        assert_eq!(
            decode(&registry, "Vec<()>", &bytes).unwrap(),
            Value::Sequence(vec![Value::unit(); len])
        );
    }

    #[test]
    fn sets_wider_than_their_store_do_not_panic() {
        let registry = TypeRegistry::basic();
        let names = |n: usize| (0..n).map(|i| format!("F{i}")).collect::<Vec<_>>();
        registry
            .insert_str("WideSet", TypeDef::SetOf { store: SetStore::U64, values: names(65) })
            .unwrap();
        registry
            .insert_str("NarrowSet", TypeDef::SetOf { store: SetStore::U8, values: names(9) })
            .unwrap();

        assert_eq!(decode(&registry, "WideSet", &[0xff; 8]).unwrap(), Value::Set(names(64)));
        assert_eq!(decode(&registry, "NarrowSet", &hex!("ff")).unwrap(), Value::Set(names(8)));
    }

    #[test]
    fn fixed_bytes_sniff_for_text() {
        let registry = TypeRegistry::basic();
        registry.register_custom_types([("Name", TypeSource::fixed_bytes(4))]).unwrap();

        assert_eq!(decode(&registry, "Name", b"Dot!").unwrap(), Value::String("Dot!".to_owned()));
        assert_eq!(
            decode(&registry, "Name", &hex!("00ff0102")).unwrap(),
            Value::Bytes(vec![0x00, 0xff, 0x01, 0x02])
        );
    }

    #[test]
    fn bad_input_is_rejected() {
        let registry = TypeRegistry::basic();

        assert_eq!(
            decode(&registry, "u32", &hex!("010203")),
            Err(Error::BufferUnderrun { needed: 4, remaining: 3 })
        );
        assert_eq!(
            decode(&registry, "bool", &hex!("02")),
            Err(Error::InvalidDiscriminant { type_name: "bool".to_owned(), discriminant: 2 })
        );
        assert_eq!(
            decode(&registry, "String", &hex!("04 ff")),
            Err(Error::InvalidText { type_name: "String".to_owned() })
        );
        assert_eq!(
            decode(&registry, "char", &hex!("00d80000")),
            Err(Error::InvalidText { type_name: "char".to_owned() })
        );
        assert_eq!(
            decode(&registry, "Foo", &hex!("00")),
            Err(Error::UnknownType("Foo".to_owned()))
        );
    }
}
