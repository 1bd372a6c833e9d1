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

//! Encoding [`Value`]s into SCALE bytes. This mirrors the decoding logic, and
//! fails whenever a value doesn't line up exactly with the shape of its type.

use crate::codec::Codec;
use crate::compact;
use crate::error::Error;
use crate::type_def::{Field, Primitive, SetStore, TypeDef, Variant, VariantDesc};
use crate::type_name::TypeName;
use crate::utils::{from_hex, strip_hex_prefix};
use crate::value::Value;

impl Codec<'_> {
    pub(crate) fn encode_at(
        &self,
        ty: &TypeName,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), Error> {
        self.check_depth(depth)?;
        let depth = depth + 1;

        match self.types.resolve(ty)? {
            TypeDef::Primitive(primitive) => encode_primitive(ty, primitive, value, out),
            TypeDef::Compact(inner) => {
                self.types.resolve(&inner)?;
                let Some(n) = value.as_biguint() else {
                    return Err(expected(ty, "an unsigned integer", value));
                };
                compact::encode(&n, out)
            }
            TypeDef::OptionOf(inner) => match value {
                Value::Option(None) => {
                    out.push(0);
                    Ok(())
                }
                Value::Option(Some(inner_value)) => {
                    out.push(1);
                    self.encode_at(&inner, inner_value, out, depth)
                }
                _ => Err(expected(ty, "an option", value)),
            },
            TypeDef::SequenceOf(inner) => {
                let Value::Sequence(values) = value else {
                    return Err(expected(ty, "a sequence", value));
                };
                compact::encode_len(values.len(), out);
                values.iter().try_for_each(|v| self.encode_at(&inner, v, out, depth))
            }
            TypeDef::ArrayOf(inner, len) => {
                let values = expect_sequence(ty, value, len)?;
                values.iter().try_for_each(|v| self.encode_at(&inner, v, out, depth))
            }
            TypeDef::TupleOf(tys) => self.encode_tuple(ty, &tys, value, out, depth),
            TypeDef::StructOf(fields) => self.encode_struct(ty, &fields, value, out, depth),
            TypeDef::EnumOf(variants) => self.encode_enum(ty, &variants, value, out, depth),
            TypeDef::SetOf { store, values } => encode_set(ty, store, &values, value, out),
            TypeDef::AliasOf(target) => self.encode_at(&target, value, out, depth),
            TypeDef::FixedBytes(len) => {
                out.extend_from_slice(&fixed_bytes(ty, value, len)?);
                Ok(())
            }
            TypeDef::Bytes => {
                let bytes = text_or_hex_bytes(ty, value)?;
                compact::encode_len(bytes.len(), out);
                out.extend_from_slice(&bytes);
                Ok(())
            }
        }
    }

    fn encode_tuple(
        &self,
        ty: &TypeName,
        tys: &[TypeName],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), Error> {
        let values = expect_sequence(ty, value, tys.len())?;
        tys.iter().zip(values).try_for_each(|(t, v)| self.encode_at(t, v, out, depth))
    }

    fn encode_struct(
        &self,
        ty: &TypeName,
        fields: &[Field],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), Error> {
        let Value::Struct(values) = value else {
            return Err(expected(ty, "a struct", value));
        };
        if values.len() != fields.len() {
            return Err(Error::shape_mismatch(
                ty,
                format!("expected {} fields but got {}", fields.len(), values.len()),
            ));
        }

        // Fields are written in declaration order, whatever order they were given in.
        for field in fields {
            let Some((_, v)) = values.iter().find(|(name, _)| *name == field.name) else {
                return Err(Error::shape_mismatch(ty, format!("field '{}' is missing", field.name)));
            };
            self.encode_at(&field.value, v, out, depth)?;
        }
        Ok(())
    }

    fn encode_enum(
        &self,
        ty: &TypeName,
        variants: &[Variant],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), Error> {
        let Value::Variant(name, payload) = value else {
            return Err(expected(ty, "a variant", value));
        };
        let Some(variant) = variants.iter().find(|v| v.name == *name) else {
            return Err(Error::shape_mismatch(ty, format!("there is no variant named '{name}'")));
        };

        out.push(variant.index);
        match (&variant.fields, payload.as_deref()) {
            // A unit payload is as good as none at all.
            (VariantDesc::TupleOf(tys), None) if tys.is_empty() => Ok(()),
            (VariantDesc::TupleOf(tys), Some(Value::Sequence(vals)))
                if tys.is_empty() && vals.is_empty() =>
            {
                Ok(())
            }
            (VariantDesc::TupleOf(tys), Some(v)) if tys.len() == 1 => {
                self.encode_at(&tys[0], v, out, depth)
            }
            (VariantDesc::TupleOf(tys), Some(v)) if tys.len() > 1 => {
                self.encode_tuple(ty, tys, v, out, depth)
            }
            (VariantDesc::StructOf(fields), Some(v)) => {
                self.encode_struct(ty, fields, v, out, depth)
            }
            (_, None) => Err(Error::shape_mismatch(
                ty,
                format!("variant '{name}' expects a payload but none was given"),
            )),
            (_, Some(_)) => Err(Error::shape_mismatch(
                ty,
                format!("variant '{name}' has no payload but one was given"),
            )),
        }
    }
}

fn encode_primitive(
    ty: &TypeName,
    primitive: Primitive,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(b)) => out.push(u8::from(*b)),
        (Primitive::Char, Value::Char(c)) => out.extend_from_slice(&u32::from(*c).to_le_bytes()),
        (Primitive::Str, Value::String(s)) => {
            compact::encode_len(s.len(), out);
            out.extend_from_slice(s.as_bytes());
        }
        (Primitive::U8, _) => encode_unsigned(ty, value, 1, out)?,
        (Primitive::U16, _) => encode_unsigned(ty, value, 2, out)?,
        (Primitive::U32, _) => encode_unsigned(ty, value, 4, out)?,
        (Primitive::U64, _) => encode_unsigned(ty, value, 8, out)?,
        (Primitive::U128, _) => encode_unsigned(ty, value, 16, out)?,
        (Primitive::U256, _) => encode_unsigned(ty, value, 32, out)?,
        (Primitive::I8, _) => encode_signed(ty, value, 1, out)?,
        (Primitive::I16, _) => encode_signed(ty, value, 2, out)?,
        (Primitive::I32, _) => encode_signed(ty, value, 4, out)?,
        (Primitive::I64, _) => encode_signed(ty, value, 8, out)?,
        (Primitive::I128, _) => encode_signed(ty, value, 16, out)?,
        (Primitive::I256, _) => encode_signed(ty, value, 32, out)?,
        (Primitive::Bool, _) => return Err(expected(ty, "a bool", value)),
        (Primitive::Char, _) => return Err(expected(ty, "a char", value)),
        (Primitive::Str, _) => return Err(expected(ty, "a string", value)),
    }
    Ok(())
}

/// Write an unsigned integer as exactly `width` little endian bytes.
fn encode_unsigned(
    ty: &TypeName,
    value: &Value,
    width: usize,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let Some(n) = value.as_biguint() else {
        return Err(expected(ty, "an unsigned integer", value));
    };
    if n.bits() > (width * 8) as u64 {
        return Err(Error::shape_mismatch(ty, format!("{n} is out of range")));
    }
    let mut bytes = n.to_bytes_le();
    bytes.resize(width, 0);
    out.extend_from_slice(&bytes);
    Ok(())
}

/// Write a signed integer as exactly `width` little endian two's complement bytes.
fn encode_signed(
    ty: &TypeName,
    value: &Value,
    width: usize,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let Some(n) = value.as_bigint() else {
        return Err(expected(ty, "an integer", value));
    };
    // This is the shortest two's complement form, so anything longer doesn't fit.
    let mut bytes = n.to_signed_bytes_le();
    if bytes.len() > width {
        return Err(Error::shape_mismatch(ty, format!("{n} is out of range")));
    }
    let fill = if n.sign() == num_bigint::Sign::Minus { 0xff } else { 0x00 };
    bytes.resize(width, fill);
    out.extend_from_slice(&bytes);
    Ok(())
}

fn encode_set(
    ty: &TypeName,
    store: SetStore,
    names: &[String],
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let Value::Set(set) = value else {
        return Err(expected(ty, "a set", value));
    };

    let mut mask = 0u64;
    for name in set {
        let Some(bit) = names.iter().position(|n| n == name) else {
            return Err(Error::shape_mismatch(ty, format!("'{name}' is not in the set")));
        };
        if bit >= store.bits() {
            return Err(Error::shape_mismatch(
                ty,
                format!("'{name}' does not fit in a {} bit set", store.bits()),
            ));
        }
        mask |= 1 << bit;
    }
    out.extend_from_slice(&mask.to_le_bytes()[..store.byte_len()]);
    Ok(())
}

/// The bytes for a fixed length byte string. A `0x` prefixed string is read as hex only
/// when that gives exactly `len` bytes, so that printable bytes which decoded to text
/// starting with `0x` encode back to the same bytes.
fn fixed_bytes(ty: &TypeName, value: &Value, len: usize) -> Result<Vec<u8>, Error> {
    let bytes = match value {
        Value::String(s) => match strip_hex_prefix(s).map(hex::decode) {
            Some(Ok(bytes)) if bytes.len() == len => bytes,
            _ if s.len() == len => s.as_bytes().to_vec(),
            Some(Ok(bytes)) => bytes,
            Some(Err(err)) => return Err(err.into()),
            None => s.as_bytes().to_vec(),
        },
        _ => text_or_hex_bytes(ty, value)?,
    };

    if bytes.len() != len {
        return Err(Error::shape_mismatch(
            ty,
            format!("expected {len} bytes but got {}", bytes.len()),
        ));
    }
    Ok(bytes)
}

/// Raw bytes are taken as they are, `0x` prefixed strings are hex decoded and any
/// other string is taken to be text.
fn text_or_hex_bytes(ty: &TypeName, value: &Value) -> Result<Vec<u8>, Error> {
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::String(s) => match strip_hex_prefix(s) {
            Some(_) => from_hex(s),
            None => Ok(s.as_bytes().to_vec()),
        },
        _ => Err(expected(ty, "bytes or a string", value)),
    }
}

/// Expect a sequence of exactly `len` values.
fn expect_sequence<'v>(ty: &TypeName, value: &'v Value, len: usize) -> Result<&'v [Value], Error> {
    let Value::Sequence(values) = value else {
        return Err(expected(ty, "a sequence", value));
    };
    if values.len() != len {
        return Err(Error::shape_mismatch(
            ty,
            format!("expected {len} values but got {}", values.len()),
        ));
    }
    Ok(values)
}

fn expected(ty: &TypeName, wanted: &str, got: &Value) -> Error {
    Error::shape_mismatch(ty, format!("expected {wanted} but got {}", got.kind()))
}
