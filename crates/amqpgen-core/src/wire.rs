//! Reference codec that executes a method's decode/encode plans at runtime.
//!
//! It follows the same layout and byte rules as the generated Rust code, and
//! backs the CLI's `decode` command.

use std::fmt;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::WireError;
use crate::ir::{DecodeStep, EncodeStep, IrField, IrMethod, IrProtocol, PrimitiveType};
use crate::transform::bit_packer::{BITS_PER_BYTE, pack_bits, unpack_bits};

/// A dynamically typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Octet(u8),
    Short(u16),
    Long(u32),
    LongLong(u64),
    Bit(bool),
    ShortString(String),
    LongString(String),
    /// Encoded field-table body, without its `u32` length prefix.
    Table(Vec<u8>),
    Timestamp(u64),
}

impl Value {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Octet(_) => PrimitiveType::Octet,
            Value::Short(_) => PrimitiveType::Short,
            Value::Long(_) => PrimitiveType::Long,
            Value::LongLong(_) => PrimitiveType::LongLong,
            Value::Bit(_) => PrimitiveType::Bit,
            Value::ShortString(_) => PrimitiveType::ShortString,
            Value::LongString(_) => PrimitiveType::LongString,
            Value::Table(_) => PrimitiveType::Table,
            Value::Timestamp(_) => PrimitiveType::Timestamp,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Octet(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::LongLong(v) | Value::Timestamp(v) => write!(f, "{v}"),
            Value::Bit(v) => write!(f, "{v}"),
            Value::ShortString(s) | Value::LongString(s) => write!(f, "{s:?}"),
            Value::Table(body) => write!(f, "table({} bytes)", body.len()),
        }
    }
}

/// Decode a frame against the method declared for `(class_id, method_id)`.
///
/// Returns `Ok(None)` when no such method exists.
pub fn decode_frame<'a>(
    protocol: &'a IrProtocol,
    class_id: u16,
    method_id: u16,
    payload: &[u8],
) -> Result<Option<(&'a IrMethod, Vec<Value>)>, WireError> {
    let Some(method) = protocol.find_method(class_id, method_id) else {
        return Ok(None);
    };
    let values = decode_arguments(method, payload)?;
    Ok(Some((method, values)))
}

/// Decode a method's argument payload into one value per field.
///
/// Bytes left over after the last argument are ignored.
pub fn decode_arguments(method: &IrMethod, payload: &[u8]) -> Result<Vec<Value>, WireError> {
    let mut reader = payload;
    let mut values: Vec<Option<Value>> = vec![None; method.fields.len()];
    let mut flags = [false; BITS_PER_BYTE];

    for step in method.decode_plan() {
        match step {
            DecodeStep::Read { field } => {
                values[field] = Some(read_value(&mut reader, &method.fields[field])?);
            }
            DecodeStep::ReadBitByte => {
                let byte = reader
                    .read_u8()
                    .map_err(|_| WireError::Truncated("bit flags".to_string()))?;
                flags = unpack_bits(byte);
            }
            DecodeStep::TakeBit { field, bit } => {
                values[field] = Some(Value::Bit(flags[usize::from(bit)]));
            }
        }
    }

    Ok(values.into_iter().flatten().collect())
}

/// Encode one value per field into a method's argument payload.
pub fn encode_arguments(method: &IrMethod, values: &[Value]) -> Result<Vec<u8>, WireError> {
    if values.len() != method.fields.len() {
        return Err(WireError::Arity {
            expected: method.fields.len(),
            actual: values.len(),
        });
    }
    for (field, value) in method.fields.iter().zip(values) {
        if value.primitive_type() != field.field_type {
            return Err(WireError::TypeMismatch {
                name: field.name.original.clone(),
                expected: field.field_type.to_string(),
            });
        }
    }

    let mut buf = Vec::new();
    for step in method.encode_plan() {
        match step {
            EncodeStep::Write { field } => {
                write_value(&mut buf, &method.fields[field], &values[field])?;
            }
            EncodeStep::WriteBits { fields } => {
                let bits: Vec<bool> = fields
                    .iter()
                    .map(|&i| matches!(values[i], Value::Bit(true)))
                    .collect();
                buf.extend(pack_bits(&bits));
            }
        }
    }
    Ok(buf)
}

fn read_value(reader: &mut &[u8], field: &IrField) -> Result<Value, WireError> {
    let truncated = |_| WireError::Truncated(field.name.original.clone());

    let value = match field.field_type {
        PrimitiveType::Octet => Value::Octet(reader.read_u8().map_err(truncated)?),
        PrimitiveType::Short => Value::Short(reader.read_u16::<BigEndian>().map_err(truncated)?),
        PrimitiveType::Long => Value::Long(reader.read_u32::<BigEndian>().map_err(truncated)?),
        PrimitiveType::LongLong => {
            Value::LongLong(reader.read_u64::<BigEndian>().map_err(truncated)?)
        }
        PrimitiveType::Timestamp => {
            Value::Timestamp(reader.read_u64::<BigEndian>().map_err(truncated)?)
        }
        PrimitiveType::ShortString => {
            let len = reader.read_u8().map_err(truncated)?;
            let bytes = read_exact(reader, usize::from(len)).map_err(truncated)?;
            Value::ShortString(String::from_utf8_lossy(&bytes).into_owned())
        }
        PrimitiveType::LongString => {
            let len = reader.read_u32::<BigEndian>().map_err(truncated)?;
            let bytes = read_exact(reader, len as usize).map_err(truncated)?;
            Value::LongString(String::from_utf8_lossy(&bytes).into_owned())
        }
        PrimitiveType::Table => {
            let len = reader.read_u32::<BigEndian>().map_err(truncated)?;
            Value::Table(read_exact(reader, len as usize).map_err(truncated)?)
        }
        PrimitiveType::Bit => unreachable!("bit fields are decoded through their bit group"),
    };
    Ok(value)
}

fn read_exact(reader: &mut &[u8], len: usize) -> std::io::Result<Vec<u8>> {
    let mut bytes = vec![0; len];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn write_value(buf: &mut Vec<u8>, field: &IrField, value: &Value) -> Result<(), WireError> {
    let too_long = |len: usize| WireError::TooLong {
        field: field.name.original.clone(),
        len,
    };

    match value {
        Value::Octet(v) => buf.write_u8(*v)?,
        Value::Short(v) => buf.write_u16::<BigEndian>(*v)?,
        Value::Long(v) => buf.write_u32::<BigEndian>(*v)?,
        Value::LongLong(v) | Value::Timestamp(v) => buf.write_u64::<BigEndian>(*v)?,
        Value::ShortString(s) => {
            let len = u8::try_from(s.len()).map_err(|_| too_long(s.len()))?;
            buf.write_u8(len)?;
            buf.extend_from_slice(s.as_bytes());
        }
        Value::LongString(s) => {
            let len = u32::try_from(s.len()).map_err(|_| too_long(s.len()))?;
            buf.write_u32::<BigEndian>(len)?;
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Table(body) => {
            let len = u32::try_from(body.len()).map_err(|_| too_long(body.len()))?;
            buf.write_u32::<BigEndian>(len)?;
            buf.extend_from_slice(body);
        }
        Value::Bit(_) => unreachable!("bit fields are encoded through their bit group"),
    }
    Ok(())
}
