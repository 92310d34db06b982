//! Field codec: encodes and decodes one field value against its [FieldKind].
//!
//! Values are checked against the kind as they are written, so a record whose value does not
//! match its shape is rejected instead of producing a frame the peer would misread.

use crate::{
    types::string::{RawString, LENGTH_PREFIX},
    Error, FieldKind, Primitive, Read, ReadExt, Reader, Record, Value, Write, Writer,
};
use bytes::Buf;
use std::sync::Arc;

/// Writes `value` at the writer's position, inserting alignment padding as needed.
pub fn encode(kind: &FieldKind, value: &Value, writer: &mut Writer) -> Result<(), Error> {
    match (kind, value) {
        (FieldKind::Scalar(primitive), value) => encode_scalar(*primitive, value, writer),
        (FieldKind::String { bound }, Value::String(value)) => {
            if let Some(max) = *bound {
                if value.size() > max {
                    return Err(Error::exceeded(value.size(), max));
                }
            }
            value.write(writer)
        }
        (FieldKind::Array { element, len }, Value::Array(items)) => {
            if items.len() != *len {
                return Err(Error::invalid_length(*len, items.len()));
            }
            encode_elements(element, items, writer)
        }
        (FieldKind::Sequence { element, bound }, Value::Sequence(items)) => {
            if let Some(max) = *bound {
                if items.len() > max {
                    return Err(Error::exceeded(items.len(), max));
                }
            }
            let count = u32::try_from(items.len())
                .map_err(|_| Error::malformed("sequence length exceeds u32"))?;
            writer.align(LENGTH_PREFIX);
            writer.put_u32(count);
            encode_elements(element, items, writer)
        }
        (FieldKind::Nested(shape), Value::Record(record)) => {
            if !Arc::ptr_eq(shape, record.shape()) && **shape != **record.shape() {
                return Err(Error::mismatch("record of the declared type"));
            }
            record.write_fields(writer)
        }
        (kind, _) => Err(Error::mismatch(kind.describe())),
    }
}

fn encode_elements(element: &FieldKind, items: &[Value], writer: &mut Writer) -> Result<(), Error> {
    for (index, item) in items.iter().enumerate() {
        encode(element, item, writer).map_err(|err| err.at_index(index))?;
    }
    Ok(())
}

fn encode_scalar(primitive: Primitive, value: &Value, writer: &mut Writer) -> Result<(), Error> {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(v)) => v.write(writer),
        (Primitive::U8, Value::U8(v)) => v.write(writer),
        (Primitive::I8, Value::I8(v)) => v.write(writer),
        (Primitive::U16, Value::U16(v)) => v.write(writer),
        (Primitive::I16, Value::I16(v)) => v.write(writer),
        (Primitive::U32, Value::U32(v)) => v.write(writer),
        (Primitive::I32, Value::I32(v)) => v.write(writer),
        (Primitive::U64, Value::U64(v)) => v.write(writer),
        (Primitive::I64, Value::I64(v)) => v.write(writer),
        (Primitive::F32, Value::F32(v)) => v.write(writer),
        (Primitive::F64, Value::F64(v)) => v.write(writer),
        (primitive, _) => Err(Error::mismatch(primitive.name())),
    }
}

/// Reads a value of the given kind at the reader's position.
pub fn decode<B: Buf>(kind: &FieldKind, reader: &mut Reader<B>) -> Result<Value, Error> {
    match kind {
        FieldKind::Scalar(primitive) => decode_scalar(*primitive, reader),
        FieldKind::String { bound } => Ok(Value::String(RawString::read_cfg(reader, bound)?)),
        FieldKind::Array { element, len } => {
            Ok(Value::Array(decode_elements(element, *len, reader)?))
        }
        FieldKind::Sequence { element, bound } => {
            reader.align(LENGTH_PREFIX)?;
            let count = usize::try_from(reader.get_u32()?)
                .map_err(|_| Error::malformed("sequence length exceeds usize"))?;
            if let Some(max) = *bound {
                if count > max {
                    return Err(Error::exceeded(count, max));
                }
            }

            // Every element occupies at least one byte: reject impossible counts before
            // allocating.
            reader.at_least(count)?;
            Ok(Value::Sequence(decode_elements(element, count, reader)?))
        }
        FieldKind::Nested(shape) => Ok(Value::Record(Record::read_fields(shape, reader)?)),
    }
}

fn decode_elements<B: Buf>(
    element: &FieldKind,
    count: usize,
    reader: &mut Reader<B>,
) -> Result<Vec<Value>, Error> {
    let mut items = Vec::with_capacity(count);
    for index in 0..count {
        items.push(decode(element, reader).map_err(|err| err.at_index(index))?);
    }
    Ok(items)
}

fn decode_scalar<B: Buf>(primitive: Primitive, reader: &mut Reader<B>) -> Result<Value, Error> {
    Ok(match primitive {
        Primitive::Bool => Value::Bool(bool::read(reader)?),
        Primitive::U8 => Value::U8(u8::read(reader)?),
        Primitive::I8 => Value::I8(i8::read(reader)?),
        Primitive::U16 => Value::U16(u16::read(reader)?),
        Primitive::I16 => Value::I16(i16::read(reader)?),
        Primitive::U32 => Value::U32(u32::read(reader)?),
        Primitive::I32 => Value::I32(i32::read(reader)?),
        Primitive::U64 => Value::U64(u64::read(reader)?),
        Primitive::I64 => Value::I64(i64::read(reader)?),
        Primitive::F32 => Value::F32(f32::read(reader)?),
        Primitive::F64 => Value::F64(f64::read(reader)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, EncodeSize, Endianness};

    fn round_trip(kind: &FieldKind, value: &Value, cfg: &Config) -> Vec<u8> {
        let mut writer = Writer::new(cfg);
        encode(kind, value, &mut writer).unwrap();
        assert_eq!(writer.len(), value.encode_size(cfg.origin));
        let bytes = writer.freeze();

        let mut reader = Reader::new(bytes.clone(), cfg);
        let decoded = decode(kind, &mut reader).unwrap();
        assert_eq!(&decoded, value);
        assert_eq!(reader.remaining(), 0);
        bytes.to_vec()
    }

    #[test]
    fn test_scalar_alignment() {
        let kind = FieldKind::Scalar(Primitive::U32);
        let cfg = Config::default().with_origin(1);
        let bytes = round_trip(&kind, &Value::U32(0x0A0B0C0D), &cfg);
        assert_eq!(bytes, vec![0, 0, 0, 0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_sequence_layout() {
        let kind = FieldKind::sequence(FieldKind::Scalar(Primitive::U16));
        let value = Value::Sequence(vec![Value::U16(1), Value::U16(2)]);
        let bytes = round_trip(&kind, &value, &Config::new(Endianness::Big));
        assert_eq!(bytes, vec![0, 0, 0, 2, 0, 1, 0, 2]);
    }

    #[test]
    fn test_array_of_strings() {
        let kind = FieldKind::array(FieldKind::string(), 2);
        let value = Value::Array(vec![Value::from("a"), Value::from("bcd")]);
        let bytes = round_trip(&kind, &value, &Config::default());
        assert_eq!(
            bytes,
            vec![2, 0, 0, 0, b'a', 0, 0, 0, 4, 0, 0, 0, b'b', b'c', b'd', 0]
        );
    }

    #[test]
    fn test_type_mismatch() {
        let mut writer = Writer::new(&Config::default());
        let err = encode(
            &FieldKind::Scalar(Primitive::U32),
            &Value::U16(1),
            &mut writer,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "uint32",
                ..
            }
        ));

        let err = encode(&FieldKind::string(), &Value::U8(1), &mut writer).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "string", .. }));
    }

    #[test]
    fn test_array_length_checked() {
        let mut writer = Writer::new(&Config::default());
        let kind = FieldKind::array(FieldKind::Scalar(Primitive::U8), 3);
        let err = encode(&kind, &Value::Array(vec![Value::U8(1)]), &mut writer).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLength {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_bounds() {
        let mut writer = Writer::new(&Config::default());
        let err = encode(
            &FieldKind::bounded_string(2),
            &Value::from("abc"),
            &mut writer,
        )
        .unwrap_err();
        assert!(matches!(err, Error::LengthExceeded { found: 3, max: 2, .. }));

        let kind = FieldKind::bounded_sequence(FieldKind::Scalar(Primitive::U8), 1);
        let err = encode(
            &kind,
            &Value::Sequence(vec![Value::U8(1), Value::U8(2)]),
            &mut writer,
        )
        .unwrap_err();
        assert!(matches!(err, Error::LengthExceeded { found: 2, max: 1, .. }));
    }

    #[test]
    fn test_sequence_count_overrun() {
        // Claims a million elements in an 8-byte buffer.
        let bytes: &[u8] = &[0x40, 0x42, 0x0F, 0x00, 1, 2, 3, 4];
        let mut reader = Reader::new(bytes, &Config::default());
        let kind = FieldKind::sequence(FieldKind::Scalar(Primitive::U8));
        assert!(matches!(
            decode(&kind, &mut reader),
            Err(Error::TruncatedBuffer {
                needed: 1_000_000,
                remaining: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_element_error_path() {
        let kind = FieldKind::sequence(FieldKind::string());
        let value = Value::Sequence(vec![
            Value::from("fine"),
            Value::String(RawString::from_raw_parts(b"bad".to_vec(), 3)),
        ]);
        let mut writer = Writer::new(&Config::default());
        let err = encode(&kind, &value, &mut writer).unwrap_err();
        assert_eq!(err.field().unwrap().as_str(), "[1]");
    }
}
