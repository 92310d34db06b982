//! Dynamically typed field values.

use crate::{
    types::string::{RawString, LENGTH_PREFIX},
    util::padding,
    EncodeSize, Primitive, Record,
};

/// A concrete value held by one field of a [Record].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    String(RawString),
    Record(Record),
    /// Elements of a fixed-length array.
    Array(Vec<Value>),
    /// Elements of a variable-length sequence.
    Sequence(Vec<Value>),
}

impl Value {
    /// Returns the scalar kind of this value, if it is a scalar.
    pub fn primitive(&self) -> Option<Primitive> {
        Some(match self {
            Self::Bool(_) => Primitive::Bool,
            Self::U8(_) => Primitive::U8,
            Self::I8(_) => Primitive::I8,
            Self::U16(_) => Primitive::U16,
            Self::I16(_) => Primitive::I16,
            Self::U32(_) => Primitive::U32,
            Self::I32(_) => Primitive::I32,
            Self::U64(_) => Primitive::U64,
            Self::I64(_) => Primitive::I64,
            Self::F32(_) => Primitive::F32,
            Self::F64(_) => Primitive::F64,
            Self::String(_)
            | Self::Record(_)
            | Self::Array(_)
            | Self::Sequence(_) => return None,
        })
    }

    /// Returns the zero value of a scalar kind.
    pub fn zero(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Bool => Self::Bool(false),
            Primitive::U8 => Self::U8(0),
            Primitive::I8 => Self::I8(0),
            Primitive::U16 => Self::U16(0),
            Primitive::I16 => Self::I16(0),
            Primitive::U32 => Self::U32(0),
            Primitive::I32 => Self::I32(0),
            Primitive::U64 => Self::U64(0),
            Primitive::I64 => Self::I64(0),
            Primitive::F32 => Self::F32(0.0),
            Primitive::F64 => Self::F64(0.0),
        }
    }

    /// Returns the string, if this is a string value.
    pub fn as_string(&self) -> Option<&RawString> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested record, if this is a record value.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements of an array or sequence value.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) | Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl EncodeSize for Value {
    fn encode_size(&self, position: usize) -> usize {
        match self {
            Self::String(value) => value.encode_size(position),
            Self::Record(record) => record.encode_size(position),
            Self::Array(items) => elements_size(items, position),
            Self::Sequence(items) => {
                let prefix = padding(position, LENGTH_PREFIX) + LENGTH_PREFIX;
                prefix + elements_size(items, position + prefix)
            }
            scalar => match scalar.primitive() {
                Some(primitive) => {
                    padding(position, primitive.width()) + primitive.width()
                }
                None => 0,
            },
        }
    }
}

fn elements_size(items: &[Value], start: usize) -> usize {
    items
        .iter()
        .fold(start, |position, item| position + item.encode_size(position))
        - start
}

macro_rules! impl_from {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_from!(bool, Bool);
impl_from!(u8, U8);
impl_from!(i8, I8);
impl_from!(u16, U16);
impl_from!(i16, I16);
impl_from!(u32, U32);
impl_from!(i32, I32);
impl_from!(u64, U64);
impl_from!(i64, I64);
impl_from!(f32, F32);
impl_from!(f64, F64);
impl_from!(RawString, String);
impl_from!(Record, Record);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(RawString::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(RawString::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_sizes() {
        assert_eq!(Value::U8(1).encode_size(3), 1);
        assert_eq!(Value::U32(1).encode_size(1), 7);
        assert_eq!(Value::F64(1.0).encode_size(8), 8);
        assert_eq!(Value::Bool(true).encode_size(5), 1);
    }

    #[test]
    fn test_sequence_size() {
        // prefix (4) + two u16 (4)
        let value = Value::Sequence(vec![Value::U16(1), Value::U16(2)]);
        assert_eq!(value.encode_size(0), 8);
        // prefix padded from 1 to 4, then 4 bytes of length
        assert_eq!(value.encode_size(1), 11);

        // prefix (4) + u8 + pad(3) + u32
        let value = Value::Sequence(vec![Value::U8(1), Value::U32(2)]);
        assert_eq!(value.encode_size(0), 12);
    }

    #[test]
    fn test_array_of_strings_size() {
        let value = Value::Array(vec![Value::from("a"), Value::from("bcd")]);
        // "a": 4 + 2 = 6, pad to 8, "bcd": 4 + 4 = 8
        assert_eq!(value.encode_size(0), 16);
    }

    #[test]
    fn test_accessors() {
        let value = Value::from("ok");
        assert_eq!(value.as_string().and_then(RawString::as_str), Some("ok"));
        assert!(value.as_slice().is_none());
        assert!(value.as_record().is_none());

        let items = Value::Array(vec![Value::U8(1), Value::U8(2)]);
        assert_eq!(items.as_slice(), Some(&[Value::U8(1), Value::U8(2)][..]));
        assert!(items.as_string().is_none());
    }

    #[test]
    fn test_zero_matches_primitive() {
        for primitive in [Primitive::Bool, Primitive::I16, Primitive::F64] {
            assert_eq!(Value::zero(primitive).primitive(), Some(primitive));
        }
        assert_eq!(Value::from("x").primitive(), None);
    }
}
