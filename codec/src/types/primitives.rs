//! Codec implementations for Rust primitive types.
//!
//! # Alignment
//!
//! Every scalar is aligned to its own width before its bytes are written: a `u32` always
//! starts at an offset that is a multiple of 4, a `u64` at a multiple of 8. This mirrors the
//! natural layout of a C struct, which is what lets fixed-layout records be bulk-copied.
//!
//! ## Byte order
//! Scalars are written in the byte order configured on the cursor (see [crate::Endianness]).
//! `bool` is a single byte that must decode to `0` or `1`.

use crate::{Error, FixedSize, Read, Reader, Write, Writer};
use bytes::Buf;
use std::{fmt, mem};

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty, $get_method:ident, $put_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, writer: &mut Writer) -> Result<(), Error> {
                writer.align(<Self as FixedSize>::SIZE);
                writer.$put_method(*self);
                Ok(())
            }
        }

        impl Read for $type {
            type Cfg = ();
            #[inline]
            fn read_cfg<B: Buf>(reader: &mut Reader<B>, _: &()) -> Result<Self, Error> {
                reader.align(<Self as FixedSize>::SIZE)?;
                reader.$get_method()
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = mem::size_of::<$type>();
        }
    };
}

impl_numeric!(u8, get_u8, put_u8);
impl_numeric!(u16, get_u16, put_u16);
impl_numeric!(u32, get_u32, put_u32);
impl_numeric!(u64, get_u64, put_u64);
impl_numeric!(i8, get_i8, put_i8);
impl_numeric!(i16, get_i16, put_i16);
impl_numeric!(i32, get_i32, put_i32);
impl_numeric!(i64, get_i64, put_i64);
impl_numeric!(f32, get_f32, put_f32);
impl_numeric!(f64, get_f64, put_f64);

// Bool implementation
impl Write for bool {
    #[inline]
    fn write(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.put_u8(u8::from(*self));
        Ok(())
    }
}

impl Read for bool {
    type Cfg = ();
    #[inline]
    fn read_cfg<B: Buf>(reader: &mut Reader<B>, _: &()) -> Result<Self, Error> {
        match reader.get_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool {
                field: Default::default(),
            }),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

/// Kind of a fixed-width scalar field.
///
/// IDL `byte` and `char` are represented as [Primitive::U8].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl Primitive {
    /// Number of bytes on the wire. Also the wire alignment.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Alignment of the corresponding type in host memory.
    ///
    /// This can be smaller than [Primitive::width] (e.g. 8-byte integers on some 32-bit
    /// targets), in which case records containing it cannot be bulk-copied.
    pub const fn host_alignment(self) -> usize {
        match self {
            Self::Bool => mem::align_of::<bool>(),
            Self::U8 => mem::align_of::<u8>(),
            Self::I8 => mem::align_of::<i8>(),
            Self::U16 => mem::align_of::<u16>(),
            Self::I16 => mem::align_of::<i16>(),
            Self::U32 => mem::align_of::<u32>(),
            Self::I32 => mem::align_of::<i32>(),
            Self::U64 => mem::align_of::<u64>(),
            Self::I64 => mem::align_of::<i64>(),
            Self::F32 => mem::align_of::<f32>(),
            Self::F64 => mem::align_of::<f64>(),
        }
    }

    /// IDL-style name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::U8 => "uint8",
            Self::I8 => "int8",
            Self::U16 => "uint16",
            Self::I16 => "int16",
            Self::U32 => "uint32",
            Self::I32 => "int32",
            Self::U64 => "uint64",
            Self::I64 => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
