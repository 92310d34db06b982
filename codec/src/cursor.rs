//! Position-tracking cursors over byte buffers.
//!
//! Both cursors track a logical stream position (`origin + bytes processed`) so that padding
//! can be inserted (or skipped) to keep every field at an offset that is a multiple of its
//! alignment.

use crate::{util::padding, Config, Endianness, Error};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use paste::paste;

// Generates a `put_*` method writing a multi-byte scalar in the cursor's byte order.
macro_rules! impl_put {
    ($type:ty) => {
        paste! {
            #[doc = concat!("Writes a `", stringify!($type), "` at the current position (no alignment).")]
            #[inline]
            pub fn [<put_ $type>](&mut self, value: $type) {
                match self.endianness {
                    Endianness::Little => self.buf.[<put_ $type _le>](value),
                    Endianness::Big => self.buf.[<put_ $type>](value),
                }
            }
        }
    };
}

// Generates a `get_*` method reading a multi-byte scalar in the cursor's byte order.
macro_rules! impl_get {
    ($type:ty) => {
        paste! {
            #[doc = concat!("Reads a `", stringify!($type), "` at the current position (no alignment).")]
            #[inline]
            pub fn [<get_ $type>](&mut self) -> Result<$type, Error> {
                let size = std::mem::size_of::<$type>();
                self.at_least(size)?;
                self.position += size;
                Ok(match self.endianness {
                    Endianness::Little => self.buf.[<get_ $type _le>](),
                    Endianness::Big => self.buf.[<get_ $type>](),
                })
            }
        }
    };
}

/// Sequential writer over a growable buffer.
#[derive(Debug)]
pub struct Writer {
    buf: BytesMut,
    origin: usize,
    endianness: Endianness,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new(cfg: &Config) -> Self {
        Self::with_capacity(0, cfg)
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize, cfg: &Config) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            origin: cfg.origin,
            endianness: cfg.endianness,
        }
    }

    /// Returns the logical stream position of the next byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.origin + self.buf.len()
    }

    /// Returns the number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the byte order of this writer.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Inserts zero bytes until the position is a multiple of `alignment`.
    #[inline]
    pub fn align(&mut self, alignment: usize) {
        let pad = padding(self.position(), alignment);
        self.buf.put_bytes(0, pad);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn put_slice(&mut self, src: &[u8]) {
        self.buf.put_slice(src);
    }

    /// Writes a `u8`.
    #[inline]
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Writes an `i8`.
    #[inline]
    pub fn put_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    impl_put!(u16);
    impl_put!(i16);
    impl_put!(u32);
    impl_put!(i32);
    impl_put!(u64);
    impl_put!(i64);
    impl_put!(f32);
    impl_put!(f64);

    /// Discards everything written after `len` bytes.
    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Returns the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the written bytes.
    pub fn into_inner(self) -> BytesMut {
        self.buf
    }

    /// Consumes the writer, returning the written bytes as an immutable buffer.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Sequential reader over any [Buf].
///
/// Every read checks the remaining length first: running out of input is reported as
/// [Error::TruncatedBuffer], never as a panic.
#[derive(Debug)]
pub struct Reader<B: Buf> {
    buf: B,
    position: usize,
    endianness: Endianness,
}

impl<B: Buf> Reader<B> {
    /// Creates a reader positioned at `cfg.origin`.
    pub fn new(buf: B, cfg: &Config) -> Self {
        Self {
            buf,
            position: cfg.origin,
            endianness: cfg.endianness,
        }
    }

    /// Returns the logical stream position of the next byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Returns the byte order of this reader.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Fails with [Error::TruncatedBuffer] unless at least `len` bytes remain.
    #[inline]
    pub fn at_least(&self, len: usize) -> Result<(), Error> {
        let remaining = self.buf.remaining();
        if remaining < len {
            return Err(Error::truncated(len, remaining));
        }
        Ok(())
    }

    /// Skips padding until the position is a multiple of `alignment`.
    #[inline]
    pub fn align(&mut self, alignment: usize) -> Result<(), Error> {
        let pad = padding(self.position, alignment);
        self.at_least(pad)?;
        self.buf.advance(pad);
        self.position += pad;
        Ok(())
    }

    /// Reads exactly `len` raw bytes.
    #[inline]
    pub fn get_bytes(&mut self, len: usize) -> Result<Bytes, Error> {
        self.at_least(len)?;
        self.position += len;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Reads a `u8`.
    #[inline]
    pub fn get_u8(&mut self) -> Result<u8, Error> {
        self.at_least(1)?;
        self.position += 1;
        Ok(self.buf.get_u8())
    }

    /// Reads an `i8`.
    #[inline]
    pub fn get_i8(&mut self) -> Result<i8, Error> {
        self.at_least(1)?;
        self.position += 1;
        Ok(self.buf.get_i8())
    }

    impl_get!(u16);
    impl_get!(i16);
    impl_get!(u32);
    impl_get!(i32);
    impl_get!(u64);
    impl_get!(i64);
    impl_get!(f32);
    impl_get!(f64);

    /// Consumes the reader, returning the unread input.
    pub fn into_inner(self) -> B {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_alignment_from_origin() {
        let mut writer = Writer::new(&Config::default().with_origin(1));
        writer.align(4);
        assert_eq!(writer.len(), 3);
        assert_eq!(writer.position(), 4);
        writer.put_u32(7);
        assert_eq!(writer.as_slice(), &[0, 0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn test_endianness() {
        let mut little = Writer::new(&Config::new(Endianness::Little));
        little.put_u16(0x0102);
        assert_eq!(little.as_slice(), &[0x02, 0x01]);

        let mut big = Writer::new(&Config::new(Endianness::Big));
        big.put_u16(0x0102);
        big.put_f32(1.0);
        assert_eq!(big.as_slice(), &[0x01, 0x02, 0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_reader_round_trip() {
        let cfg = Config::new(Endianness::Big);
        let mut writer = Writer::new(&cfg);
        writer.put_u8(1);
        writer.align(8);
        writer.put_i64(-5);
        let bytes = writer.freeze();
        assert_eq!(bytes.len(), 16);

        let mut reader = Reader::new(bytes, &cfg);
        assert_eq!(reader.get_u8().unwrap(), 1);
        reader.align(8).unwrap();
        assert_eq!(reader.get_i64().unwrap(), -5);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_reader_truncated() {
        let mut reader = Reader::new(&[1u8, 2][..], &Config::default());
        assert!(matches!(
            reader.get_u32(),
            Err(Error::TruncatedBuffer {
                needed: 4,
                remaining: 2,
                ..
            })
        ));

        // Padding counts as required input.
        let mut reader = Reader::new(&[1u8, 0][..], &Config::default());
        reader.get_u8().unwrap();
        assert!(matches!(
            reader.align(4),
            Err(Error::TruncatedBuffer { needed: 3, .. })
        ));
    }

    #[test]
    fn test_truncate() {
        let mut writer = Writer::new(&Config::default());
        writer.put_u32(1);
        let mark = writer.len();
        writer.put_u64(2);
        writer.truncate(mark);
        assert_eq!(writer.len(), 4);
    }
}
