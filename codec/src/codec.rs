//! Core codec traits and implementations

use crate::{util::padding, Config, Error, Reader, Writer};
use bytes::{Buf, BytesMut};

/// Trait for types that can be written (encoded) to a [Writer].
pub trait Write {
    /// Encodes this value at the writer's current position, inserting any alignment padding
    /// it needs first.
    ///
    /// Returns an error if the value violates an invariant of its wire representation.
    fn write(&self, writer: &mut Writer) -> Result<(), Error>;
}

/// Trait for types that can report their encoded size without being encoded.
pub trait EncodeSize {
    /// Returns the number of bytes [Write::write] produces when the writer is at `position`,
    /// including leading alignment padding.
    fn encode_size(&self, position: usize) -> usize;
}

/// Trait for types that can be read (decoded) from a [Reader].
pub trait Read: Sized {
    /// Configuration needed to read the value (e.g. a length bound or a record shape).
    ///
    /// Use `()` for types that do not require configuration.
    type Cfg;

    /// Reads a value at the reader's current position, consuming its padding and bytes.
    fn read_cfg<B: Buf>(reader: &mut Reader<B>, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Trait for types with a known, fixed encoded length.
///
/// Fixed-size types are aligned to their own size on the wire.
pub trait FixedSize {
    /// The length of the encoded value.
    const SIZE: usize;
}

// Automatically implement `EncodeSize` for fixed-size types.
impl<T: FixedSize> EncodeSize for T {
    #[inline]
    fn encode_size(&self, position: usize) -> usize {
        padding(position, T::SIZE) + T::SIZE
    }
}

/// Trait for types that can be encoded to a standalone buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes a value with the default configuration (little-endian, origin 0).
    ///
    /// (Provided method).
    fn encode(&self) -> Result<BytesMut, Error> {
        self.encode_cfg(&Config::default())
    }

    /// Encodes a value into a buffer sized exactly with [EncodeSize::encode_size].
    ///
    /// Panics if the `write` implementation does not write the expected number of bytes.
    ///
    /// (Provided method).
    fn encode_cfg(&self, cfg: &Config) -> Result<BytesMut, Error> {
        let len = self.encode_size(cfg.origin);
        let mut writer = Writer::with_capacity(len, cfg);
        self.write(&mut writer)?;
        let buffer = writer.into_inner();
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        Ok(buffer)
    }
}

// Automatically implement `Encode` for types that implement `Write` and `EncodeSize`.
impl<T: Write + EncodeSize> Encode for T {}

/// Trait for types that can be decoded from a buffer, ensuring the entire buffer is consumed.
pub trait Decode: Read {
    /// Decodes a value from a buffer, ensuring the buffer is fully consumed.
    ///
    /// (Provided method).
    fn decode_cfg(buf: impl Buf, cfg: &Config, read_cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut reader = Reader::new(buf, cfg);
        let result = Self::read_cfg(&mut reader, read_cfg)?;

        // Check that the buffer is fully consumed.
        let remaining = reader.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }

        Ok(result)
    }
}

// Automatically implement `Decode` for types that implement `Read`.
impl<T: Read> Decode for T {}

/// Extension trait providing an ergonomic read method for types requiring no configuration.
pub trait ReadExt: Read<Cfg = ()> {
    /// Reads a value using the default `()` config.
    fn read<B: Buf>(reader: &mut Reader<B>) -> Result<Self, Error> {
        Self::read_cfg(reader, &())
    }
}

// Automatically implement `ReadExt` for types that implement `Read` with no config.
impl<T: Read<Cfg = ()>> ReadExt for T {}

/// Extension trait providing ergonomic decode method for types requiring no configuration.
pub trait DecodeExt: Decode<Cfg = ()> {
    /// Decodes a value using the default `()` config.
    fn decode(buf: impl Buf) -> Result<Self, Error> {
        Self::decode_cfg(buf, &Config::default(), &())
    }
}

// Automatically implement `DecodeExt` for types that implement `Decode` with no config.
impl<T: Decode<Cfg = ()>> DecodeExt for T {}
