//! Codec implementation for NUL-terminated strings.
//!
//! On the wire a string is a 4-byte aligned `u32` length `N` (content length plus the
//! terminator) followed by `N` bytes, the last of which is `0x00`.

use crate::{util::padding, EncodeSize, Error, Read, Reader, Write, Writer};
use bytes::Buf;
use std::fmt;

/// Wire size of the length prefix (and its alignment).
pub const LENGTH_PREFIX: usize = 4;

/// A NUL-terminated byte string with an explicit size and capacity.
///
/// `capacity` is the length of the backing buffer; `size` is the number of content bytes
/// before the terminator. A well-formed value has `capacity > size` and `data[size] == 0`.
/// Values assembled with [RawString::from_raw_parts] may break that invariant, in which case
/// writing them fails with [Error::MalformedValue].
#[derive(Clone)]
pub struct RawString {
    data: Vec<u8>,
    size: usize,
}

impl RawString {
    /// Creates an empty, well-formed string.
    pub fn new() -> Self {
        Self {
            data: vec![0],
            size: 0,
        }
    }

    /// Creates a string from its raw buffer and size without checking the invariants.
    pub fn from_raw_parts(data: Vec<u8>, size: usize) -> Self {
        Self { data, size }
    }

    /// Number of content bytes (terminator excluded).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Content bytes (terminator excluded).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size.min(self.data.len())]
    }

    /// Content as UTF-8, if valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Checks the size, capacity and terminator invariants.
    ///
    /// Content holding a NUL byte is rejected too: a reader would stop at it.
    pub fn validate(&self) -> Result<(), Error> {
        if self.data.is_empty() || self.data.len() <= self.size {
            return Err(Error::malformed("string capacity not greater than size"));
        }
        if self.data[self.size] != 0 {
            return Err(Error::malformed("string not null-terminated"));
        }
        if self.data[..self.size].contains(&0) {
            return Err(Error::malformed("string contains an interior null byte"));
        }
        Ok(())
    }

    /// Replaces the content with `content`, reusing the existing buffer when possible.
    ///
    /// Fails with [Error::AssignFailure] if `content` contains a NUL byte (it could not be
    /// read back through the terminator) or if the buffer cannot grow.
    pub fn assign(&mut self, content: &[u8]) -> Result<(), Error> {
        if content.contains(&0) {
            return Err(Error::assign("string contains an interior null byte"));
        }
        self.data.clear();
        self.data
            .try_reserve_exact(content.len() + 1)
            .map_err(|_| Error::assign("string allocation failed"))?;
        self.data.extend_from_slice(content);
        self.data.push(0);
        self.size = content.len();
        Ok(())
    }
}

impl Default for RawString {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for RawString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for RawString {}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl From<&str> for RawString {
    fn from(value: &str) -> Self {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        Self {
            data,
            size: value.len(),
        }
    }
}

impl From<String> for RawString {
    fn from(value: String) -> Self {
        let size = value.len();
        let mut data = value.into_bytes();
        data.push(0);
        Self { data, size }
    }
}

impl Write for RawString {
    fn write(&self, writer: &mut Writer) -> Result<(), Error> {
        self.validate()?;
        let len = u32::try_from(self.size + 1)
            .map_err(|_| Error::malformed("string length exceeds u32"))?;
        writer.align(LENGTH_PREFIX);
        writer.put_u32(len);
        writer.put_slice(&self.data[..=self.size]);
        Ok(())
    }
}

impl EncodeSize for RawString {
    #[inline]
    fn encode_size(&self, position: usize) -> usize {
        padding(position, LENGTH_PREFIX) + LENGTH_PREFIX + self.size + 1
    }
}

impl Read for RawString {
    /// Maximum content length, if bounded.
    type Cfg = Option<usize>;

    fn read_cfg<B: Buf>(reader: &mut Reader<B>, bound: &Option<usize>) -> Result<Self, Error> {
        reader.align(LENGTH_PREFIX)?;
        let len = usize::try_from(reader.get_u32()?)
            .map_err(|_| Error::malformed("string length exceeds usize"))?;

        // Check before allocating: the declared length must fit in what remains.
        let bytes = reader.get_bytes(len)?;
        let content = match bytes.split_last() {
            Some((&0, content)) => content,
            _ => &bytes[..],
        };
        if let Some(max) = *bound {
            if content.len() > max {
                return Err(Error::exceeded(content.len(), max));
            }
        }

        let mut value = Self::from_raw_parts(Vec::new(), 0);
        value.assign(content)?;
        Ok(value)
    }
}
