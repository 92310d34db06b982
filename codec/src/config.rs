//! Cursor configuration.

/// Byte order used for every multi-byte scalar written or read through a cursor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// Returns the byte order of the host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

/// Configuration shared by a [crate::Writer] and a [crate::Reader].
///
/// # Examples
///
/// ```
/// use typesupport_codec::{Config, Endianness};
///
/// // A transport that already wrote a 4-byte header continues alignment from there.
/// let cfg = Config::default().with_origin(4).with_endianness(Endianness::Big);
/// assert_eq!(cfg.origin, 4);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Config {
    /// Byte order of scalars.
    pub endianness: Endianness,

    /// Logical stream offset of the first byte under the cursor.
    ///
    /// Alignment padding is computed against `origin + bytes consumed`, so the same value
    /// encodes differently at origin 0 and origin 1.
    pub origin: usize,
}

impl Config {
    /// Returns a configuration with the given byte order and origin 0.
    pub const fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            origin: 0,
        }
    }

    /// Sets the byte order.
    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Sets the logical offset of the first byte.
    pub const fn with_origin(mut self, origin: usize) -> Self {
        self.origin = origin;
        self
    }
}
