//! Serialize records into an aligned binary wire format.
//!
//! # Overview
//!
//! Records are described at runtime by a [Shape]: an ordered list of named fields, each a
//! scalar, a string, a fixed-length array, a sequence or another record. A [Record] holds
//! one value per field and is encoded field by field:
//!
//! - scalars are aligned to their own width and written in the configured byte order
//! - strings are aligned to 4 and written as a `u32` length (content plus terminator), the
//!   content and a `0x00` terminator
//! - sequences are aligned to 4 and written as a `u32` element count followed by the elements
//! - arrays and nested records are written inline, with no prefix
//!
//! Padding bytes are zero. Alignment is computed from the logical stream position, which starts
//! at [Config::origin].
//!
//! Every shape can also be classified ([Shape::classify]) by its worst-case size: plain shapes
//! are byte-for-byte images of their C-layout host struct, bounded shapes have a finite maximum,
//! and unbounded shapes have none.
//!
//! # Example
//!
//! ```
//! use typesupport_codec::{Config, Encode, Primitive, Record, Shape, SizeClass};
//!
//! let status = Shape::builder("demo", "Status")
//!     .scalar("code", Primitive::U16)
//!     .string("message")
//!     .build()
//!     .unwrap();
//! assert_eq!(status.classify(), SizeClass::Unbounded);
//!
//! let record = Record::new(status.clone())
//!     .with("code", 404u16)
//!     .unwrap()
//!     .with("message", "missing")
//!     .unwrap();
//! let encoded = record.encode().unwrap();
//! assert_eq!(encoded.len(), record.exact_size(0));
//! assert_eq!(&encoded[..8], &[0x94, 0x01, 0, 0, 8, 0, 0, 0]);
//!
//! let decoded = status.decode(encoded, &Config::default()).unwrap();
//! assert_eq!(decoded, record);
//! ```
//!
//! # Untrusted input
//!
//! Decoding never panics: every read checks the remaining input first and fails with
//! [Error::TruncatedBuffer], and length prefixes are checked against the remaining input before
//! anything is allocated.

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod record;
pub mod shape;
pub mod size;
pub mod types;
pub mod util;

// Re-export main types and traits
pub use codec::{Decode, DecodeExt, Encode, EncodeSize, FixedSize, Read, ReadExt, Write};
pub use config::{Config, Endianness};
pub use cursor::{Reader, Writer};
pub use error::{Error, FieldPath};
pub use record::Record;
pub use shape::{Field, FieldKind, Resolver, Shape, ShapeBuilder, MARKER_FIELD};
pub use size::{MaxSize, SizeClass};
pub use types::{primitives::Primitive, string::RawString, value::Value};
