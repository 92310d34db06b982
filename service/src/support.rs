//! The per-type surface a dispatcher calls.

use std::sync::Arc;
use typesupport_codec::{Error, MaxSize, Reader, Record, Shape, SizeClass, Writer};

/// Serialization entry points for one record type, addressable by name.
///
/// Object safe, so a dispatcher can hold `&dyn TypeSupport` for any registered type.
pub trait TypeSupport: Send + Sync {
    /// Namespace of the type (e.g. `robethichor_interfaces::srv`).
    fn namespace(&self) -> &str;

    /// Name of the type within its namespace.
    fn name(&self) -> &str;

    /// Returns `namespace::name`.
    fn qualified_name(&self) -> String {
        if self.namespace().is_empty() {
            self.name().to_string()
        } else {
            format!("{}::{}", self.namespace(), self.name())
        }
    }

    /// Writes `record` at the writer's position. Nothing is written on failure.
    fn serialize(&self, record: &Record, writer: &mut Writer) -> Result<(), Error>;

    /// Reads a record into `target`, which is left untouched on failure.
    fn deserialize(&self, reader: &mut Reader<&[u8]>, target: &mut Record) -> Result<(), Error>;

    /// Exact number of bytes `record` encodes to at stream position `origin`.
    fn serialized_size(&self, record: &Record, origin: usize) -> usize;

    /// Worst-case walk of the type starting at stream position `origin`.
    fn max_serialized_size(&self, origin: usize) -> MaxSize;

    /// Cached size class of the type.
    fn size_class(&self) -> SizeClass;
}

impl TypeSupport for Arc<Shape> {
    fn namespace(&self) -> &str {
        Shape::namespace(self)
    }

    fn name(&self) -> &str {
        Shape::name(self)
    }

    fn serialize(&self, record: &Record, writer: &mut Writer) -> Result<(), Error> {
        Shape::serialize(self, record, writer)
    }

    fn deserialize(&self, reader: &mut Reader<&[u8]>, target: &mut Record) -> Result<(), Error> {
        self.deserialize_into(reader, target)
    }

    fn serialized_size(&self, record: &Record, origin: usize) -> usize {
        record.exact_size(origin)
    }

    fn max_serialized_size(&self, origin: usize) -> MaxSize {
        self.max_size_at(origin)
    }

    fn size_class(&self) -> SizeClass {
        self.classify()
    }
}
