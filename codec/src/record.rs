//! Record values and the record codec.
//!
//! A [Record] holds one slot per field of its [Shape]. Serializing walks the fields in
//! declaration order through the field codec; the exact encoded size replays the same
//! alignment arithmetic without writing anything, and the two always agree.

use crate::{
    error::FieldPath, field, Config, Decode, Encode, EncodeSize, Error, Read, Reader, Shape,
    Value, Write, Writer,
};
use bytes::{Buf, BytesMut};
use std::sync::Arc;
use tracing::debug;

/// An instance of a [Shape].
///
/// Slots may be absent (see [Record::empty]); writing a record with an absent slot fails with
/// [Error::NullInput].
#[derive(Clone, Debug)]
pub struct Record {
    shape: Arc<Shape>,
    slots: Vec<Option<Value>>,
}

impl Record {
    /// Creates a record holding the default value of every field.
    pub fn new(shape: Arc<Shape>) -> Self {
        let slots = shape
            .fields()
            .iter()
            .map(|field| Some(field.kind().default_value()))
            .collect();
        Self { shape, slots }
    }

    /// Creates a record with every slot absent.
    pub fn empty(shape: Arc<Shape>) -> Self {
        let slots = vec![None; shape.fields().len()];
        Self { shape, slots }
    }

    /// Returns the shape of this record.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// Returns the value of the field called `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.shape.index_of(name)?;
        self.slots[index].as_ref()
    }

    /// Returns the value of the field at `index`, if present.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)?.as_ref()
    }

    /// Stores `value` in the field called `name`, returning the previous value.
    ///
    /// The value is not checked against the field kind until the record is written.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>, Error> {
        let index = self
            .shape
            .index_of(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        Ok(self.slots[index].replace(value.into()))
    }

    /// Builder-style [Record::set].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Removes the value of the field called `name`, leaving the slot absent.
    pub fn take(&mut self, name: &str) -> Result<Option<Value>, Error> {
        let index = self
            .shape
            .index_of(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        Ok(self.slots[index].take())
    }

    /// Returns true if every slot holds a value.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Returns the exact number of bytes this record encodes to when written at `origin`.
    pub fn exact_size(&self, origin: usize) -> usize {
        self.encode_size(origin)
    }

    // Writes every field without rolling back on failure (the outermost record does that).
    pub(crate) fn write_fields(&self, writer: &mut Writer) -> Result<(), Error> {
        for (field, slot) in self.shape.fields().iter().zip(&self.slots) {
            let value = slot.as_ref().ok_or_else(|| {
                Error::NullInput {
                    field: FieldPath::default(),
                }
                .in_field(field.name())
            })?;
            field::encode(field.kind(), value, writer).map_err(|err| err.in_field(field.name()))?;
        }
        Ok(())
    }

    pub(crate) fn read_fields<B: Buf>(
        shape: &Arc<Shape>,
        reader: &mut Reader<B>,
    ) -> Result<Self, Error> {
        let mut slots = Vec::with_capacity(shape.fields().len());
        for field in shape.fields() {
            let value =
                field::decode(field.kind(), reader).map_err(|err| err.in_field(field.name()))?;
            slots.push(Some(value));
        }
        Ok(Self {
            shape: shape.clone(),
            slots,
        })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.shape, &other.shape) || self.shape == other.shape)
            && self.slots == other.slots
    }
}

impl Write for Record {
    fn write(&self, writer: &mut Writer) -> Result<(), Error> {
        self.shape.serialize(self, writer)
    }
}

impl EncodeSize for Record {
    fn encode_size(&self, position: usize) -> usize {
        self.slots
            .iter()
            .flatten()
            .fold(position, |position, value| {
                position + value.encode_size(position)
            })
            - position
    }
}

impl Read for Record {
    type Cfg = Arc<Shape>;

    fn read_cfg<B: Buf>(reader: &mut Reader<B>, shape: &Arc<Shape>) -> Result<Self, Error> {
        shape.deserialize(reader)
    }
}

impl Shape {
    /// Writes `record` field by field at the writer's position.
    ///
    /// On failure nothing is left in the writer: any bytes written for earlier fields are
    /// discarded.
    pub fn serialize(&self, record: &Record, writer: &mut Writer) -> Result<(), Error> {
        let mark = writer.len();
        let result = if !self.accepts(record) {
            Err(Error::mismatch("record of this shape"))
        } else {
            record.write_fields(writer)
        };
        if let Err(err) = &result {
            writer.truncate(mark);
            debug!(shape = %self.qualified_name(), %err, "failed to serialize record");
        }
        result
    }

    /// Encodes `record` into a buffer of exactly [Record::exact_size] bytes.
    pub fn encode(&self, record: &Record, cfg: &Config) -> Result<BytesMut, Error> {
        if !self.accepts(record) {
            return Err(Error::mismatch("record of this shape"));
        }
        record.encode_cfg(cfg)
    }

    /// Reads a record at the reader's position.
    pub fn deserialize<B: Buf>(
        self: &Arc<Self>,
        reader: &mut Reader<B>,
    ) -> Result<Record, Error> {
        Record::read_fields(self, reader).inspect_err(|err| {
            debug!(shape = %self.qualified_name(), %err, "failed to deserialize record");
        })
    }

    /// Reads a record into `target`, which is left untouched on failure.
    pub fn deserialize_into<B: Buf>(
        self: &Arc<Self>,
        reader: &mut Reader<B>,
        target: &mut Record,
    ) -> Result<(), Error> {
        if !self.accepts(target) {
            return Err(Error::mismatch("record of this shape"));
        }
        *target = self.deserialize(reader)?;
        Ok(())
    }

    fn accepts(&self, record: &Record) -> bool {
        std::ptr::eq(self, Arc::as_ptr(&record.shape)) || *record.shape == *self
    }

    /// Decodes a record from a complete buffer; trailing bytes fail with
    /// [Error::ExtraData].
    pub fn decode(self: &Arc<Self>, buf: impl Buf, cfg: &Config) -> Result<Record, Error> {
        Record::decode_cfg(buf, cfg, self)
    }
}
