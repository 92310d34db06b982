//! Record shapes: the ordered field list a record is encoded against.
//!
//! A [Shape] is built once (usually at startup) and shared as an `Arc<Shape>`. Field order is
//! part of the wire contract: it determines both the padding between fields and the decode
//! order.

use crate::{
    types::{string::RawString, value::Value},
    util::padding,
    Error, Primitive, Record, SizeClass,
};
use std::{
    collections::{HashMap, HashSet},
    mem,
    sync::{Arc, OnceLock},
};

/// Name of the synthetic field given to shapes declared without fields.
pub const MARKER_FIELD: &str = "structure_needs_at_least_one_member";

/// Resolves a dependent record type by its qualified name (`namespace::Name`).
pub trait Resolver {
    /// Returns the shape registered under `qualified_name`, if any.
    fn resolve(&self, qualified_name: &str) -> Option<Arc<Shape>>;
}

impl Resolver for HashMap<String, Arc<Shape>> {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<Shape>> {
        self.get(qualified_name).cloned()
    }
}

/// Kind of a field. Immutable once the shape is built.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Fixed-width scalar.
    Scalar(Primitive),
    /// NUL-terminated string, optionally with a maximum content length.
    String { bound: Option<usize> },
    /// Fixed-length array (no length prefix).
    Array { element: Box<FieldKind>, len: usize },
    /// Length-prefixed sequence, optionally with a maximum element count.
    Sequence {
        element: Box<FieldKind>,
        bound: Option<usize>,
    },
    /// Another record, encoded inline.
    Nested(Arc<Shape>),
}

impl FieldKind {
    /// Unbounded string.
    pub fn string() -> Self {
        Self::String { bound: None }
    }

    /// String holding at most `bound` bytes of content.
    pub fn bounded_string(bound: usize) -> Self {
        Self::String { bound: Some(bound) }
    }

    /// Fixed-length array of `len` elements.
    pub fn array(element: FieldKind, len: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Unbounded sequence.
    pub fn sequence(element: FieldKind) -> Self {
        Self::Sequence {
            element: Box::new(element),
            bound: None,
        }
    }

    /// Sequence holding at most `bound` elements.
    pub fn bounded_sequence(element: FieldKind, bound: usize) -> Self {
        Self::Sequence {
            element: Box::new(element),
            bound: Some(bound),
        }
    }

    /// Returns the value a freshly initialized record holds for this kind.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Scalar(primitive) => Value::zero(*primitive),
            Self::String { .. } => Value::String(RawString::new()),
            Self::Array { element, len } => Value::Array(vec![element.default_value(); *len]),
            Self::Sequence { .. } => Value::Sequence(Vec::new()),
            Self::Nested(shape) => Value::Record(Record::new(shape.clone())),
        }
    }

    /// Short description used in type mismatch errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(primitive) => primitive.name(),
            Self::String { .. } => "string",
            Self::Array { .. } => "array",
            Self::Sequence { .. } => "sequence",
            Self::Nested(_) => "record",
        }
    }

    fn validate(&self, shape: &str, field: &str) -> Result<(), Error> {
        match self {
            Self::Array { len: 0, .. } => Err(Error::invalid_shape(
                shape,
                format!("array field `{field}` has length 0"),
            )),
            Self::Array { element, .. } => {
                element.validate(shape, field)?;
                if self.host_layout().is_none() {
                    return Err(Error::invalid_shape(
                        shape,
                        format!("array field `{field}` does not fit in memory"),
                    ));
                }
                Ok(())
            }
            Self::Sequence { element, .. } => element.validate(shape, field),
            Self::Scalar(_) | Self::String { .. } | Self::Nested(_) => Ok(()),
        }
    }

    /// Size and alignment of the field in a C-layout host struct.
    ///
    /// Strings and sequences are `{ data, size, capacity }` headers. Returns `None` if an
    /// array is too large to address.
    pub(crate) fn host_layout(&self) -> Option<HostLayout> {
        match self {
            Self::Scalar(primitive) => Some(HostLayout {
                size: primitive.width(),
                align: primitive.host_alignment(),
            }),
            Self::String { .. } | Self::Sequence { .. } => Some(HostLayout {
                size: 3 * mem::size_of::<usize>(),
                align: mem::align_of::<usize>(),
            }),
            Self::Array { element, len } => {
                let element = element.host_layout()?;
                Some(HostLayout {
                    size: element.size.checked_mul(*len)?,
                    align: element.align,
                })
            }
            Self::Nested(shape) => Some(shape.host),
        }
    }
}

/// Size and alignment of a value in host memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct HostLayout {
    pub size: usize,
    pub align: usize,
}

/// A named field of a [Shape].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    kind: FieldKind,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Field name (diagnostics and lookup only, never encoded).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// Ordered description of a record type.
#[derive(Debug)]
pub struct Shape {
    namespace: String,
    name: String,
    fields: Vec<Field>,
    host_offsets: Vec<usize>,
    host: HostLayout,
    pub(crate) class: OnceLock<SizeClass>,
}

impl Shape {
    /// Starts building a shape.
    pub fn builder(namespace: impl Into<String>, name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder {
            namespace: namespace.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Namespace of the type (e.g. `robethichor_interfaces::srv`).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Name of the type (e.g. `UserStatusService_Response`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `namespace::name`, or just the name when the namespace is empty.
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Fields in declaration order. Never empty.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the index of the field called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Offsets of each field in a C-layout host struct.
    pub(crate) fn host_offsets(&self) -> &[usize] {
        &self.host_offsets
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name && self.fields == other.fields
    }
}

pub(crate) fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    }
}

/// Builder for [Shape].
///
/// # Examples
///
/// ```
/// use typesupport_codec::{FieldKind, Primitive, Shape, SizeClass};
///
/// let point = Shape::builder("geometry", "Point")
///     .scalar("x", Primitive::F64)
///     .scalar("y", Primitive::F64)
///     .build()
///     .unwrap();
/// assert_eq!(point.classify(), SizeClass::Plain(16));
///
/// let label = Shape::builder("geometry", "Label")
///     .nested("at", point)
///     .field("text", FieldKind::bounded_string(31))
///     .build()
///     .unwrap();
/// assert_eq!(label.classify(), SizeClass::Bounded(52));
/// ```
#[derive(Debug)]
pub struct ShapeBuilder {
    namespace: String,
    name: String,
    fields: Vec<Field>,
}

impl ShapeBuilder {
    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field::new(name, kind));
        self
    }

    /// Appends a scalar field.
    pub fn scalar(self, name: impl Into<String>, primitive: Primitive) -> Self {
        self.field(name, FieldKind::Scalar(primitive))
    }

    /// Appends an unbounded string field.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::string())
    }

    /// Appends a nested record field.
    pub fn nested(self, name: impl Into<String>, shape: Arc<Shape>) -> Self {
        self.field(name, FieldKind::Nested(shape))
    }

    /// Appends a nested record field whose type is looked up through `resolver`.
    pub fn nested_named<R: Resolver + ?Sized>(
        self,
        name: impl Into<String>,
        resolver: &R,
        qualified_name: &str,
    ) -> Result<Self, Error> {
        let shape = resolver
            .resolve(qualified_name)
            .ok_or_else(|| Error::UnknownType(qualified_name.to_string()))?;
        Ok(self.nested(name, shape))
    }

    /// Validates the field list and computes the host layout.
    ///
    /// A shape without fields receives the single [MARKER_FIELD] (`uint8`).
    pub fn build(mut self) -> Result<Arc<Shape>, Error> {
        let qualified = qualify(&self.namespace, &self.name);
        if self.name.is_empty() {
            return Err(Error::invalid_shape(&qualified, "empty type name"));
        }
        if self.fields.is_empty() {
            self.fields
                .push(Field::new(MARKER_FIELD, FieldKind::Scalar(Primitive::U8)));
        }

        let mut names = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(Error::invalid_shape(&qualified, "empty field name"));
            }
            if !names.insert(field.name.as_str()) {
                return Err(Error::invalid_shape(
                    &qualified,
                    format!("duplicate field `{}`", field.name),
                ));
            }
            field.kind.validate(&qualified, &field.name)?;
        }

        // Lay the fields out like a C struct.
        let overflow = || Error::invalid_shape(&qualified, "host layout does not fit in memory");
        let mut host_offsets = Vec::with_capacity(self.fields.len());
        let mut offset: usize = 0;
        let mut align = 1;
        for field in &self.fields {
            let layout = field.kind.host_layout().ok_or_else(overflow)?;
            offset = offset
                .checked_add(padding(offset, layout.align))
                .ok_or_else(overflow)?;
            host_offsets.push(offset);
            offset = offset.checked_add(layout.size).ok_or_else(overflow)?;
            align = align.max(layout.align);
        }
        let host = HostLayout {
            size: offset
                .checked_add(padding(offset, align))
                .ok_or_else(overflow)?,
            align,
        };

        Ok(Arc::new(Shape {
            namespace: self.namespace,
            name: self.name,
            fields: self.fields,
            host_offsets,
            host,
            class: OnceLock::new(),
        }))
    }
}
