//! Worst-case size classification of shapes.
//!
//! A shape is classified once by walking its fields with the same alignment arithmetic the
//! encoder uses, taking the largest value every field can hold. Two properties fall out of the
//! walk:
//!
//! - bounded: every field has a finite maximum (no unbounded strings or sequences)
//! - plain: the encoding is a byte-for-byte image of the C-layout host struct, so it can be
//!   copied in bulk
//!
//! Strings and sequences are never plain (the host holds a pointer, the wire holds the
//! content).

use crate::{
    types::string::LENGTH_PREFIX,
    util::padding,
    FieldKind, Shape,
};
use tracing::debug;

/// Size classification of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Fixed size equal to the in-memory layout, bulk-copyable.
    Plain(usize),
    /// Finite worst-case size.
    Bounded(usize),
    /// No finite worst case.
    Unbounded,
}

impl SizeClass {
    /// Returns the worst-case encoded size, if finite.
    pub fn max_size(&self) -> Option<usize> {
        match self {
            Self::Plain(size) | Self::Bounded(size) => Some(*size),
            Self::Unbounded => None,
        }
    }

    /// Returns true if the encoding matches the host layout.
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// Returns true if the worst-case size is finite.
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Self::Unbounded)
    }
}

impl From<MaxSize> for SizeClass {
    fn from(max: MaxSize) -> Self {
        if max.plain {
            Self::Plain(max.bytes)
        } else if max.bounded {
            Self::Bounded(max.bytes)
        } else {
            Self::Unbounded
        }
    }
}

/// Raw result of a worst-case walk starting at some stream position.
///
/// `bytes` includes the leading padding of the first field. When `bounded` is false it only
/// counts the fixed part (length prefixes and terminators). A worst case that does not fit in a
/// `usize` is reported as unbounded with `bytes` saturated at `usize::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxSize {
    pub bytes: usize,
    pub bounded: bool,
    pub plain: bool,
}

impl MaxSize {
    const EMPTY: Self = Self {
        bytes: 0,
        bounded: true,
        plain: true,
    };

    const OVERFLOW: Self = Self {
        bytes: usize::MAX,
        bounded: false,
        plain: false,
    };

    fn absorb(&mut self, other: Self) {
        match self.bytes.checked_add(other.bytes) {
            Some(bytes) => {
                self.bytes = bytes;
                self.bounded &= other.bounded;
                self.plain &= other.plain;
            }
            None => *self = Self::OVERFLOW,
        }
    }
}

/// Largest alignment of any wire value. Padding depends only on the position modulo this.
const MAX_ALIGNMENT: usize = 8;

impl Shape {
    /// Returns the size class of this shape.
    ///
    /// Computed on first use (relative to stream offset 0) and cached for the lifetime of the
    /// shape.
    pub fn classify(&self) -> SizeClass {
        *self.class.get_or_init(|| {
            let max = self.max_size_at(0);
            let class = SizeClass::from(max);
            debug!(shape = %self.qualified_name(), ?class, "classified shape");
            class
        })
    }

    /// Walks the fields assuming the record starts at stream position `origin`.
    pub fn max_size_at(&self, origin: usize) -> MaxSize {
        let fields = self.fields();
        let offsets = self.host_offsets();

        // Wire offsets are measured from the first field, past any leading padding.
        let Some(base) = origin.checked_add(leading_padding(fields[0].kind(), origin)) else {
            return MaxSize::OVERFLOW;
        };
        let mut position = origin;
        let mut max = MaxSize::EMPTY;
        let mut last_member = 0;
        for (field, host_offset) in fields.iter().zip(offsets) {
            let lead = leading_padding(field.kind(), position);
            let member = kind_max(field.kind(), position);
            let Some(next) = position.checked_add(member.bytes) else {
                return MaxSize::OVERFLOW;
            };
            if position + lead - base != *host_offset {
                max.plain = false;
            }
            last_member = member.bytes - lead;
            position = next;
            max.absorb(member);
        }

        let total = position - base;
        if max.plain && offsets[offsets.len() - 1].checked_add(last_member) != Some(total) {
            max.plain = false;
        }
        max
    }
}

/// Padding inserted before the first byte of a value of `kind` written at `position`.
fn leading_padding(kind: &FieldKind, position: usize) -> usize {
    match kind {
        FieldKind::Scalar(primitive) => padding(position, primitive.width()),
        FieldKind::String { .. } | FieldKind::Sequence { .. } => padding(position, LENGTH_PREFIX),
        FieldKind::Array { element, .. } => leading_padding(element, position),
        FieldKind::Nested(shape) => leading_padding(shape.fields()[0].kind(), position),
    }
}

fn kind_max(kind: &FieldKind, position: usize) -> MaxSize {
    match kind {
        FieldKind::Scalar(primitive) => MaxSize {
            bytes: padding(position, primitive.width()) + primitive.width(),
            ..MaxSize::EMPTY
        },
        FieldKind::String { bound } => {
            let fixed = padding(position, LENGTH_PREFIX) + LENGTH_PREFIX + 1;
            match fixed.checked_add(bound.unwrap_or(0)) {
                Some(bytes) => MaxSize {
                    bytes,
                    bounded: bound.is_some(),
                    plain: false,
                },
                None => MaxSize::OVERFLOW,
            }
        }
        FieldKind::Array { element, len } => elements_max(element, *len, position),
        FieldKind::Sequence { element, bound } => {
            let prefix = padding(position, LENGTH_PREFIX) + LENGTH_PREFIX;
            let Some(start) = position.checked_add(prefix) else {
                return MaxSize::OVERFLOW;
            };
            let mut max = MaxSize {
                bytes: prefix,
                plain: false,
                ..MaxSize::EMPTY
            };
            match bound {
                Some(bound) => max.absorb(elements_max(element, *bound, start)),
                None => max.bounded = false,
            }
            max
        }
        FieldKind::Nested(shape) => shape.max_size_at(position),
    }
}

fn elements_max(element: &FieldKind, count: usize, start: usize) -> MaxSize {
    if let FieldKind::Scalar(primitive) = element {
        if count == 0 {
            return MaxSize::EMPTY;
        }
        let width = primitive.width();
        return match count
            .checked_mul(width)
            .and_then(|bytes| bytes.checked_add(padding(start, width)))
        {
            Some(bytes) => MaxSize {
                bytes,
                ..MaxSize::EMPTY
            },
            None => MaxSize::OVERFLOW,
        };
    }

    // Elements are plain only if each one starts a full host stride after the previous one.
    let Some(stride) = element.host_layout().map(|layout| layout.size) else {
        return MaxSize::OVERFLOW;
    };
    let mut max = MaxSize::EMPTY;
    let mut position = start;
    let mut head = None;

    // An element's worst case depends only on `position % MAX_ALIGNMENT`, so once a residue
    // repeats the walk is periodic and the remaining whole periods can be skipped.
    let mut seen: [Option<(usize, usize)>; MAX_ALIGNMENT] = [None; MAX_ALIGNMENT];
    let mut index = 0;
    while index < count {
        let residue = position % MAX_ALIGNMENT;
        if let Some((earlier, at)) = seen[residue].take() {
            let period = index - earlier;
            let advance = position - at;
            let periods = (count - index) / period;
            if period.checked_mul(stride) != Some(advance) {
                max.plain = false;
            }
            let Some(skipped) = periods.checked_mul(advance) else {
                return MaxSize::OVERFLOW;
            };
            let Some(next) = position.checked_add(skipped) else {
                return MaxSize::OVERFLOW;
            };
            max.absorb(MaxSize {
                bytes: skipped,
                ..MaxSize::EMPTY
            });
            position = next;
            index += periods * period;
            // Fewer than `period` elements remain, so no residue can repeat again.
            seen = [None; MAX_ALIGNMENT];
            continue;
        }
        seen[residue] = Some((index, position));

        let member = kind_max(element, position);
        let Some(next) = position.checked_add(member.bytes) else {
            return MaxSize::OVERFLOW;
        };
        let begin = position + leading_padding(element, position);
        let first = *head.get_or_insert(begin);
        if index.checked_mul(stride) != Some(begin - first) {
            max.plain = false;
        }
        position = next;
        max.absorb(member);
        index += 1;
    }
    max
}
