//! Field codecs for the value kinds a record can hold.
//!
//! - [primitives]: fixed-width scalars, aligned to their own width
//! - [string]: length-prefixed, NUL-terminated strings
//! - [value]: the dynamically typed [value::Value] a record field holds

pub mod primitives;
pub mod string;
pub mod value;
