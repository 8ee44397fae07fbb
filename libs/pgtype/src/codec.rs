//! Capability traits shared by every value type.

use bytes::BytesMut;

use crate::convert::Dest;
use crate::{Result, Value};

/// Whether an encoder produced a value or SQL NULL.
///
/// `Yes` means nothing was appended and the parameter must be sent as
/// absent, which is distinct from a zero-length value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsNull {
    Yes,
    No,
}

/// A value type known to the type registry.
pub trait TypeValue {
    /// Returns an empty value carrying the same hooks as `self`.
    #[must_use]
    fn new_type_value(&self) -> Self
    where
        Self: Sized;

    /// The Postgres type name.
    fn type_name(&self) -> &'static str;
}

/// Generic ingestion and extraction.
pub trait PgValue {
    /// Replaces the value with `src`.
    fn set(&mut self, src: impl Into<Value>) -> Result<()>
    where
        Self: Sized;

    /// Returns the value in its canonical representation.
    fn get(&self) -> Value;

    /// Writes the value into `dst`.
    fn assign_to<'a>(&self, dst: impl Into<Dest<'a>>) -> Result<()>
    where
        Self: Sized;
}

pub trait TextDecoder {
    /// Decodes a text wire payload; `None` is SQL NULL.
    fn decode_text(&mut self, src: Option<&[u8]>) -> Result<()>;
}

pub trait BinaryDecoder {
    /// Decodes a binary wire payload; `None` is SQL NULL.
    fn decode_binary(&mut self, src: Option<&[u8]>) -> Result<()>;
}

pub trait TextEncoder {
    /// Appends the text wire form to `buf`.
    fn encode_text(&self, buf: &mut BytesMut) -> Result<IsNull>;
}

pub trait BinaryEncoder {
    /// Appends the binary wire form to `buf`.
    fn encode_binary(&self, buf: &mut BytesMut) -> Result<IsNull>;
}
