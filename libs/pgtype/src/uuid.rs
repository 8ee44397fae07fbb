//! The `uuid` value type.
//!
//! [`Uuid`] is a nullable 16-byte container. It parses and formats the
//! canonical dashed text form, implements both wire codecs, and converts
//! to and from the loosely typed [`Value`], [`DriverValue`] and JSON.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::BytesMut;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::convert::{self, Dest};
use crate::driver::{self, DriverValue, Scanner, Valuer};
use crate::macros::impl_value_from;
use crate::{
    BinaryDecoder, BinaryEncoder, DynValue, IsNull, PgTypeError, PgValue, Result, TextDecoder,
    TextEncoder, TypeValue, Value,
};

/// Length of the binary form in bytes.
pub const UUID_LEN: usize = 16;

/// Length of the canonical dashed text form.
pub const UUID_TEXT_LEN: usize = 36;

/// Length of the text form without dashes.
const UUID_HEX_LEN: usize = 32;

/// Length of the JSON literal: the text form plus two quotes.
const UUID_JSON_LEN: usize = UUID_TEXT_LEN + 2;

const JSON_NULL: &[u8] = b"null";

/// A destination that pulls a [`Uuid`] into itself.
pub trait UuidDecoder {
    fn decode_uuid(&mut self, src: &Uuid) -> Result<()>;
}

/// Resolves a destination into a decoder for it.
pub type DecoderWrapper =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<Box<dyn UuidDecoder + 'a>> + Send + Sync>;

/// Replaces the default behavior of [`Uuid::get`].
pub type Getter = Arc<dyn Fn(&Uuid) -> Value + Send + Sync>;

/// Parses the canonical text form, or the 32 hex digits without dashes.
///
/// Dashes are stripped by position and not checked.
pub fn parse_uuid(src: &str) -> Result<[u8; UUID_LEN]> {
    parse_uuid_bytes(src.as_bytes())
}

fn parse_uuid_bytes(src: &[u8]) -> Result<[u8; UUID_LEN]> {
    let mut digits = [0u8; UUID_HEX_LEN];
    match src.len() {
        UUID_TEXT_LEN => {
            digits[0..8].copy_from_slice(&src[0..8]);
            digits[8..12].copy_from_slice(&src[9..13]);
            digits[12..16].copy_from_slice(&src[14..18]);
            digits[16..20].copy_from_slice(&src[19..23]);
            digits[20..32].copy_from_slice(&src[24..36]);
        }
        // dashes already stripped, assume valid
        UUID_HEX_LEN => digits.copy_from_slice(src),
        actual => {
            return Err(PgTypeError::LengthMismatch {
                target: "uuid text",
                actual,
            })
        }
    }

    let mut dst = [0u8; UUID_LEN];
    hex::decode_to_slice(digits, &mut dst)?;
    Ok(dst)
}

/// Formats bytes in the canonical `8-4-4-4-12` lowercase form.
pub fn encode_uuid(src: &[u8; UUID_LEN]) -> String {
    let mut text = [0u8; UUID_TEXT_LEN];
    format_into(src, &mut text).to_owned()
}

fn format_into<'b>(src: &[u8; UUID_LEN], text: &'b mut [u8; UUID_TEXT_LEN]) -> &'b str {
    ::uuid::Uuid::from_bytes(*src).hyphenated().encode_lower(text)
}

/// A nullable UUID.
///
/// Hooks installed through [`UuidBuilder`] travel with the value but are
/// not part of its identity: equality only looks at the bytes.
#[derive(Clone, Default)]
pub struct Uuid {
    bytes: [u8; UUID_LEN],
    valid: bool,
    decoder_wrapper: Option<DecoderWrapper>,
    getter: Option<Getter>,
}

impl Uuid {
    /// Creates a NULL value without hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for a value with hooks.
    pub fn builder() -> UuidBuilder {
        UuidBuilder::default()
    }

    /// Creates a present value from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; UUID_LEN]) -> Self {
        Self {
            bytes,
            valid: true,
            ..Self::default()
        }
    }

    /// Returns true unless the value is NULL.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the bytes, or `None` for NULL.
    pub fn as_bytes(&self) -> Option<&[u8; UUID_LEN]> {
        self.valid.then_some(&self.bytes)
    }

    /// Returns an empty value carrying the same hooks.
    #[must_use]
    pub fn new_type_value(&self) -> Self {
        Self {
            decoder_wrapper: self.decoder_wrapper.clone(),
            getter: self.getter.clone(),
            ..Self::default()
        }
    }

    /// The Postgres type name.
    pub fn type_name(&self) -> &'static str {
        "uuid"
    }

    /// Replaces the value with `src`.
    ///
    /// On error the previous value is kept.
    pub fn set(&mut self, src: impl Into<Value>) -> Result<()> {
        self.set_value(src.into())
    }

    fn set_value(&mut self, src: Value) -> Result<()> {
        match src {
            Value::Null => self.set_nil(),
            Value::Uuid(bytes) => self.set_byte_array(bytes),
            Value::Bytes(bytes) => self.set_byte_slice(&bytes)?,
            Value::Text(text) => self.set_str(&text)?,
            Value::Dyn(value) => {
                if let Some(inner) = value.get() {
                    if !inner.is_identical(&value) {
                        return self.set_value(inner);
                    }
                }

                if let Some(inner) = convert::underlying_uuid_type(&*value) {
                    return self.set_value(inner);
                }

                trace!(source = value.type_name(), "no uuid conversion for source");
                return Err(PgTypeError::UnsupportedSourceType(value.type_name()));
            }
            other => {
                trace!(source = other.type_name(), "no uuid conversion for source");
                return Err(PgTypeError::UnsupportedSourceType(other.type_name()));
            }
        }

        Ok(())
    }

    fn set_nil(&mut self) {
        self.bytes = [0; UUID_LEN];
        self.valid = false;
    }

    fn set_byte_array(&mut self, bytes: [u8; UUID_LEN]) {
        self.bytes = bytes;
        self.valid = true;
    }

    fn set_byte_slice(&mut self, bytes: &[u8]) -> Result<()> {
        let bytes: [u8; UUID_LEN] = bytes.try_into().map_err(|_| PgTypeError::LengthMismatch {
            target: "uuid bytes",
            actual: bytes.len(),
        })?;
        self.set_byte_array(bytes);
        Ok(())
    }

    fn set_str(&mut self, text: &str) -> Result<()> {
        let bytes = parse_uuid(text)?;
        self.set_byte_array(bytes);
        Ok(())
    }

    /// Returns the value in its canonical representation.
    ///
    /// An installed getter hook is authoritative. Without one, NULL is
    /// [`Value::Null`] and a present value is [`Value::Uuid`].
    pub fn get(&self) -> Value {
        if let Some(getter) = &self.getter {
            return getter(self);
        }

        if !self.valid {
            return Value::Null;
        }

        Value::Uuid(self.bytes)
    }

    /// Writes the value into `dst`.
    ///
    /// A destination with no known conversion is left unchanged and the
    /// call still succeeds; use [`assign_to_strict`](Self::assign_to_strict)
    /// to get an error instead.
    pub fn assign_to<'a>(&self, dst: impl Into<Dest<'a>>) -> Result<()> {
        self.assign(dst.into(), false)
    }

    /// Like [`assign_to`](Self::assign_to), but fails with
    /// [`PgTypeError::UnsupportedConversion`] when nothing was written.
    pub fn assign_to_strict<'a>(&self, dst: impl Into<Dest<'a>>) -> Result<()> {
        self.assign(dst.into(), true)
    }

    fn assign(&self, dst: Dest<'_>, strict: bool) -> Result<()> {
        let (dst, type_name) = match dst {
            Dest::Decoder(decoder) => return decoder.decode_uuid(self),
            Dest::Any { value, type_name } => (value, type_name),
        };

        if let Some(wrapper) = &self.decoder_wrapper {
            if let Some(mut decoder) = wrapper(&mut *dst) {
                trace!(destination = type_name, "decoder wrapper resolved destination");
                return decoder.decode_uuid(self);
            }
        }

        if !self.valid {
            return convert::null_assign_to(dst, type_name);
        }

        if let Some(v) = dst.downcast_mut::<[u8; UUID_LEN]>() {
            *v = self.bytes;
            return Ok(());
        }
        if let Some(v) = dst.downcast_mut::<Vec<u8>>() {
            *v = self.bytes.to_vec();
            return Ok(());
        }
        if let Some(v) = dst.downcast_mut::<String>() {
            *v = encode_uuid(&self.bytes);
            return Ok(());
        }

        if let Some(next) = convert::next_assign_dst(dst) {
            return self.assign(next, strict);
        }

        if strict {
            return Err(PgTypeError::UnsupportedConversion(type_name));
        }

        trace!(destination = type_name, "no assignment path for destination, leaving it unchanged");
        Ok(())
    }

    /// Returns the JSON literal: the quoted canonical text, or `null`.
    pub fn marshal_json(&self) -> Vec<u8> {
        if !self.valid {
            return JSON_NULL.to_vec();
        }

        let mut text = [0u8; UUID_TEXT_LEN];
        let mut out = Vec::with_capacity(UUID_JSON_LEN);
        out.push(b'"');
        out.extend_from_slice(format_into(&self.bytes, &mut text).as_bytes());
        out.push(b'"');
        out
    }

    /// Reads a JSON literal produced by [`marshal_json`](Self::marshal_json).
    ///
    /// The enclosing quotes are stripped by position and not checked.
    pub fn unmarshal_json(&mut self, src: &[u8]) -> Result<()> {
        if src == JSON_NULL {
            return self.set(Value::Null);
        }

        if src.len() != UUID_JSON_LEN {
            return Err(PgTypeError::LengthMismatch {
                target: "uuid",
                actual: src.len(),
            });
        }

        let bytes = parse_uuid_bytes(&src[1..src.len() - 1])?;
        self.set_byte_array(bytes);
        Ok(())
    }
}

impl PartialEq for Uuid {
    fn eq(&self, other: &Self) -> bool {
        self.valid == other.valid && self.bytes == other.bytes
    }
}

impl Eq for Uuid {}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uuid")
            .field("bytes", &self.bytes)
            .field("valid", &self.valid)
            .field("decoder_wrapper", &self.decoder_wrapper.is_some())
            .field("getter", &self.getter.is_some())
            .finish()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("NULL");
        }

        let mut text = [0u8; UUID_TEXT_LEN];
        f.write_str(format_into(&self.bytes, &mut text))
    }
}

impl FromStr for Uuid {
    type Err = PgTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(Self::from_bytes)
    }
}

impl From<[u8; UUID_LEN]> for Uuid {
    fn from(bytes: [u8; UUID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<::uuid::Uuid> for Uuid {
    fn from(uuid: ::uuid::Uuid) -> Self {
        Self::from_bytes(uuid.into_bytes())
    }
}

impl TypeValue for Uuid {
    fn new_type_value(&self) -> Self {
        Uuid::new_type_value(self)
    }

    fn type_name(&self) -> &'static str {
        Uuid::type_name(self)
    }
}

impl PgValue for Uuid {
    fn set(&mut self, src: impl Into<Value>) -> Result<()> {
        Uuid::set(self, src)
    }

    fn get(&self) -> Value {
        Uuid::get(self)
    }

    fn assign_to<'a>(&self, dst: impl Into<Dest<'a>>) -> Result<()> {
        Uuid::assign_to(self, dst)
    }
}

impl DynValue for Uuid {
    fn get(&self) -> Option<Value> {
        Some(Uuid::get(self))
    }
}

impl DynValue for ::uuid::Uuid {
    fn underlying(&self) -> Option<Value> {
        Some(Value::Uuid(*self.as_bytes()))
    }
}

impl UuidDecoder for ::uuid::Uuid {
    fn decode_uuid(&mut self, src: &Uuid) -> Result<()> {
        let bytes = src
            .as_bytes()
            .ok_or(PgTypeError::NullAssignment("uuid::Uuid"))?;
        *self = ::uuid::Uuid::from_bytes(*bytes);
        Ok(())
    }
}

impl_value_from!(Value {
    Uuid => |v| Value::dynamic(v),
    ::uuid::Uuid => |v| Value::dynamic(v),
});

impl TextDecoder for Uuid {
    fn decode_text(&mut self, src: Option<&[u8]>) -> Result<()> {
        let Some(src) = src else {
            self.set_nil();
            return Ok(());
        };

        if src.len() != UUID_TEXT_LEN {
            return Err(PgTypeError::LengthMismatch {
                target: "uuid",
                actual: src.len(),
            });
        }

        let bytes = parse_uuid_bytes(src)?;
        self.set_byte_array(bytes);
        Ok(())
    }
}

impl BinaryDecoder for Uuid {
    fn decode_binary(&mut self, src: Option<&[u8]>) -> Result<()> {
        let Some(src) = src else {
            self.set_nil();
            return Ok(());
        };

        if src.len() != UUID_LEN {
            return Err(PgTypeError::LengthMismatch {
                target: "uuid",
                actual: src.len(),
            });
        }

        self.set_byte_slice(src)
    }
}

impl TextEncoder for Uuid {
    fn encode_text(&self, buf: &mut BytesMut) -> Result<IsNull> {
        if !self.valid {
            return Ok(IsNull::Yes);
        }

        let mut text = [0u8; UUID_TEXT_LEN];
        buf.extend_from_slice(format_into(&self.bytes, &mut text).as_bytes());
        Ok(IsNull::No)
    }
}

impl BinaryEncoder for Uuid {
    fn encode_binary(&self, buf: &mut BytesMut) -> Result<IsNull> {
        if !self.valid {
            return Ok(IsNull::Yes);
        }

        buf.extend_from_slice(&self.bytes);
        Ok(IsNull::No)
    }
}

impl Scanner for Uuid {
    fn scan(&mut self, src: &DriverValue) -> Result<()> {
        match src {
            DriverValue::Null => {
                self.set_nil();
                Ok(())
            }
            DriverValue::Text(text) => self.decode_text(Some(text.as_bytes())),
            // borrowed for the whole decode, so the driver cannot reuse it underneath
            DriverValue::Bytes(bytes) => self.decode_text(Some(bytes.as_slice())),
            other => Err(PgTypeError::UnsupportedScanType(other.type_name())),
        }
    }
}

impl Valuer for Uuid {
    fn value(&self) -> Result<DriverValue> {
        driver::encode_value_text(self)
    }
}

impl Serialize for Uuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !self.valid {
            return serializer.serialize_none();
        }

        let mut text = [0u8; UUID_TEXT_LEN];
        serializer.serialize_str(format_into(&self.bytes, &mut text))
    }
}

impl<'de> Deserialize<'de> for Uuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        let mut uuid = Uuid::new();
        uuid.set(text).map_err(serde::de::Error::custom)?;
        Ok(uuid)
    }
}

/// Builder for a [`Uuid`] with hooks.
#[derive(Default)]
pub struct UuidBuilder {
    decoder_wrapper: Option<DecoderWrapper>,
    getter: Option<Getter>,
}

impl UuidBuilder {
    /// Installs a resolver consulted by `assign_to` for destinations that
    /// are not decoders themselves.
    pub fn decoder_wrapper<F>(mut self, wrapper: F) -> Self
    where
        F: for<'a> Fn(&'a mut dyn Any) -> Option<Box<dyn UuidDecoder + 'a>> + Send + Sync + 'static,
    {
        self.decoder_wrapper = Some(Arc::new(wrapper));
        self
    }

    /// Installs a hook that replaces `get`.
    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&Uuid) -> Value + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Builds a NULL value carrying the hooks.
    pub fn build(self) -> Uuid {
        Uuid {
            decoder_wrapper: self.decoder_wrapper,
            getter: self.getter,
            ..Uuid::default()
        }
    }
}
