//! Interop with the generic driver cell exchanged by the database access layer.

use bytes::BytesMut;

use crate::macros::impl_value_from;
use crate::{IsNull, Result, TextEncoder};

/// Initial capacity of the scratch buffer used by [`encode_value_text`].
const VALUE_TEXT_CAPACITY: usize = 32;

/// An untyped driver cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DriverValue {
    #[default]
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
}

impl DriverValue {
    /// Runtime type name of the carried value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DriverValue::Null => "null",
            DriverValue::Int64(_) => "i64",
            DriverValue::Float64(_) => "f64",
            DriverValue::Bool(_) => "bool",
            DriverValue::Bytes(_) => "Vec<u8>",
            DriverValue::Text(_) => "String",
        }
    }
}

impl_value_from!(DriverValue {
    i64 => |v| DriverValue::Int64(v),
    f64 => |v| DriverValue::Float64(v),
    bool => |v| DriverValue::Bool(v),
    Vec<u8> => |v| DriverValue::Bytes(v),
    &[u8] => |v| DriverValue::Bytes(v.to_vec()),
    String => |v| DriverValue::Text(v),
    &str => |v| DriverValue::Text(v.to_owned()),
});

/// Ingestion from a driver cell.
pub trait Scanner {
    fn scan(&mut self, src: &DriverValue) -> Result<()>;
}

/// Extraction into a driver cell.
pub trait Valuer {
    fn value(&self) -> Result<DriverValue>;
}

/// Encodes `src` with its text encoder and returns it as a driver cell.
///
/// A NULL encoding becomes [`DriverValue::Null`], anything else
/// [`DriverValue::Text`].
pub fn encode_value_text<T>(src: &T) -> Result<DriverValue>
where
    T: TextEncoder + ?Sized,
{
    let mut buf = BytesMut::with_capacity(VALUE_TEXT_CAPACITY);
    match src.encode_text(&mut buf)? {
        IsNull::Yes => Ok(DriverValue::Null),
        IsNull::No => Ok(DriverValue::Text(String::from_utf8(buf.to_vec())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Raw(Option<&'static [u8]>);

    impl TextEncoder for Raw {
        fn encode_text(&self, buf: &mut BytesMut) -> Result<IsNull> {
            match self.0 {
                Some(bytes) => {
                    buf.extend_from_slice(bytes);
                    Ok(IsNull::No)
                }
                None => Ok(IsNull::Yes),
            }
        }
    }

    #[test]
    fn test_encode_value_text_null() {
        assert_eq!(encode_value_text(&Raw(None)).unwrap(), DriverValue::Null);
    }

    #[test]
    fn test_encode_value_text_text() {
        assert_eq!(
            encode_value_text(&Raw(Some(&b"abc"[..]))).unwrap(),
            DriverValue::Text("abc".to_string())
        );
    }

    #[test]
    fn test_encode_value_text_rejects_invalid_utf8() {
        let err = encode_value_text(&Raw(Some(&b"\xff\xfe"[..]))).unwrap_err();
        assert!(matches!(err, crate::PgTypeError::InvalidUtf8(_)));
    }
}
