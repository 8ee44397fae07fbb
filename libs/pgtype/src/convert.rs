//! Conversion helpers shared by the value types.
//!
//! These are the framework-level resolvers that `set` and `assign_to` fall
//! back to once a value type has exhausted the shapes it handles itself:
//!
//! - [`null_assign_to`] writes NULL into destinations that can hold it
//! - [`next_assign_dst`] offers a more specific destination to retry against
//! - [`underlying_uuid_type`] unwraps types layered over the 16-byte shape

use std::any::Any;
use std::fmt;

use crate::{DynValue, PgTypeError, Result, UuidDecoder, Value};

/// A destination for `assign_to`.
///
/// Any `&mut T` converts into `Dest::Any`. Destinations that implement the
/// decode capability themselves are passed as `Dest::Decoder`.
pub enum Dest<'a> {
    /// The destination pulls the value out of the source.
    Decoder(&'a mut dyn UuidDecoder),
    /// A plain destination, dispatched on its concrete type.
    Any {
        value: &'a mut dyn Any,
        type_name: &'static str,
    },
}

impl Dest<'_> {
    /// Type name of the destination, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dest::Decoder(_) => "dyn UuidDecoder",
            Dest::Any { type_name, .. } => type_name,
        }
    }
}

impl<'a, T: Any> From<&'a mut T> for Dest<'a> {
    fn from(value: &'a mut T) -> Self {
        Dest::Any {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Debug for Dest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dest").field(&self.type_name()).finish()
    }
}

/// Assigns NULL to `dst`.
///
/// Optional destinations become `None` and byte vectors are emptied. Any
/// other destination cannot represent NULL and is left untouched.
pub fn null_assign_to(dst: &mut dyn Any, type_name: &'static str) -> Result<()> {
    fn clear<T: 'static>(dst: &mut dyn Any) -> bool {
        match dst.downcast_mut::<Option<T>>() {
            Some(v) => {
                *v = None;
                true
            }
            None => false,
        }
    }

    if clear::<String>(dst)
        || clear::<Vec<u8>>(dst)
        || clear::<[u8; 16]>(dst)
        || clear::<::uuid::Uuid>(dst)
    {
        return Ok(());
    }

    if let Some(v) = dst.downcast_mut::<Vec<u8>>() {
        *v = Vec::new();
        return Ok(());
    }

    Err(PgTypeError::NullAssignment(type_name))
}

/// Offers a more specific destination compatible with `dst`.
///
/// An `Option<T>` is filled with a default `T` and the inner value is
/// offered; a `uuid::Uuid` is offered through its decoder. Returns `None`
/// when no alternative exists.
pub fn next_assign_dst(dst: &mut dyn Any) -> Option<Dest<'_>> {
    fn fill<T: Default + 'static>(dst: &mut dyn Any) -> Option<Dest<'_>> {
        dst.downcast_mut::<Option<T>>()
            .map(|v| Dest::from(v.get_or_insert_with(T::default)))
    }

    if dst.is::<Option<String>>() {
        return fill::<String>(dst);
    }
    if dst.is::<Option<Vec<u8>>>() {
        return fill::<Vec<u8>>(dst);
    }
    if dst.is::<Option<[u8; 16]>>() {
        return fill::<[u8; 16]>(dst);
    }
    if dst.is::<Option<::uuid::Uuid>>() {
        return fill::<::uuid::Uuid>(dst);
    }
    if dst.is::<::uuid::Uuid>() {
        return dst
            .downcast_mut::<::uuid::Uuid>()
            .map(|u| Dest::Decoder(u));
    }

    None
}

/// Returns `src` in the 16-byte shape when it is layered over it.
pub fn underlying_uuid_type(src: &dyn DynValue) -> Option<Value> {
    src.underlying()
        .filter(|value| matches!(value, Value::Uuid(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_assign_clears_options() {
        let mut s = Some("x".to_string());
        null_assign_to(&mut s, "Option<String>").unwrap();
        assert_eq!(s, None);

        let mut b = Some([7u8; 16]);
        null_assign_to(&mut b, "Option<[u8; 16]>").unwrap();
        assert_eq!(b, None);

        let mut u = Some(::uuid::Uuid::from_bytes([1; 16]));
        null_assign_to(&mut u, "Option<Uuid>").unwrap();
        assert_eq!(u, None);
    }

    #[test]
    fn test_null_assign_empties_vec() {
        let mut v = vec![1u8, 2, 3];
        null_assign_to(&mut v, "Vec<u8>").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_null_assign_rejects_plain_string() {
        let mut s = "keep".to_string();
        let err = null_assign_to(&mut s, "String").unwrap_err();
        assert!(matches!(err, PgTypeError::NullAssignment("String")));
        assert_eq!(s, "keep");
    }

    #[test]
    fn test_next_dst_fills_option() {
        let mut s: Option<String> = None;
        let next = next_assign_dst(&mut s).unwrap();
        assert_eq!(next.type_name(), std::any::type_name::<String>());
        drop(next);
        assert_eq!(s, Some(String::new()));
    }

    #[test]
    fn test_next_dst_offers_uuid_decoder() {
        let mut u = ::uuid::Uuid::nil();
        assert!(matches!(next_assign_dst(&mut u), Some(Dest::Decoder(_))));
    }

    #[test]
    fn test_next_dst_none_for_unknown() {
        let mut n = 0i32;
        assert!(next_assign_dst(&mut n).is_none());
    }

    #[test]
    fn test_underlying_only_accepts_uuid_shape() {
        #[derive(Debug)]
        struct Textual;

        impl DynValue for Textual {
            fn underlying(&self) -> Option<Value> {
                Some(Value::Text("abc".to_string()))
            }
        }

        assert!(underlying_uuid_type(&Textual).is_none());
        let id = ::uuid::Uuid::from_bytes([9; 16]);
        assert_eq!(underlying_uuid_type(&id), Some(Value::Uuid([9; 16])));
    }
}
