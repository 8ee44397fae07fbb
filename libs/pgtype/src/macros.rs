//! Macros for declaring conversions into the loosely typed value enums.

/// Implements `From<$ty> for $target` for each listed source type.
///
/// Each arm names the bound input and the expression producing the value,
/// so optional inputs can map their absent case to the null variant.
///
/// # Example
///
/// ```ignore
/// impl_value_from!(Value {
///     bool => |v| Value::Bool(v),
///     Option<String> => |v| v.map_or(Value::Null, Value::Text),
/// });
/// ```
macro_rules! impl_value_from {
    ($target:ty { $($ty:ty => |$v:ident| $body:expr),* $(,)? }) => {
        $(
            impl From<$ty> for $target {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

pub(crate) use impl_value_from;
