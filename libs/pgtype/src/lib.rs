//! # plfm-pgtype
//!
//! Nullable Postgres value types and their conversions for the plfm-vt
//! database client.
//!
//! ## Design Principles
//!
//! - A value is either present or SQL NULL; NULL never carries bytes
//! - Every value moves between five shapes: the in-memory container, the
//!   wire text form, the wire binary form, a driver cell, and JSON
//! - Ingestion (`set`) and extraction (`assign_to`) dispatch on capabilities,
//!   with injectable resolvers for types declared outside this crate
//! - Encoders append into a caller-owned buffer so a statement can batch
//!   many parameters into one message
//!
//! ## UUID Format
//!
//! The canonical text form is the dashed lowercase `8-4-4-4-12` layout:
//!
//! - `a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11`
//!
//! The binary wire form is the 16 raw bytes, and JSON is the quoted
//! canonical text or a bare `null`.

mod codec;
pub mod convert;
pub mod driver;
mod error;
mod macros;
mod uuid;
mod value;

pub use codec::{BinaryDecoder, BinaryEncoder, IsNull, PgValue, TextDecoder, TextEncoder, TypeValue};
pub use convert::Dest;
pub use driver::{DriverValue, Scanner, Valuer};
pub use error::{PgTypeError, Result};
pub use self::uuid::*;
pub use value::{DynValue, Value};
