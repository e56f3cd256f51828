//! # Object Codec Framework
//!
//! The generic half of the crate: everything here is independent of the
//! concrete ledger entities and works for any type implementing
//! [`Serializable`].
//!
//! ```text
//! varint.rs     — LEB128 varints for counts and discriminants
//! object.rs     — Serializable contract, selectors, object decode primitive
//! array.rs      — ArrayRules, lexical order checks, array-of-objects codec
//! serde_hex.rs  — hex rendering of byte arrays for JSON inspection
//! ```
//!
//! Decode flows one way: bytes → array codec → object primitive → type
//! selector → entity decoder → validators. Encoding mirrors it. There is no
//! shared state anywhere in the framework, so independent buffers can be
//! processed from as many threads as the caller likes.

pub mod array;
pub mod object;
pub mod serde_hex;
pub mod varint;

pub use array::{
    deserialize_array_of_objects, serialize_array_of_objects, sort_by_serialized_bytes,
    write_array_of_objects, ArrayRules, LexicalOrderValidator,
};
pub use object::{
    deserialize_object, deserialize_object_exact, read_type_and_advance, write_type_header,
    DeSeriMode, Serializable, SerializableSelector, TypeSelector,
};
pub(crate) use object::read_array;
pub use varint::{check_canonical_uvarint, put_uvarint, uvarint, uvarint_len, MAX_VARINT_LEN64};
