//! The object codec contract and the type-dispatched decode primitive.
//!
//! Every wire entity implements [`Serializable`]. Families of entities that
//! share a discriminant space (addresses, signatures, unlock blocks, ...)
//! additionally implement [`TypeSelector`], which maps a discriminant to an
//! empty instance of the matching variant.
//!
//! ## Discriminant convention
//!
//! An entity's `decode` always starts at its own leading discriminant
//! and consumes it. [`deserialize_object`] only *peeks* the discriminant to
//! pick the variant and then hands the untouched buffer to that variant, so
//! the discriminant bytes are counted exactly once.

use tracing::trace;

use super::varint::{check_canonical_uvarint, put_uvarint, uvarint};
use crate::error::{CodecError, TypeFamily};

// ---------------------------------------------------------------------------
// DeSeriMode
// ---------------------------------------------------------------------------

/// Whether de/serialization runs the validation layer on top of the
/// structural codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeSeriMode {
    /// Decode/encode structure only: lengths, varints, known discriminants.
    NoValidation,
    /// Also check discriminants, array rules and collection validators.
    #[default]
    PerformValidation,
}

impl DeSeriMode {
    /// Returns `true` if the validation layer is active.
    pub fn validates(self) -> bool {
        self == Self::PerformValidation
    }
}

// ---------------------------------------------------------------------------
// Serializable
// ---------------------------------------------------------------------------

/// Something that can encode itself to and decode itself from wire bytes.
pub trait Serializable {
    /// Decodes `self` from the start of `data` and returns the number of
    /// bytes consumed.
    ///
    /// Precondition: `data` starts at this object's discriminant.
    /// Postcondition: the discriminant is consumed and the returned count
    /// never exceeds `data.len()`. Decoded bytes are copied, `data` is not
    /// borrowed past the call. On failure `self` is left unchanged.
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError>;

    /// Encodes `self`, leading discriminant included.
    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError>;

    /// Name used in error context. Family enums report the active variant.
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// A function that, given a discriminant, returns an empty instance of the
/// matching concrete type or fails with [`CodecError::UnknownType`].
pub type SerializableSelector<T> = fn(u64) -> Result<T, CodecError>;

/// A closed family of entities sharing one discriminant space.
pub trait TypeSelector: Serializable + Sized {
    /// The family this selector resolves discriminants for.
    const FAMILY: TypeFamily;

    /// Returns an empty instance for `ty`. Unknown values fail, they are
    /// never mapped to a default variant.
    fn select(ty: u64) -> Result<Self, CodecError>;
}

// ---------------------------------------------------------------------------
// Object decode primitive
// ---------------------------------------------------------------------------

/// Decodes one type-discriminated object from the start of `data`.
///
/// Returns the object and the total bytes consumed (discriminant included).
/// Failures of the selected entity are wrapped with its type name.
pub fn deserialize_object<T: Serializable>(
    data: &[u8],
    mode: DeSeriMode,
    selector: SerializableSelector<T>,
) -> Result<(T, usize), CodecError> {
    let (ty, _) = uvarint(data)?;
    let mut seri = selector(ty)?;
    let entity = seri.type_name();
    let consumed = seri.decode(data, mode).map_err(|e| e.in_entity(entity))?;
    trace!(entity, consumed, "deserialized object");
    Ok((seri, consumed))
}

/// Decodes one object that must span all of `data`.
pub fn deserialize_object_exact<T: Serializable>(
    data: &[u8],
    mode: DeSeriMode,
    selector: SerializableSelector<T>,
) -> Result<T, CodecError> {
    let (seri, consumed) = deserialize_object(data, mode, selector)?;
    if consumed != data.len() {
        return Err(CodecError::TrailingBytes {
            consumed,
            trailing: data.len() - consumed,
        });
    }
    Ok(seri)
}

// ---------------------------------------------------------------------------
// Discriminant helpers
// ---------------------------------------------------------------------------

/// Reads the leading discriminant and returns the remaining bytes together
/// with the discriminant's encoded length.
///
/// Under validation the discriminant must equal `should_type` and use its
/// minimal encoding.
pub fn read_type_and_advance(
    data: &[u8],
    should_type: u64,
    family: TypeFamily,
    mode: DeSeriMode,
) -> Result<(&[u8], usize), CodecError> {
    let (ty, type_len) = uvarint(data)?;
    if mode.validates() {
        if ty != should_type {
            return Err(CodecError::TypeMismatch {
                family,
                expected: should_type,
                actual: ty,
            });
        }
        check_canonical_uvarint(ty, type_len, "discriminant")?;
    }
    Ok((&data[type_len..], type_len))
}

/// Starts an encode buffer with `ty` written as the leading varint.
/// `capacity` is a size hint for the whole encoding.
pub fn write_type_header(ty: u64, capacity: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(capacity);
    put_uvarint(&mut buf, ty);
    buf
}

/// Copies a fixed-size array out of the start of `data`. Callers check the
/// length first.
pub(crate) fn read_array<const N: usize>(data: &[u8]) -> Result<[u8; N], CodecError> {
    let bytes = data.get(..N).ok_or(CodecError::BufferTooShort {
        needed: N,
        available: data.len(),
    })?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}
