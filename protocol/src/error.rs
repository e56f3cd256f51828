//! Error types for the wire codec.
//!
//! Every encode and decode path returns a [`CodecError`]. Malformed bytes and
//! failed validation rules share the same enum and are told apart only by
//! their variant. Nothing in this crate panics on bad input.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Context enums
// ---------------------------------------------------------------------------

/// The entity family a discriminant belongs to. Each family has its own
/// discriminant space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Address,
    Input,
    Output,
    Signature,
    UnlockBlock,
    Transaction,
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "address"),
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Signature => write!(f, "signature"),
            Self::UnlockBlock => write!(f, "unlock block"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

/// Which byte-length rule was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    Exact,
    Min,
    Max,
}

impl fmt::Display for LengthBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exactly"),
            Self::Min => write!(f, "at least"),
            Self::Max => write!(f, "at most"),
        }
    }
}

/// Which array count bound was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountBound {
    Min,
    Max,
}

impl fmt::Display for CountBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// Errors raised while encoding, decoding or validating wire objects.
///
/// Object decoding wraps failures in [`CodecError::Entity`] to name the
/// concrete type that was being decoded. Use [`CodecError::root_cause`] to
/// get at the underlying condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A byte region violates an exact, minimum or maximum length.
    #[error("invalid bytes: data must be {bound} {required} bytes long but is {actual}")]
    InvalidLength {
        bound: LengthBound,
        required: usize,
        actual: usize,
    },

    /// The buffer ended before a decode step could complete.
    #[error("not enough data for deserialization: needed {needed} bytes but only {available} available")]
    BufferTooShort { needed: usize, available: usize },

    /// A discriminant outside the known set of its family.
    #[error("unknown {family} type: discriminant {discriminant}")]
    UnknownType {
        family: TypeFamily,
        discriminant: u64,
    },

    /// An entity decoder found a discriminant other than its own.
    #[error("{family} type mismatch: expected {expected} but got {actual}")]
    TypeMismatch {
        family: TypeFamily,
        expected: u64,
        actual: u64,
    },

    /// A varint that does not use the shortest encoding of its value.
    #[error("non-canonical varint for {context}: {value} encoded in {len} bytes")]
    NonCanonicalVarint {
        context: &'static str,
        value: u64,
        len: usize,
    },

    /// A variant that is reserved on the wire but has no codec.
    #[error("{family} variant {variant} is not implemented")]
    Unimplemented {
        family: TypeFamily,
        variant: &'static str,
    },

    /// An array's element count is outside its declared bounds.
    #[error("{array} count out of bounds: {bound} is {limit} but count is {count}")]
    CountOutOfBounds {
        array: &'static str,
        bound: CountBound,
        limit: u64,
        count: u64,
    },

    /// Two adjacent array elements are not in strictly ascending byte order.
    #[error("{array} must be in their lexical order (byte wise) when serialized: element {current} should have been before element {previous}")]
    LexicalOrderViolation {
        array: &'static str,
        previous: usize,
        current: usize,
    },

    /// Two inputs reference the same UTXO.
    #[error("inputs must each reference a unique UTXO: input {index} duplicates input {duplicate_of}")]
    DuplicateReference { index: usize, duplicate_of: usize },

    /// An input references an output index outside the allowed range.
    #[error("input {index} references output index {output_index}, allowed range is 0..={max}")]
    InvalidReference {
        index: usize,
        output_index: u16,
        max: u16,
    },

    /// Two outputs deposit to the same address.
    #[error("outputs must each deposit to a unique address: output {index} duplicates output {duplicate_of}")]
    DuplicateDeposit { index: usize, duplicate_of: usize },

    /// An output deposits nothing.
    #[error("output {index} deposits {amount}, deposits must be greater than zero")]
    InvalidDepositAmount { index: usize, amount: u64 },

    /// A single output deposits more than the total supply.
    #[error("output {index} deposits {amount}, which is more than the total supply of {supply}")]
    SupplyExceeded {
        index: usize,
        amount: u64,
        supply: u64,
    },

    /// The outputs together deposit more than the total supply.
    #[error("accumulated output balance {total} exceeds total supply of {supply}")]
    SupplySumExceeded { total: u64, supply: u64 },

    /// A varint or an accumulated sum does not fit into 64 bits.
    #[error("integer overflow while {context}")]
    IntegerOverflow { context: &'static str },

    /// A signed transaction does not carry one unlock block per input.
    #[error("{unlock_blocks} unlock blocks given for {inputs} inputs")]
    UnlockBlockCountMismatch { inputs: usize, unlock_blocks: usize },

    /// A reference unlock block does not point at an earlier signature unlock block.
    #[error("unlock block {index} references {reference}, which is not an earlier signature unlock block")]
    InvalidUnlockReference { index: usize, reference: u16 },

    /// Two signature unlock blocks carry the same signature.
    #[error("signature unlock block {index} duplicates unlock block {duplicate_of}")]
    DuplicateSignature { index: usize, duplicate_of: usize },

    /// A buffer that should hold exactly one object has bytes left over.
    #[error("{trailing} trailing bytes after {consumed} consumed bytes")]
    TrailingBytes { consumed: usize, trailing: usize },

    /// Protocol parameters that cannot describe a working network.
    #[error("invalid protocol parameters: {0}")]
    InvalidParameters(String),

    /// Adds the concrete entity name to a failure from its decoder or encoder.
    #[error("unable to de/serialize {entity}: {source}")]
    Entity {
        entity: &'static str,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wraps `self` with the name of the entity being processed.
    pub fn in_entity(self, entity: &'static str) -> Self {
        Self::Entity {
            entity,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping all entity context wrappers.
    pub fn root_cause(&self) -> &CodecError {
        let mut err = self;
        while let Self::Entity { source, .. } = err {
            err = source;
        }
        err
    }
}

// ---------------------------------------------------------------------------
// Length checks
// ---------------------------------------------------------------------------

/// Fails unless `length` equals `exact`.
pub fn check_exact_byte_length(exact: usize, length: usize) -> Result<(), CodecError> {
    if length != exact {
        return Err(CodecError::InvalidLength {
            bound: LengthBound::Exact,
            required: exact,
            actual: length,
        });
    }
    Ok(())
}

/// Fails if `length` is below `min`.
pub fn check_min_byte_length(min: usize, length: usize) -> Result<(), CodecError> {
    if length < min {
        return Err(CodecError::InvalidLength {
            bound: LengthBound::Min,
            required: min,
            actual: length,
        });
    }
    Ok(())
}

/// Fails if `length` is above `max`.
pub fn check_max_byte_length(max: usize, length: usize) -> Result<(), CodecError> {
    if length > max {
        return Err(CodecError::InvalidLength {
            bound: LengthBound::Max,
            required: max,
            actual: length,
        });
    }
    Ok(())
}

/// Fails unless `min <= length <= max`.
pub fn check_byte_length_range(min: usize, max: usize, length: usize) -> Result<(), CodecError> {
    check_min_byte_length(min, length)?;
    check_max_byte_length(max, length)
}
