//! Deposit addresses.
//!
//! ```text
//! Ed25519 address: [type:1][public key:32]
//! ```
//!
//! Discriminant 0 is reserved for the legacy WOTS scheme, which has no codec.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::codec::{read_type_and_advance, serde_hex, write_type_header};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::{ED25519_PUBLIC_KEY_LENGTH, ONE_BYTE};
use crate::error::{check_min_byte_length, CodecError, TypeFamily};

/// Legacy WOTS address. Reserved, not implemented.
pub const ADDRESS_WOTS: u64 = 0;

/// Ed25519 address.
pub const ADDRESS_ED25519: u64 = 1;

/// Size of a serialized Ed25519 address with its discriminant.
pub const ED25519_ADDRESS_SERIALIZED_BYTES_SIZE: usize = ONE_BYTE + ED25519_PUBLIC_KEY_LENGTH;

// ---------------------------------------------------------------------------
// Ed25519Address
// ---------------------------------------------------------------------------

/// An address that is the raw Ed25519 public key of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Ed25519Address(#[serde(with = "serde_hex")] pub [u8; ED25519_PUBLIC_KEY_LENGTH]);

impl Ed25519Address {
    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_LENGTH] {
        &self.0
    }
}

impl From<&VerifyingKey> for Ed25519Address {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl fmt::Display for Ed25519Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serializable for Ed25519Address {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        check_min_byte_length(ED25519_ADDRESS_SERIALIZED_BYTES_SIZE, data.len())?;
        let (data, type_len) =
            read_type_and_advance(data, ADDRESS_ED25519, TypeFamily::Address, mode)?;
        check_min_byte_length(ED25519_PUBLIC_KEY_LENGTH, data.len())?;
        self.0.copy_from_slice(&data[..ED25519_PUBLIC_KEY_LENGTH]);
        Ok(type_len + ED25519_PUBLIC_KEY_LENGTH)
    }

    fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let mut buf = write_type_header(ADDRESS_ED25519, ED25519_ADDRESS_SERIALIZED_BYTES_SIZE);
        buf.extend_from_slice(&self.0);
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Every address variant the wire format knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "address", rename_all = "snake_case")]
pub enum Address {
    Ed25519(Ed25519Address),
}

impl Default for Address {
    fn default() -> Self {
        Self::Ed25519(Ed25519Address::default())
    }
}

impl From<Ed25519Address> for Address {
    fn from(address: Ed25519Address) -> Self {
        Self::Ed25519(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(address) => write!(f, "ed25519:{}", address),
        }
    }
}

impl Serializable for Address {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::Ed25519(address) => address.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Ed25519(address) => address.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "Ed25519Address",
        }
    }
}

impl TypeSelector for Address {
    const FAMILY: TypeFamily = TypeFamily::Address;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            ADDRESS_WOTS => Err(CodecError::Unimplemented {
                family: Self::FAMILY,
                variant: "WOTS",
            }),
            ADDRESS_ED25519 => Ok(Self::Ed25519(Ed25519Address::default())),
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}
