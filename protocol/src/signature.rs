//! Signatures carried by signature unlock blocks.
//!
//! ```text
//! Ed25519 signature: [type:1][public key:32][signature:64]
//! ```
//!
//! The codec moves key and signature bytes around opaquely. Checking that
//! a signature actually verifies is the caller's business.

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::codec::{read_type_and_advance, serde_hex, write_type_header};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::{ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH, ONE_BYTE};
use crate::error::{check_min_byte_length, CodecError, TypeFamily};

/// Legacy WOTS signature. Reserved, not implemented.
pub const SIGNATURE_WOTS: u64 = 0;

/// Ed25519 signature.
pub const SIGNATURE_ED25519: u64 = 1;

/// Size of a serialized Ed25519 signature with its discriminant and public key.
pub const ED25519_SIGNATURE_SERIALIZED_BYTES_SIZE: usize =
    ONE_BYTE + ED25519_PUBLIC_KEY_LENGTH + ED25519_SIGNATURE_LENGTH;

// ---------------------------------------------------------------------------
// WotsSignature
// ---------------------------------------------------------------------------

/// Placeholder for the legacy WOTS scheme. It holds the discriminant slot so
/// it is never reused, and every attempt to encode or decode it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WotsSignature;

impl Serializable for WotsSignature {
    fn decode(&mut self, _data: &[u8], _mode: DeSeriMode) -> Result<usize, CodecError> {
        Err(CodecError::Unimplemented {
            family: TypeFamily::Signature,
            variant: "WOTS",
        })
    }

    fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::Unimplemented {
            family: TypeFamily::Signature,
            variant: "WOTS",
        })
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature
// ---------------------------------------------------------------------------

/// An Ed25519 signature together with the public key it claims to verify
/// under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519Signature {
    #[serde(with = "serde_hex")]
    pub public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
    #[serde(with = "serde_hex")]
    pub signature: [u8; ED25519_SIGNATURE_LENGTH],
}

impl Default for Ed25519Signature {
    fn default() -> Self {
        Self {
            public_key: [0u8; ED25519_PUBLIC_KEY_LENGTH],
            signature: [0u8; ED25519_SIGNATURE_LENGTH],
        }
    }
}

impl Ed25519Signature {
    pub fn new(
        public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        signature: [u8; ED25519_SIGNATURE_LENGTH],
    ) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// Packs key material produced by `ed25519-dalek`.
    pub fn from_dalek(public_key: &VerifyingKey, signature: &DalekSignature) -> Self {
        Self::new(public_key.to_bytes(), signature.to_bytes())
    }
}

impl Serializable for Ed25519Signature {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        check_min_byte_length(ED25519_SIGNATURE_SERIALIZED_BYTES_SIZE, data.len())?;
        let (data, type_len) =
            read_type_and_advance(data, SIGNATURE_ED25519, TypeFamily::Signature, mode)?;
        let body = ED25519_PUBLIC_KEY_LENGTH + ED25519_SIGNATURE_LENGTH;
        check_min_byte_length(body, data.len())?;
        self.public_key
            .copy_from_slice(&data[..ED25519_PUBLIC_KEY_LENGTH]);
        self.signature
            .copy_from_slice(&data[ED25519_PUBLIC_KEY_LENGTH..body]);
        Ok(type_len + body)
    }

    fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let mut buf =
            write_type_header(SIGNATURE_ED25519, ED25519_SIGNATURE_SERIALIZED_BYTES_SIZE);
        buf.extend_from_slice(&self.public_key);
        buf.extend_from_slice(&self.signature);
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Every signature variant the wire format knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "signature", rename_all = "snake_case")]
pub enum Signature {
    Wots(WotsSignature),
    Ed25519(Ed25519Signature),
}

impl Default for Signature {
    fn default() -> Self {
        Self::Ed25519(Ed25519Signature::default())
    }
}

impl From<Ed25519Signature> for Signature {
    fn from(signature: Ed25519Signature) -> Self {
        Self::Ed25519(signature)
    }
}

impl Serializable for Signature {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::Wots(sig) => sig.decode(data, mode),
            Self::Ed25519(sig) => sig.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Wots(sig) => sig.encode(mode),
            Self::Ed25519(sig) => sig.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Wots(_) => "WotsSignature",
            Self::Ed25519(_) => "Ed25519Signature",
        }
    }
}

impl TypeSelector for Signature {
    const FAMILY: TypeFamily = TypeFamily::Signature;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            SIGNATURE_WOTS => Ok(Self::Wots(WotsSignature)),
            SIGNATURE_ED25519 => Ok(Self::Ed25519(Ed25519Signature::default())),
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}
