//! Unlock blocks: the proofs that authorize spending each input.
//!
//! ```text
//! SignatureUnlockBlock: [type:1][Signature]
//! ReferenceUnlockBlock: [type:1][reference:2]
//! ```
//!
//! A reference unlock block reuses the signature of an earlier unlock block
//! in the same transaction, so inputs owned by one address need only one
//! signature.

use serde::{Deserialize, Serialize};

use crate::codec::{deserialize_object, read_type_and_advance, write_type_header};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::{ONE_BYTE, UINT16_BYTE_SIZE};
use crate::error::{check_min_byte_length, CodecError, TypeFamily};
use crate::signature::Signature;

/// Unlock block carrying a signature.
pub const UNLOCK_BLOCK_SIGNATURE: u64 = 0;

/// Unlock block pointing at another unlock block.
pub const UNLOCK_BLOCK_REFERENCE: u64 = 1;

/// Size of a serialized reference unlock block.
pub const REFERENCE_UNLOCK_BLOCK_SIZE: usize = ONE_BYTE + UINT16_BYTE_SIZE;

// ---------------------------------------------------------------------------
// SignatureUnlockBlock
// ---------------------------------------------------------------------------

/// Unlocks an input with a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignatureUnlockBlock {
    pub signature: Signature,
}

impl SignatureUnlockBlock {
    pub fn new(signature: impl Into<Signature>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

impl Serializable for SignatureUnlockBlock {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        let (data, type_len) = read_type_and_advance(
            data,
            UNLOCK_BLOCK_SIGNATURE,
            TypeFamily::UnlockBlock,
            mode,
        )?;
        let (signature, sig_len) = deserialize_object(data, mode, Signature::select)?;
        self.signature = signature;
        Ok(type_len + sig_len)
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let sig = self.signature.encode(mode)?;
        let mut buf = write_type_header(UNLOCK_BLOCK_SIGNATURE, ONE_BYTE + sig.len());
        buf.extend_from_slice(&sig);
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// ReferenceUnlockBlock
// ---------------------------------------------------------------------------

/// Unlocks an input by pointing at the unlock block with index `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceUnlockBlock {
    pub reference: u16,
}

impl ReferenceUnlockBlock {
    pub fn new(reference: u16) -> Self {
        Self { reference }
    }
}

impl Serializable for ReferenceUnlockBlock {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        check_min_byte_length(REFERENCE_UNLOCK_BLOCK_SIZE, data.len())?;
        let (data, type_len) = read_type_and_advance(
            data,
            UNLOCK_BLOCK_REFERENCE,
            TypeFamily::UnlockBlock,
            mode,
        )?;
        check_min_byte_length(UINT16_BYTE_SIZE, data.len())?;
        self.reference = u16::from_le_bytes([data[0], data[1]]);
        Ok(type_len + UINT16_BYTE_SIZE)
    }

    fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let mut buf = write_type_header(UNLOCK_BLOCK_REFERENCE, REFERENCE_UNLOCK_BLOCK_SIZE);
        buf.extend_from_slice(&self.reference.to_le_bytes());
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// UnlockBlock
// ---------------------------------------------------------------------------

/// Every unlock block variant the wire format knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "block", rename_all = "snake_case")]
pub enum UnlockBlock {
    Signature(SignatureUnlockBlock),
    Reference(ReferenceUnlockBlock),
}

impl From<SignatureUnlockBlock> for UnlockBlock {
    fn from(block: SignatureUnlockBlock) -> Self {
        Self::Signature(block)
    }
}

impl From<ReferenceUnlockBlock> for UnlockBlock {
    fn from(block: ReferenceUnlockBlock) -> Self {
        Self::Reference(block)
    }
}

impl Serializable for UnlockBlock {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::Signature(block) => block.decode(data, mode),
            Self::Reference(block) => block.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Signature(block) => block.encode(mode),
            Self::Reference(block) => block.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Signature(_) => "SignatureUnlockBlock",
            Self::Reference(_) => "ReferenceUnlockBlock",
        }
    }
}

impl TypeSelector for UnlockBlock {
    const FAMILY: TypeFamily = TypeFamily::UnlockBlock;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            UNLOCK_BLOCK_SIGNATURE => Ok(Self::Signature(SignatureUnlockBlock::default())),
            UNLOCK_BLOCK_REFERENCE => Ok(Self::Reference(ReferenceUnlockBlock::default())),
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Ed25519Signature, ED25519_SIGNATURE_SERIALIZED_BYTES_SIZE};

    fn rand_ed25519_signature_unlock_block() -> (SignatureUnlockBlock, Vec<u8>) {
        let sig = Ed25519Signature::new(rand::random(), {
            let mut bytes = [0u8; 64];
            bytes[..32].copy_from_slice(&rand::random::<[u8; 32]>());
            bytes[32..].copy_from_slice(&rand::random::<[u8; 32]>());
            bytes
        });
        let mut data = vec![UNLOCK_BLOCK_SIGNATURE as u8];
        data.extend_from_slice(&sig.encode(DeSeriMode::NoValidation).unwrap());
        (SignatureUnlockBlock::new(sig), data)
    }

    fn rand_reference_unlock_block() -> (ReferenceUnlockBlock, Vec<u8>) {
        let reference: u16 = rand::random();
        let mut data = vec![UNLOCK_BLOCK_REFERENCE as u8];
        data.extend_from_slice(&reference.to_le_bytes());
        (ReferenceUnlockBlock::new(reference), data)
    }

    #[test]
    fn selector_rejects_unknown_type() {
        assert!(matches!(
            UnlockBlock::select(100),
            Err(CodecError::UnknownType {
                family: TypeFamily::UnlockBlock,
                discriminant: 100
            })
        ));
    }

    #[test]
    fn signature_block_deserialize_ok() {
        let (block, data) = rand_ed25519_signature_unlock_block();
        let mut decoded = SignatureUnlockBlock::default();
        let read = decoded
            .decode(&data, DeSeriMode::PerformValidation)
            .unwrap();
        assert_eq!(read, data.len());
        assert_eq!(read, ONE_BYTE + ED25519_SIGNATURE_SERIALIZED_BYTES_SIZE);
        assert_eq!(decoded, block);
    }

    #[test]
    fn signature_block_not_enough_data() {
        let (_, data) = rand_ed25519_signature_unlock_block();
        let err = SignatureUnlockBlock::default()
            .decode(&data[..5], DeSeriMode::PerformValidation)
            .unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::InvalidLength { .. }));
    }

    #[test]
    fn signature_block_serialize_ok() {
        let (block, data) = rand_ed25519_signature_unlock_block();
        assert_eq!(block.encode(DeSeriMode::PerformValidation).unwrap(), data);
    }

    #[test]
    fn reference_block_roundtrip() {
        let (block, data) = rand_reference_unlock_block();
        assert_eq!(block.encode(DeSeriMode::PerformValidation).unwrap(), data);

        let mut decoded = ReferenceUnlockBlock::default();
        let read = decoded
            .decode(&data, DeSeriMode::PerformValidation)
            .unwrap();
        assert_eq!(read, REFERENCE_UNLOCK_BLOCK_SIZE);
        assert_eq!(decoded, block);
    }

    #[test]
    fn reference_block_is_little_endian() {
        let bytes = ReferenceUnlockBlock::new(0x0102)
            .encode(DeSeriMode::PerformValidation)
            .unwrap();
        assert_eq!(bytes, vec![UNLOCK_BLOCK_REFERENCE as u8, 0x02, 0x01]);
    }

    #[test]
    fn family_dispatch_picks_variant() {
        let (sig_block, sig_data) = rand_ed25519_signature_unlock_block();
        let (ref_block, ref_data) = rand_reference_unlock_block();

        let (decoded, _) =
            deserialize_object(&sig_data, DeSeriMode::PerformValidation, UnlockBlock::select)
                .unwrap();
        assert_eq!(decoded, UnlockBlock::Signature(sig_block));

        let (decoded, _) =
            deserialize_object(&ref_data, DeSeriMode::PerformValidation, UnlockBlock::select)
                .unwrap();
        assert_eq!(decoded, UnlockBlock::Reference(ref_block));
    }
}
